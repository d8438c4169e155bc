//! Chat service orchestrating record lifecycle and turn execution.
//!
//! `ChatService` coordinates the `ChatStore` and `ModelGateway` seams:
//! creating, renaming, duplicating and deleting records, and driving the
//! conversation turn executor. Every mutating operation holds the
//! per-record lock across its full load-mutate-save span, so two
//! concurrent submissions to one chat can never lose an update.

use tracing::{info, warn};
use uuid::Uuid;

use chatfront_types::chat::{ChatRecord, ChatSummary, Message};
use chatfront_types::error::{ChatStoreError, TurnError};
use chatfront_types::user::UserName;

use crate::chat::lock::RecordLocks;
use crate::chat::store::ChatStore;
use crate::chat::turn::{effective_prompt, error_turn, TurnInput, TurnOutcome};
use crate::llm::directory::ModelDirectory;
use crate::llm::gateway::ModelGateway;

/// Orchestrates chat record lifecycle and turn execution.
///
/// Generic over store and gateway to keep core free of infrastructure;
/// `chatfront-api` pins the concrete implementations.
pub struct ChatService<S: ChatStore, G: ModelGateway> {
    store: S,
    gateway: G,
    locks: RecordLocks,
}

impl<S: ChatStore, G: ModelGateway> ChatService<S, G> {
    pub fn new(store: S, gateway: G) -> Self {
        Self {
            store,
            gateway,
            locks: RecordLocks::new(),
        }
    }

    /// Directory view over this service's gateway.
    pub fn models(&self) -> ModelDirectory<'_, G> {
        ModelDirectory::new(&self.gateway)
    }

    /// Create a fresh, empty chat record.
    pub async fn create_chat(&self, user: &UserName) -> Result<ChatRecord, ChatStoreError> {
        let record = self.store.create(user).await?;
        info!(user = %user, chat_id = %record.id, "chat created");
        Ok(record)
    }

    /// Load a record; `None` when it does not exist.
    pub async fn get_chat(
        &self,
        user: &UserName,
        id: &Uuid,
    ) -> Result<Option<ChatRecord>, ChatStoreError> {
        self.store.load(user, id).await
    }

    /// Sibling listing, most-recently-modified first.
    pub async fn list_chats(&self, user: &UserName) -> Result<Vec<ChatSummary>, ChatStoreError> {
        self.store.list(user).await
    }

    /// Rename a record. A blank title is treated as "no change" and the
    /// existing title is retained.
    pub async fn rename_chat(
        &self,
        user: &UserName,
        id: &Uuid,
        new_title: &str,
    ) -> Result<ChatRecord, ChatStoreError> {
        let _guard = self.locks.acquire(*id).await;
        let existing = self
            .store
            .load(user, id)
            .await?
            .ok_or(ChatStoreError::NotFound)?;

        let title = Some(new_title.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let record = self
            .store
            .save(user, id, existing.messages, title, None)
            .await?;
        info!(user = %user, chat_id = %id, "chat renamed");
        Ok(record)
    }

    /// Duplicate a record under a new id. The source lock is held so the
    /// copy observes a consistent snapshot.
    pub async fn duplicate_chat(
        &self,
        user: &UserName,
        id: &Uuid,
    ) -> Result<ChatRecord, ChatStoreError> {
        let _guard = self.locks.acquire(*id).await;
        let copy = self.store.duplicate(user, id).await?;
        info!(user = %user, source_id = %id, copy_id = %copy.id, "chat duplicated");
        Ok(copy)
    }

    /// Delete a record. `NotFound` when it was never created or already
    /// deleted; other records are unaffected.
    pub async fn delete_chat(&self, user: &UserName, id: &Uuid) -> Result<(), ChatStoreError> {
        let _guard = self.locks.acquire(*id).await;
        self.store.delete(user, id).await?;
        info!(user = %user, chat_id = %id, "chat deleted");
        Ok(())
    }

    /// Execute one conversation turn against a record.
    ///
    /// Policy (in order):
    /// 1. No bound model: fail without mutating the record.
    /// 2. Empty submission (no prompt, no attachment): no-op.
    /// 3. Append the user turn, send the full accumulated history to the
    ///    gateway, append the reply -- or, on any gateway failure, a
    ///    durable error turn -- and persist. Once triggered, the user
    ///    turn is persisted unconditionally, failure or not.
    pub async fn submit_turn(
        &self,
        user: &UserName,
        id: &Uuid,
        input: TurnInput,
        bound_model: Option<&str>,
    ) -> Result<TurnOutcome, TurnError> {
        let Some(model) = bound_model else {
            return Err(TurnError::NoModelAvailable);
        };
        let Some(prompt) = effective_prompt(&input) else {
            return Ok(TurnOutcome::Skipped);
        };

        let _guard = self.locks.acquire(*id).await;
        let mut record = self
            .store
            .load(user, id)
            .await
            .map_err(TurnError::Store)?
            .ok_or(TurnError::Store(ChatStoreError::NotFound))?;

        record.messages.push(Message::user(prompt));

        let failure = match self.gateway.complete(model, &record.messages).await {
            Ok(reply) => {
                record.messages.push(Message::assistant(reply));
                None
            }
            Err(err) => {
                warn!(user = %user, chat_id = %id, error = %err, "gateway call failed");
                let turn = error_turn(&err);
                let warning = turn.content.clone();
                record.messages.push(turn);
                Some(warning)
            }
        };

        let record = self
            .store
            .save(user, id, record.messages, None, Some(model.to_string()))
            .await
            .map_err(TurnError::Store)?;

        match failure {
            None => Ok(TurnOutcome::Completed { record }),
            Some(warning) => Ok(TurnOutcome::Failed { record, warning }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use chatfront_types::chat::MessageRole;
    use chatfront_types::error::GatewayError;

    use crate::chat::title::{copy_title, merge_record};
    use crate::chat::turn::Attachment;

    /// HashMap-backed store sharing the merge semantics of the real
    /// filesystem store via `merge_record`.
    #[derive(Default)]
    struct MemStore {
        records: Mutex<HashMap<Uuid, ChatRecord>>,
    }

    impl ChatStore for MemStore {
        async fn create(&self, _user: &UserName) -> Result<ChatRecord, ChatStoreError> {
            let record = ChatRecord::new(Uuid::now_v7());
            self.records
                .lock()
                .unwrap()
                .insert(record.id, record.clone());
            Ok(record)
        }

        async fn load(
            &self,
            _user: &UserName,
            id: &Uuid,
        ) -> Result<Option<ChatRecord>, ChatStoreError> {
            Ok(self.records.lock().unwrap().get(id).cloned())
        }

        async fn save(
            &self,
            _user: &UserName,
            id: &Uuid,
            messages: Vec<Message>,
            title: Option<String>,
            model: Option<String>,
        ) -> Result<ChatRecord, ChatStoreError> {
            let mut records = self.records.lock().unwrap();
            let merged = merge_record(*id, messages, title, model, records.get(id));
            records.insert(*id, merged.clone());
            Ok(merged)
        }

        async fn list(&self, _user: &UserName) -> Result<Vec<ChatSummary>, ChatStoreError> {
            Ok(Vec::new())
        }

        async fn delete(&self, _user: &UserName, id: &Uuid) -> Result<(), ChatStoreError> {
            self.records
                .lock()
                .unwrap()
                .remove(id)
                .map(|_| ())
                .ok_or(ChatStoreError::NotFound)
        }

        async fn duplicate(
            &self,
            _user: &UserName,
            id: &Uuid,
        ) -> Result<ChatRecord, ChatStoreError> {
            let mut records = self.records.lock().unwrap();
            let source = records.get(id).cloned().ok_or(ChatStoreError::NotFound)?;
            let copy = ChatRecord {
                id: Uuid::now_v7(),
                title: copy_title(&source.title),
                model: source.model.clone(),
                messages: source.messages.clone(),
            };
            records.insert(copy.id, copy.clone());
            Ok(copy)
        }
    }

    enum StubMode {
        Reply(String),
        Timeout,
    }

    struct StubGateway {
        mode: StubMode,
        delay: Duration,
        calls: AtomicUsize,
        last_history_len: AtomicUsize,
    }

    impl StubGateway {
        fn replying(reply: &str) -> Self {
            Self {
                mode: StubMode::Reply(reply.to_string()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                last_history_len: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                mode: StubMode::Timeout,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                last_history_len: AtomicUsize::new(0),
            }
        }

        fn slow(reply: &str, delay: Duration) -> Self {
            Self {
                delay,
                ..Self::replying(reply)
            }
        }
    }

    impl ModelGateway for StubGateway {
        async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
            Ok(vec!["gpt-x".to_string()])
        }

        async fn complete(
            &self,
            _model: &str,
            messages: &[Message],
        ) -> Result<String, GatewayError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.last_history_len.store(messages.len(), Ordering::SeqCst);
            match &self.mode {
                StubMode::Reply(reply) => Ok(reply.clone()),
                StubMode::Timeout => Err(GatewayError::Unreachable(
                    "request timed out after 60s".to_string(),
                )),
            }
        }
    }

    fn user() -> UserName {
        UserName::new("alice").unwrap()
    }

    fn prompt(text: &str) -> TurnInput {
        TurnInput {
            prompt: text.to_string(),
            attachment: None,
        }
    }

    #[tokio::test]
    async fn test_submit_without_model_does_not_mutate() {
        let service = ChatService::new(MemStore::default(), StubGateway::replying("hi"));
        let record = service.create_chat(&user()).await.unwrap();

        let err = service
            .submit_turn(&user(), &record.id, prompt("hello"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, TurnError::NoModelAvailable));

        let reloaded = service.get_chat(&user(), &record.id).await.unwrap().unwrap();
        assert!(reloaded.messages.is_empty());
    }

    #[tokio::test]
    async fn test_empty_submission_is_noop() {
        let service = ChatService::new(MemStore::default(), StubGateway::replying("hi"));
        let record = service.create_chat(&user()).await.unwrap();

        let outcome = service
            .submit_turn(&user(), &record.id, prompt("   "), Some("gpt-x"))
            .await
            .unwrap();
        assert!(matches!(outcome, TurnOutcome::Skipped));

        let reloaded = service.get_chat(&user(), &record.id).await.unwrap().unwrap();
        assert!(reloaded.messages.is_empty());
    }

    #[tokio::test]
    async fn test_successful_turn_appends_both_messages_and_binds_model() {
        let service = ChatService::new(MemStore::default(), StubGateway::replying("42"));
        let record = service.create_chat(&user()).await.unwrap();

        let outcome = service
            .submit_turn(&user(), &record.id, prompt("meaning of life?"), Some("gpt-x"))
            .await
            .unwrap();

        let TurnOutcome::Completed { record } = outcome else {
            panic!("expected completed turn");
        };
        assert_eq!(record.messages.len(), 2);
        assert_eq!(record.messages[0].role, MessageRole::User);
        assert_eq!(record.messages[0].content, "meaning of life?");
        assert_eq!(record.messages[1].role, MessageRole::Assistant);
        assert_eq!(record.messages[1].content, "42");
        assert_eq!(record.model.as_deref(), Some("gpt-x"));
    }

    #[tokio::test]
    async fn test_gateway_failure_persists_user_turn_and_error_turn() {
        let service = ChatService::new(MemStore::default(), StubGateway::failing());
        let record = service.create_chat(&user()).await.unwrap();

        let outcome = service
            .submit_turn(&user(), &record.id, prompt("hello"), Some("gpt-x"))
            .await
            .unwrap();

        let TurnOutcome::Failed { record, warning } = outcome else {
            panic!("expected failed turn");
        };
        assert!(warning.starts_with("LLM Manager error:"));

        // Both turns are durable, not just in the returned value.
        let reloaded = service.get_chat(&user(), &record.id).await.unwrap().unwrap();
        assert_eq!(reloaded.messages.len(), 2);
        assert_eq!(reloaded.messages[0].content, "hello");
        assert_eq!(reloaded.messages[1].role, MessageRole::Assistant);
        assert!(reloaded.messages[1]
            .content
            .starts_with("LLM Manager error:"));
        assert_eq!(reloaded.model.as_deref(), Some("gpt-x"));
    }

    #[tokio::test]
    async fn test_gateway_receives_full_history() {
        let gateway = StubGateway::replying("ok");
        let service = ChatService::new(MemStore::default(), gateway);
        let record = service.create_chat(&user()).await.unwrap();

        for text in ["first", "second", "third"] {
            service
                .submit_turn(&user(), &record.id, prompt(text), Some("gpt-x"))
                .await
                .unwrap();
        }

        // Third call saw 2 prior exchanges plus the new user turn.
        assert_eq!(service.gateway.last_history_len.load(Ordering::SeqCst), 5);
        assert_eq!(service.gateway.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_attachment_spliced_into_user_turn() {
        let service = ChatService::new(MemStore::default(), StubGateway::replying("read it"));
        let record = service.create_chat(&user()).await.unwrap();

        let input = TurnInput {
            prompt: "what does this say?".to_string(),
            attachment: Some(Attachment {
                filename: "memo.txt".to_string(),
                bytes: b"launch friday".to_vec(),
            }),
        };
        service
            .submit_turn(&user(), &record.id, input, Some("gpt-x"))
            .await
            .unwrap();

        let reloaded = service.get_chat(&user(), &record.id).await.unwrap().unwrap();
        let user_turn = &reloaded.messages[0].content;
        assert!(user_turn.starts_with("--- FILE memo.txt ---"));
        assert!(user_turn.contains("launch friday"));
        assert!(user_turn.ends_with("--- END ---\nwhat does this say?"));
    }

    #[tokio::test]
    async fn test_concurrent_submits_to_same_chat_lose_nothing() {
        let service = Arc::new(ChatService::new(
            MemStore::default(),
            StubGateway::slow("reply", Duration::from_millis(30)),
        ));
        let record = service.create_chat(&user()).await.unwrap();

        let tasks: Vec<_> = ["one", "two"]
            .into_iter()
            .map(|text| {
                let service = Arc::clone(&service);
                let id = record.id;
                let text = text.to_string();
                tokio::spawn(async move {
                    service
                        .submit_turn(&user(), &id, prompt(&text), Some("gpt-x"))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        // Serialized mutations: all four turns survive.
        let reloaded = service.get_chat(&user(), &record.id).await.unwrap().unwrap();
        assert_eq!(reloaded.messages.len(), 4);
    }

    #[tokio::test]
    async fn test_rename_retains_title_on_blank_input() {
        let service = ChatService::new(MemStore::default(), StubGateway::replying("hi"));
        let record = service.create_chat(&user()).await.unwrap();

        let renamed = service
            .rename_chat(&user(), &record.id, "Plans")
            .await
            .unwrap();
        assert_eq!(renamed.title, "Plans");

        let unchanged = service
            .rename_chat(&user(), &record.id, "   ")
            .await
            .unwrap();
        assert_eq!(unchanged.title, "Plans");
    }

    #[tokio::test]
    async fn test_rename_missing_chat_is_not_found() {
        let service = ChatService::new(MemStore::default(), StubGateway::replying("hi"));
        let err = service
            .rename_chat(&user(), &Uuid::now_v7(), "Ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatStoreError::NotFound));
    }

    #[tokio::test]
    async fn test_duplicate_copies_and_leaves_source_intact() {
        let service = ChatService::new(MemStore::default(), StubGateway::replying("hi"));
        let record = service.create_chat(&user()).await.unwrap();
        service
            .submit_turn(&user(), &record.id, prompt("keep me"), Some("gpt-x"))
            .await
            .unwrap();

        let copy = service.duplicate_chat(&user(), &record.id).await.unwrap();
        assert_ne!(copy.id, record.id);
        assert_eq!(copy.title, "New Chat (copy)");
        assert_eq!(copy.model.as_deref(), Some("gpt-x"));
        assert_eq!(copy.messages.len(), 2);

        // Deleting the copy leaves the original loadable.
        service.delete_chat(&user(), &copy.id).await.unwrap();
        assert!(service
            .get_chat(&user(), &record.id)
            .await
            .unwrap()
            .is_some());
    }
}
