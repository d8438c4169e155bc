//! Filesystem implementation of the `ChatStore` trait.
//!
//! One JSON file per chat record at `{data_dir}/chats/{user}/{id}.json`.
//! Every mutation is a full-file overwrite staged through a `.tmp`
//! sibling and renamed into place, so a reader never observes a
//! half-written record. Listing order comes from filesystem mtime --
//! the storage backend's last-write time is the documented ordering key.

use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use chatfront_core::chat::store::ChatStore;
use chatfront_core::chat::title::{copy_title, merge_record};
use chatfront_types::chat::{ChatRecord, ChatSummary, Message};
use chatfront_types::error::ChatStoreError;
use chatfront_types::user::UserName;

/// Local filesystem chat record store.
///
/// All I/O goes through `tokio::fs`. The per-user directory is the
/// namespace boundary: records of one user are invisible to every other.
pub struct FsChatStore {
    data_dir: PathBuf,
}

impl FsChatStore {
    /// Create a store rooted at `data_dir`. Directories are created
    /// lazily on first write per user.
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Compute the namespace directory: `{data_dir}/chats/{user}/`.
    fn user_dir(&self, user: &UserName) -> PathBuf {
        self.data_dir.join("chats").join(user.as_str())
    }

    /// Compute the record path: `{data_dir}/chats/{user}/{id}.json`.
    fn record_path(&self, user: &UserName, id: &Uuid) -> PathBuf {
        self.user_dir(user).join(format!("{id}.json"))
    }

    /// Read and parse one record file.
    ///
    /// `Ok(None)` when the file is absent. A file that exists but fails
    /// to parse degrades to the synthesized "Corrupt Chat" placeholder --
    /// never an error, so navigation keeps working.
    async fn read_record(
        &self,
        user: &UserName,
        id: &Uuid,
    ) -> Result<Option<ChatRecord>, ChatStoreError> {
        let path = self.record_path(user, id);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str::<ChatRecord>(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                warn!(user = %user, chat_id = %id, error = %err, "corrupt chat record, serving placeholder");
                Ok(Some(ChatRecord::corrupt(*id)))
            }
        }
    }

    /// Persist one record atomically: write to a `.tmp` sibling in the
    /// same directory, then rename over the target.
    async fn write_record(
        &self,
        user: &UserName,
        record: &ChatRecord,
    ) -> Result<(), ChatStoreError> {
        let dir = self.user_dir(user);
        tokio::fs::create_dir_all(&dir).await?;

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| ChatStoreError::Serialize(e.to_string()))?;

        let path = self.record_path(user, &record.id);
        let staging = dir.join(format!("{}.json.tmp", record.id));
        tokio::fs::write(&staging, json).await?;
        tokio::fs::rename(&staging, &path).await?;
        Ok(())
    }
}

impl ChatStore for FsChatStore {
    async fn create(&self, user: &UserName) -> Result<ChatRecord, ChatStoreError> {
        let record = ChatRecord::new(Uuid::now_v7());
        self.write_record(user, &record).await?;
        Ok(record)
    }

    async fn load(
        &self,
        user: &UserName,
        id: &Uuid,
    ) -> Result<Option<ChatRecord>, ChatStoreError> {
        self.read_record(user, id).await
    }

    async fn save(
        &self,
        user: &UserName,
        id: &Uuid,
        messages: Vec<Message>,
        title: Option<String>,
        model: Option<String>,
    ) -> Result<ChatRecord, ChatStoreError> {
        let existing = self.read_record(user, id).await?;
        let record = merge_record(*id, messages, title, model, existing.as_ref());
        self.write_record(user, &record).await?;
        Ok(record)
    }

    async fn list(&self, user: &UserName) -> Result<Vec<ChatSummary>, ChatStoreError> {
        let dir = self.user_dir(user);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            // No directory yet means the user has no chats.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<Uuid>().ok())
            else {
                continue;
            };

            let modified = entry
                .metadata()
                .await?
                .modified()
                .unwrap_or(SystemTime::UNIX_EPOCH);

            // Absence here would mean the file vanished between read_dir
            // and read; skip rather than fail the whole listing.
            if let Some(record) = self.read_record(user, &id).await? {
                summaries.push(ChatSummary {
                    id,
                    title: record.title,
                    modified_at: DateTime::<Utc>::from(modified),
                });
            }
        }

        summaries.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        Ok(summaries)
    }

    async fn delete(&self, user: &UserName, id: &Uuid) -> Result<(), ChatStoreError> {
        let path = self.record_path(user, id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(ChatStoreError::NotFound)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn duplicate(&self, user: &UserName, id: &Uuid) -> Result<ChatRecord, ChatStoreError> {
        let source = self
            .read_record(user, id)
            .await?
            .ok_or(ChatStoreError::NotFound)?;

        let copy = ChatRecord {
            id: Uuid::now_v7(),
            title: copy_title(&source.title),
            model: source.model.clone(),
            messages: source.messages.clone(),
        };
        self.write_record(user, &copy).await?;
        Ok(copy)
    }
}
