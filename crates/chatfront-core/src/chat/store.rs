//! ChatStore trait definition.
//!
//! Durable, per-user chat record persistence. Implementations live in
//! `chatfront-infra` (e.g., `FsChatStore`). Uses native async fn in
//! traits (RPITIT, Rust 2024 edition).

use chatfront_types::chat::{ChatRecord, ChatSummary, Message};
use chatfront_types::error::ChatStoreError;
use chatfront_types::user::UserName;
use uuid::Uuid;

/// Repository trait for chat record persistence.
///
/// Every record belongs exclusively to one user's namespace; ids are
/// unique and stable within it. Mutations are full-record overwrites --
/// no partial-field patching format exists.
pub trait ChatStore: Send + Sync {
    /// Allocate a fresh id and persist an empty record titled "New Chat".
    fn create(
        &self,
        user: &UserName,
    ) -> impl std::future::Future<Output = Result<ChatRecord, ChatStoreError>> + Send;

    /// Read a persisted record. Returns `None` when absent.
    ///
    /// A malformed persisted payload yields a synthesized "Corrupt Chat"
    /// record with an empty message list -- a corrupted file must never
    /// block navigation.
    fn load(
        &self,
        user: &UserName,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ChatRecord>, ChatStoreError>> + Send;

    /// Upsert a record, merging omitted fields per [`super::title::merge_record`]:
    /// omitted title retains the existing title (or derives one from the
    /// first user message), omitted model retains the existing model.
    /// The write is atomic -- a reader never observes a half-written record.
    fn save(
        &self,
        user: &UserName,
        id: &Uuid,
        messages: Vec<Message>,
        title: Option<String>,
        model: Option<String>,
    ) -> impl std::future::Future<Output = Result<ChatRecord, ChatStoreError>> + Send;

    /// All records for the user, most-recently-modified first. The
    /// ordering key is the storage backend's last-write time.
    fn list(
        &self,
        user: &UserName,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSummary>, ChatStoreError>> + Send;

    /// Remove a persisted record. `ChatStoreError::NotFound` when absent.
    fn delete(
        &self,
        user: &UserName,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), ChatStoreError>> + Send;

    /// Copy a record under a new id with a `"<title> (copy)"` title.
    /// The source record is left unmodified.
    fn duplicate(
        &self,
        user: &UserName,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<ChatRecord, ChatStoreError>> + Send;
}
