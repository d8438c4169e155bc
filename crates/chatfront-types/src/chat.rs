//! Chat record and message types for Chatfront.
//!
//! A [`ChatRecord`] is the durable unit of a conversation: an opaque id,
//! a human-readable title, the model last bound to it, and the ordered
//! message history. Records are persisted one-per-file by the store in
//! `chatfront-infra`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Placeholder title for a record with no user message yet.
pub const NEW_CHAT_TITLE: &str = "New Chat";

/// Title synthesized when a persisted record cannot be parsed.
pub const CORRUPT_CHAT_TITLE: &str = "Corrupt Chat";

/// Role of a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single turn half within a chat record.
///
/// User messages may embed spliced file content between explicit
/// `--- FILE <name> ---` / `--- END ---` markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Convenience constructor for a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Convenience constructor for an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// The durable unit of a conversation.
///
/// Invariants:
/// - `id` is allocated once (UUIDv7) and never changes.
/// - `messages` is strictly chronological and append-only; an error turn
///   never removes the user turn that preceded it.
/// - `model` records the last model a turn executed under and persists
///   even if that model later goes offline.
/// - A record with zero messages is valid (created, not yet used).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: Uuid,
    pub title: String,
    pub model: Option<String>,
    pub messages: Vec<Message>,
}

impl ChatRecord {
    /// Create an empty record with the placeholder title.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            title: NEW_CHAT_TITLE.to_string(),
            model: None,
            messages: Vec::new(),
        }
    }

    /// Synthesize a placeholder for a persisted payload that failed to
    /// parse. Navigation must never be blocked by a corrupt file.
    pub fn corrupt(id: Uuid) -> Self {
        Self {
            id,
            title: CORRUPT_CHAT_TITLE.to_string(),
            model: None,
            messages: Vec::new(),
        }
    }
}

/// Listing element: id, title, and the storage backend's last-write time.
///
/// `modified_at` is the documented ordering key for chat listings --
/// most-recently-modified first. It reflects storage metadata, not an
/// in-record field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSummary {
    pub id: Uuid,
    pub title: String,
    pub modified_at: DateTime<Utc>,
}
