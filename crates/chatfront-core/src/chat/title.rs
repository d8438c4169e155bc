//! Title derivation and the field-merge policy used by `save`.
//!
//! The upsert semantics have a fixed precedence: an explicit new value
//! wins over the existing record's value, which wins over a computed
//! default. [`resolve_field`] encodes that precedence once;
//! [`merge_record`] applies it to a full record so every `ChatStore`
//! implementation shares identical upsert behavior.

use chatfront_types::chat::{ChatRecord, Message, MessageRole, NEW_CHAT_TITLE};
use uuid::Uuid;

/// Maximum number of characters taken from the first user message.
pub const TITLE_MAX_CHARS: usize = 50;

/// Merge precedence: explicit value > existing value > computed default.
pub fn resolve_field<T>(new: Option<T>, existing: Option<T>, default: impl FnOnce() -> T) -> T {
    new.or(existing).unwrap_or_else(default)
}

/// Derive a title from the first user message (first ~50 characters,
/// char-boundary safe), or the placeholder when no user message exists.
pub fn derive_title(messages: &[Message]) -> String {
    messages
        .iter()
        .find(|m| m.role == MessageRole::User)
        .map(|m| m.content.chars().take(TITLE_MAX_CHARS).collect())
        .unwrap_or_else(|| NEW_CHAT_TITLE.to_string())
}

/// Title for a duplicated record.
pub fn copy_title(original: &str) -> String {
    format!("{original} (copy)")
}

/// Build the record state an upsert must persist.
///
/// The model field nests an Option because "the existing record has no
/// model" is itself a resolved value, distinct from "no existing record".
pub fn merge_record(
    id: Uuid,
    messages: Vec<Message>,
    title: Option<String>,
    model: Option<String>,
    existing: Option<&ChatRecord>,
) -> ChatRecord {
    let title = resolve_field(title, existing.map(|r| r.title.clone()), || {
        derive_title(&messages)
    });
    let model = resolve_field(model.map(Some), existing.map(|r| r.model.clone()), || None);
    ChatRecord {
        id,
        title,
        model,
        messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing(title: &str, model: Option<&str>) -> ChatRecord {
        ChatRecord {
            id: Uuid::now_v7(),
            title: title.to_string(),
            model: model.map(str::to_string),
            messages: Vec::new(),
        }
    }

    #[test]
    fn test_resolve_field_precedence() {
        assert_eq!(resolve_field(Some(1), Some(2), || 3), 1);
        assert_eq!(resolve_field(None, Some(2), || 3), 2);
        assert_eq!(resolve_field::<i32>(None, None, || 3), 3);
    }

    #[test]
    fn test_derive_title_from_first_user_message() {
        let messages = vec![
            Message::user("How do I sort a Vec in Rust?"),
            Message::assistant("Use sort() or sort_by()."),
        ];
        assert_eq!(derive_title(&messages), "How do I sort a Vec in Rust?");
    }

    #[test]
    fn test_derive_title_truncates_at_char_boundary() {
        let long = "é".repeat(80);
        let title = derive_title(&[Message::user(long)]);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS);
    }

    #[test]
    fn test_derive_title_skips_assistant_messages() {
        let messages = vec![Message::assistant("unsolicited"), Message::user("real question")];
        assert_eq!(derive_title(&messages), "real question");
    }

    #[test]
    fn test_derive_title_placeholder_when_empty() {
        assert_eq!(derive_title(&[]), NEW_CHAT_TITLE);
        assert_eq!(derive_title(&[Message::assistant("only me")]), NEW_CHAT_TITLE);
    }

    #[test]
    fn test_copy_title() {
        assert_eq!(copy_title("Budget plan"), "Budget plan (copy)");
    }

    #[test]
    fn test_merge_retains_existing_title_and_model() {
        let prior = existing("Kept", Some("gpt-x"));
        let merged = merge_record(prior.id, vec![Message::user("new turn")], None, None, Some(&prior));
        assert_eq!(merged.title, "Kept");
        assert_eq!(merged.model.as_deref(), Some("gpt-x"));
    }

    #[test]
    fn test_merge_explicit_values_win() {
        let prior = existing("Old", Some("gpt-x"));
        let merged = merge_record(
            prior.id,
            Vec::new(),
            Some("Renamed".to_string()),
            Some("gpt-y".to_string()),
            Some(&prior),
        );
        assert_eq!(merged.title, "Renamed");
        assert_eq!(merged.model.as_deref(), Some("gpt-y"));
    }

    #[test]
    fn test_merge_derives_title_without_existing() {
        let id = Uuid::now_v7();
        let merged = merge_record(id, vec![Message::user("fresh start")], None, None, None);
        assert_eq!(merged.title, "fresh start");
        assert!(merged.model.is_none());
    }

    #[test]
    fn test_merge_existing_modelless_record_stays_modelless() {
        let prior = existing("Kept", None);
        let merged = merge_record(prior.id, Vec::new(), None, None, Some(&prior));
        assert!(merged.model.is_none());
    }
}
