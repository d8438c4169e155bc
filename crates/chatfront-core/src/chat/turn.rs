//! Conversation turn policy: prompt assembly and the error-to-turn
//! converter.
//!
//! A turn appends exactly one user message and exactly one resulting
//! assistant (or error) message. The pure pieces live here so they can be
//! tested without a store or gateway; [`super::service::ChatService`]
//! drives them.

use chatfront_types::chat::{ChatRecord, Message};
use chatfront_types::error::GatewayError;

/// Marker line opening spliced file content in a user message.
fn file_marker(filename: &str) -> String {
    format!("--- FILE {filename} ---")
}

/// Marker line closing spliced file content.
const END_MARKER: &str = "--- END ---";

/// Prefix of every durable error turn.
pub const ERROR_TURN_PREFIX: &str = "LLM Manager error:";

/// A file uploaded alongside a prompt. Raw bytes; decoding is permissive.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// One user submission.
#[derive(Debug, Clone, Default)]
pub struct TurnInput {
    pub prompt: String,
    pub attachment: Option<Attachment>,
}

/// Result of executing a turn.
#[derive(Debug)]
pub enum TurnOutcome {
    /// Gateway replied; both turns persisted.
    Completed { record: ChatRecord },
    /// Gateway failed; the user turn and a durable error turn were still
    /// persisted. `warning` is surfaced transiently to the caller.
    Failed { record: ChatRecord, warning: String },
    /// Empty submission: no turn appended, nothing persisted.
    Skipped,
}

/// Assemble the effective prompt for a submission.
///
/// With an attachment, its content (invalid byte sequences replaced, not
/// fatal) is wrapped in begin/end markers naming the source file, followed
/// by the literal prompt. Returns `None` for an empty submission.
pub fn effective_prompt(input: &TurnInput) -> Option<String> {
    let prompt = input.prompt.trim();
    match &input.attachment {
        Some(attachment) => {
            let content = String::from_utf8_lossy(&attachment.bytes);
            Some(format!(
                "{}\n{}\n{END_MARKER}\n{prompt}",
                file_marker(&attachment.filename),
                content
            ))
        }
        None if prompt.is_empty() => None,
        None => Some(prompt.to_string()),
    }
}

/// Convert a gateway failure into a durable assistant turn.
///
/// The format is stable and parseable: the fixed prefix followed by the
/// typed error's display form. The failure becomes a visible chat turn
/// rather than being silently dropped.
pub fn error_turn(err: &GatewayError) -> Message {
    Message::assistant(format!("{ERROR_TURN_PREFIX} {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_prompt_trimmed() {
        let input = TurnInput {
            prompt: "  hello  ".to_string(),
            attachment: None,
        };
        assert_eq!(effective_prompt(&input).as_deref(), Some("hello"));
    }

    #[test]
    fn test_empty_submission_is_none() {
        let input = TurnInput {
            prompt: "   ".to_string(),
            attachment: None,
        };
        assert!(effective_prompt(&input).is_none());
    }

    #[test]
    fn test_attachment_wrapped_in_markers() {
        let input = TurnInput {
            prompt: "summarize this".to_string(),
            attachment: Some(Attachment {
                filename: "notes.txt".to_string(),
                bytes: b"line one\nline two".to_vec(),
            }),
        };
        assert_eq!(
            effective_prompt(&input).unwrap(),
            "--- FILE notes.txt ---\nline one\nline two\n--- END ---\nsummarize this"
        );
    }

    #[test]
    fn test_attachment_alone_still_submits() {
        let input = TurnInput {
            prompt: String::new(),
            attachment: Some(Attachment {
                filename: "data.csv".to_string(),
                bytes: b"a,b".to_vec(),
            }),
        };
        let prompt = effective_prompt(&input).unwrap();
        assert!(prompt.starts_with("--- FILE data.csv ---"));
        assert!(prompt.ends_with("--- END ---\n"));
    }

    #[test]
    fn test_invalid_utf8_replaced_not_fatal() {
        let input = TurnInput {
            prompt: String::new(),
            attachment: Some(Attachment {
                filename: "blob.bin".to_string(),
                bytes: vec![0x68, 0x69, 0xFF, 0xFE],
            }),
        };
        let prompt = effective_prompt(&input).unwrap();
        assert!(prompt.contains("hi"));
        assert!(prompt.contains('\u{FFFD}'));
    }

    #[test]
    fn test_error_turn_format() {
        let err = GatewayError::Unreachable("timed out".to_string());
        let turn = error_turn(&err);
        assert_eq!(turn.role, chatfront_types::chat::MessageRole::Assistant);
        assert_eq!(turn.content, "LLM Manager error: gateway unreachable: timed out");
    }
}
