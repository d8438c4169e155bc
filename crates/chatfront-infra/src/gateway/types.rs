//! Wire types for the LLM Manager gateway contract.
//!
//! The gateway speaks the OpenAI-compatible shape: `GET /v1/models`
//! returns `{"data": [{"id": ...}, ...]}` and
//! `POST /v1/chat/completions` returns a body whose first choice carries
//! the assistant reply.

use serde::{Deserialize, Serialize};

use chatfront_types::chat::Message;

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
}

/// Response body for `GET /v1/models`.
#[derive(Debug, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ModelEntry {
    pub id: String,
}

/// Response body for `POST /v1/chat/completions`.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: String,
}
