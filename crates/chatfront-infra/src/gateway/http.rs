//! HttpModelGateway -- concrete [`ModelGateway`] implementation over the
//! LLM Manager's HTTP API.
//!
//! Sends bearer-authenticated requests to `/v1/models` and
//! `/v1/chat/completions`. Both calls carry bounded per-request timeouts:
//! short for the listing (it runs on every chat view), longer for
//! completions. A timed-out call fails; nothing hangs indefinitely.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never
//! logged or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use chatfront_core::llm::gateway::ModelGateway;
use chatfront_types::chat::Message;
use chatfront_types::config::GatewayConfig;
use chatfront_types::error::GatewayError;

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ModelsResponse};

/// HTTP client for the remote gateway.
pub struct HttpModelGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    models_timeout: Duration,
    completion_timeout: Duration,
}

impl HttpModelGateway {
    /// Build a gateway client from configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| GatewayError::Unreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: SecretString::from(config.api_key.clone()),
            models_timeout: Duration::from_secs(config.models_timeout_secs),
            completion_timeout: Duration::from_secs(config.completion_timeout_secs),
        })
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// HttpModelGateway intentionally does NOT derive Debug: the SecretString
// field protects the key, but omitting Debug entirely keeps the client
// out of log output altogether.

/// Map a reqwest transport failure onto the gateway taxonomy.
fn map_transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Unreachable(format!("request timed out: {err}"))
    } else {
        GatewayError::Unreachable(err.to_string())
    }
}

impl ModelGateway for HttpModelGateway {
    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        let response = self
            .client
            .get(self.url("/v1/models"))
            .bearer_auth(self.api_key.expose_secret())
            .timeout(self.models_timeout)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body: ModelsResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Malformed(format!("model listing: {e}")))?;

        Ok(body.data.into_iter().map(|m| m.id).collect())
    }

    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, GatewayError> {
        let request = ChatCompletionRequest { model, messages };

        let response = self
            .client
            .post(self.url("/v1/chat/completions"))
            .bearer_auth(self.api_key.expose_secret())
            .timeout(self.completion_timeout)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Malformed(format!("chat completion: {e}")))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GatewayError::Malformed("response contained no choices".to_string()))
    }
}
