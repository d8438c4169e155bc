//! ModelGateway trait definition.
//!
//! The seam to the remote LLM Manager gateway. Implementations live in
//! `chatfront-infra` (e.g., `HttpModelGateway`). Uses native async fn in
//! traits (RPITIT, Rust 2024 edition).

use chatfront_types::chat::Message;
use chatfront_types::error::GatewayError;

/// Client for the remote gateway's model-listing and chat-completion
/// operations.
pub trait ModelGateway: Send + Sync {
    /// Identifiers of the models currently reachable through the gateway.
    ///
    /// Callers wanting the degrade-gracefully policy (failure becomes an
    /// empty list plus a warning) go through
    /// [`super::directory::ModelDirectory`] instead of calling this
    /// directly.
    fn list_models(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<String>, GatewayError>> + Send;

    /// Execute a chat completion over the full accumulated message
    /// history and return the assistant reply text.
    fn complete(
        &self,
        model: &str,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<String, GatewayError>> + Send;
}
