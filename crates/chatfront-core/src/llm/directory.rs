//! Live model directory.
//!
//! Wraps a [`ModelGateway`] with the degrade-gracefully policy: any
//! listing failure becomes an empty model list plus a non-fatal warning,
//! so the front-end stays navigable when the gateway is unreachable --
//! just with no models selectable.
//!
//! The list is re-queried on every evaluation; there is no cache, so a
//! user is never shown a stale selection.

use tracing::warn;

use crate::llm::gateway::ModelGateway;

/// Result of one directory query.
#[derive(Debug, Clone, Default)]
pub struct OnlineModels {
    /// Currently reachable model identifiers, gateway order preserved.
    pub models: Vec<String>,
    /// Present when the gateway could not be queried.
    pub warning: Option<String>,
}

impl OnlineModels {
    pub fn contains(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }
}

/// Directory view over a gateway reference.
pub struct ModelDirectory<'a, G: ModelGateway> {
    gateway: &'a G,
}

impl<'a, G: ModelGateway> ModelDirectory<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Query the gateway for the currently online models.
    ///
    /// Never fails: a network or protocol error is reported as a warning
    /// on the result, with an empty model list.
    pub async fn online(&self) -> OnlineModels {
        match self.gateway.list_models().await {
            Ok(models) => OnlineModels {
                models,
                warning: None,
            },
            Err(err) => {
                warn!(error = %err, "could not fetch online models");
                OnlineModels {
                    models: Vec::new(),
                    warning: Some(format!("Could not connect to the LLM Manager: {err}")),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatfront_types::chat::Message;
    use chatfront_types::error::GatewayError;

    struct FixedGateway {
        fail: bool,
    }

    impl ModelGateway for FixedGateway {
        async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
            if self.fail {
                Err(GatewayError::Unreachable("connection refused".to_string()))
            } else {
                Ok(vec!["gpt-x".to_string(), "gpt-y".to_string()])
            }
        }

        async fn complete(
            &self,
            _model: &str,
            _messages: &[Message],
        ) -> Result<String, GatewayError> {
            unreachable!("directory tests never complete")
        }
    }

    #[tokio::test]
    async fn test_online_reflects_gateway() {
        let gateway = FixedGateway { fail: false };
        let online = ModelDirectory::new(&gateway).online().await;
        assert_eq!(online.models, vec!["gpt-x", "gpt-y"]);
        assert!(online.warning.is_none());
        assert!(online.contains("gpt-y"));
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty_with_warning() {
        let gateway = FixedGateway { fail: true };
        let online = ModelDirectory::new(&gateway).online().await;
        assert!(online.models.is_empty());
        let warning = online.warning.unwrap();
        assert!(warning.contains("LLM Manager"));
        assert!(warning.contains("connection refused"));
    }
}
