//! Application configuration types.
//!
//! Deserialized from `{data_dir}/config.toml` by `chatfront-infra`.
//! Every field has a default so a missing or partial file still yields a
//! runnable configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Connection settings for the remote LLM Manager gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the gateway (no trailing slash).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent on every gateway request.
    #[serde(default)]
    pub api_key: String,

    /// Timeout for the model-listing query. Short: the listing runs on
    /// every chat view and must fail fast when the gateway is down.
    #[serde(default = "default_models_timeout")]
    pub models_timeout_secs: u64,

    /// Timeout for chat completions. Long enough for slow generations.
    #[serde(default = "default_completion_timeout")]
    pub completion_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            models_timeout_secs: default_models_timeout(),
            completion_timeout_secs: default_completion_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_models_timeout() -> u64 {
    5
}

fn default_completion_timeout() -> u64 {
    60
}
