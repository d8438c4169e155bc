//! Configuration loading for Chatfront.
//!
//! Reads `config.toml` from the data directory and deserializes it into
//! [`AppConfig`]. Falls back to defaults when the file is missing or
//! malformed. Environment variables override file values so a deployment
//! can be pointed at a gateway without editing files.

use std::path::{Path, PathBuf};

use chatfront_types::config::AppConfig;

/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "CHATFRONT_DATA_DIR";
/// Environment variable overriding the gateway base URL.
pub const ENV_GATEWAY_URL: &str = "CHATFRONT_GATEWAY_URL";
/// Environment variable overriding the gateway API key.
pub const ENV_API_KEY: &str = "CHATFRONT_API_KEY";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CHATFRONT_DATA_DIR` environment variable
/// 2. `~/.chatfront`
/// 3. `./.chatfront` as a last resort
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatfront");
    }

    PathBuf::from(".chatfront")
}

/// Load configuration from `{data_dir}/config.toml`, then apply
/// environment overrides.
///
/// - Missing file: defaults.
/// - Unreadable or unparseable file: warning logged, defaults.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let mut config = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => match toml::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    "Failed to parse {}: {err}, using defaults",
                    config_path.display()
                );
                AppConfig::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    };

    if let Ok(url) = std::env::var(ENV_GATEWAY_URL) {
        config.gateway.base_url = url;
    }
    if let Ok(key) = std::env::var(ENV_API_KEY) {
        config.gateway.api_key = key;
    }

    config
}
