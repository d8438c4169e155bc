//! Application state wiring the service to its concrete adapters.
//!
//! `ChatService` is generic over store and gateway traits; AppState pins
//! them to the filesystem store and the HTTP gateway client from
//! `chatfront-infra`.

use std::path::PathBuf;
use std::sync::Arc;

use chatfront_core::chat::service::ChatService;
use chatfront_infra::config::{load_config, resolve_data_dir};
use chatfront_infra::gateway::HttpModelGateway;
use chatfront_infra::store::FsChatStore;

/// Concrete type alias for the service generics pinned to infra
/// implementations.
pub type ConcreteChatService = ChatService<FsChatStore, HttpModelGateway>;

/// Shared application state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: resolve the data directory,
    /// load configuration, wire the store and gateway.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;

        let store = FsChatStore::new(data_dir.clone());
        let gateway = HttpModelGateway::new(&config.gateway)?;
        let chat_service = ChatService::new(store, gateway);

        Ok(Self {
            chat_service: Arc::new(chat_service),
            data_dir,
        })
    }
}
