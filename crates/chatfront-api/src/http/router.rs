//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`. Middleware: CORS, tracing.
//! The HTML rendering layer is a separate collaborator and serves its
//! own pages; this router only exposes the JSON surface.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Identity
        .route(
            "/session",
            post(handlers::session::establish_identity)
                .delete(handlers::session::clear_identity),
        )
        // Model directory + selection
        .route("/models", get(handlers::model::list_models))
        .route("/session/model", put(handlers::model::select_model))
        // Chat records
        .route(
            "/chats",
            get(handlers::chat::list_chats).post(handlers::chat::create_chat),
        )
        .route(
            "/chats/{id}",
            get(handlers::chat::view_chat)
                .patch(handlers::chat::rename_chat)
                .delete(handlers::chat::delete_chat),
        )
        .route("/chats/{id}/messages", post(handlers::chat::submit_turn))
        .route(
            "/chats/{id}/duplicate",
            post(handlers::chat::duplicate_chat),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no identity required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
