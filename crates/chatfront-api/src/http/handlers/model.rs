//! Model directory and selection HTTP handlers.
//!
//! Endpoints:
//! - GET /api/v1/models        - Currently online model identifiers
//! - PUT /api/v1/session/model - Explicitly select a model

use std::time::Instant;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, NoticeLevel};
use crate::http::session::{session_cookie, with_cookies, SessionContext, MODEL_COOKIE};
use crate::state::AppState;

/// Request body for explicit model selection.
#[derive(Debug, Deserialize)]
pub struct SelectModelRequest {
    pub model: String,
    /// Chat to return to after the switch.
    #[serde(default)]
    pub chat_id: Option<Uuid>,
}

/// GET /api/v1/models - List the currently online models.
///
/// A gateway failure is reported as an error notice over an empty list,
/// never as a failed request.
pub async fn list_models(
    State(state): State<AppState>,
    _session: SessionContext,
) -> Result<Response, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let online = state.chat_service.models().online().await;

    let elapsed = start.elapsed().as_millis() as u64;
    let mut resp = ApiResponse::success(json!({ "models": online.models }), request_id, elapsed);
    if let Some(warning) = online.warning {
        resp = resp.with_notice(NoticeLevel::Error, warning);
    }
    Ok(resp.into_response())
}

/// PUT /api/v1/session/model - Select a model for this session.
///
/// Accepted only while the model is online at call time; otherwise the
/// selection is rejected and the session state is unchanged.
pub async fn select_model(
    State(state): State<AppState>,
    mut session: SessionContext,
    Json(body): Json<SelectModelRequest>,
) -> Result<Response, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let online = state.chat_service.models().online().await;
    session.binding.select(&body.model, &online)?;
    info!(user = %session.user, model = %body.model, "model selected");

    let redirect = body
        .chat_id
        .map(|id| format!("/chat/{id}"))
        .unwrap_or_else(|| "/".to_string());

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(json!({ "selected_model": body.model }), request_id, elapsed)
        .with_notice(
            NoticeLevel::Success,
            format!("Model switched to {}", body.model),
        )
        .with_redirect(redirect);

    Ok(with_cookies(
        resp.into_response(),
        &[session_cookie(MODEL_COOKIE, &body.model)],
    ))
}
