//! Identity HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/session - Establish a per-browser identity
//! - DELETE /api/v1/session - Clear the identity (logout)
//!
//! "Login" here is only the establishment of a storage namespace for the
//! browser session; there is no credential check by design.

use std::time::Instant;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use chatfront_types::user::UserName;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::http::session::{clear_cookie, session_cookie, with_cookies, MODEL_COOKIE, USER_COOKIE};
use crate::state::AppState;

/// Request body for identity establishment.
#[derive(Debug, Deserialize)]
pub struct EstablishIdentityRequest {
    pub username: String,
}

/// POST /api/v1/session - Establish identity for this browser session.
///
/// An empty or unusable username is a validation failure; a fresh
/// session starts with no model selected.
pub async fn establish_identity(
    State(_state): State<AppState>,
    Json(body): Json<EstablishIdentityRequest>,
) -> Result<Response, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let user = UserName::new(&body.username)?;
    info!(user = %user, "identity established");

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(json!({ "username": user.as_str() }), request_id, elapsed)
        .with_redirect("/");

    Ok(with_cookies(
        resp.into_response(),
        &[
            session_cookie(USER_COOKIE, user.as_str()),
            clear_cookie(MODEL_COOKIE),
        ],
    ))
}

/// DELETE /api/v1/session - Clear the identity and model selection.
pub async fn clear_identity(State(_state): State<AppState>) -> Response {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(json!({}), request_id, elapsed).with_redirect("/login");

    with_cookies(
        resp.into_response(),
        &[clear_cookie(USER_COOKIE), clear_cookie(MODEL_COOKIE)],
    )
}
