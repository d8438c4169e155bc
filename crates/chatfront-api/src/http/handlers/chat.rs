//! Chat record HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/chats                - List chats (and resolve "home")
//! - POST   /api/v1/chats                - Create a chat
//! - GET    /api/v1/chats/{id}           - View a chat with models + binding
//! - PATCH  /api/v1/chats/{id}           - Rename a chat
//! - DELETE /api/v1/chats/{id}           - Delete a chat
//! - POST   /api/v1/chats/{id}/messages  - Submit a conversation turn
//! - POST   /api/v1/chats/{id}/duplicate - Duplicate a chat
//!
//! Every response carries the state to render, an optional redirect
//! target, and an optional transient notice; absent records degrade to a
//! redirect toward a safe default instead of a dead end.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use chatfront_core::chat::turn::{Attachment, TurnInput, TurnOutcome};
use chatfront_core::llm::binding::ModelBinding;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, NoticeLevel};
use crate::http::session::{clear_cookie, session_cookie, with_cookies, SessionContext, MODEL_COOKIE};
use crate::state::AppState;

/// Request body for a turn submission.
#[derive(Debug, Deserialize)]
pub struct SubmitTurnRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub attachment: Option<AttachmentPayload>,
}

/// File content attached to a submission, base64 over the wire.
#[derive(Debug, Deserialize)]
pub struct AttachmentPayload {
    pub filename: String,
    pub content_base64: String,
}

/// Request body for a rename.
#[derive(Debug, Deserialize)]
pub struct RenameChatRequest {
    pub title: String,
}

/// Parse a UUID from a path parameter, returning a 400 error on invalid
/// format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid chat id: {s}")))
}

fn chat_url(id: &Uuid) -> String {
    format!("/chat/{id}")
}

/// The `Set-Cookie` writing back a reconciled binding, when it changed.
fn binding_cookie(changed: bool, binding: &ModelBinding) -> Vec<String> {
    if !changed {
        return Vec::new();
    }
    match binding.selected() {
        Some(model) => vec![session_cookie(MODEL_COOKIE, model)],
        None => vec![clear_cookie(MODEL_COOKIE)],
    }
}

/// GET /api/v1/chats - List the user's chats.
///
/// Doubles as the "home" resolver: the redirect points at the most
/// recently modified chat, or at chat creation when none exist.
pub async fn list_chats(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Response, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chats = state.chat_service.list_chats(&session.user).await?;
    let redirect = chats
        .first()
        .map(|c| chat_url(&c.id))
        .unwrap_or_else(|| "/new".to_string());

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(json!({ "chats": chats }), request_id, elapsed)
        .with_redirect(redirect);
    Ok(resp.into_response())
}

/// POST /api/v1/chats - Create a fresh chat.
pub async fn create_chat(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Response, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let record = state.chat_service.create_chat(&session.user).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let redirect = chat_url(&record.id);
    let resp = ApiResponse::success(json!({ "chat": record }), request_id, elapsed)
        .with_redirect(redirect);
    Ok(resp.into_response())
}

/// GET /api/v1/chats/{id} - View a chat.
///
/// Returns the record, the sibling listing, the live model list, and the
/// session's reconciled model binding. The binding is re-evaluated here
/// on every view; when reconciliation moves it, the new value is written
/// back to the session cookie.
pub async fn view_chat(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();
    let id = parse_uuid(&id)?;

    let Some(chat) = state.chat_service.get_chat(&session.user, &id).await? else {
        let elapsed = start.elapsed().as_millis() as u64;
        return Ok(ApiResponse::error("CHAT_NOT_FOUND", "Chat not found.", request_id, elapsed)
            .with_redirect("/new")
            .into_response());
    };

    let online = state.chat_service.models().online().await;
    let mut binding = session.binding;
    let changed = binding.reconcile(&online);

    let chats = state.chat_service.list_chats(&session.user).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let mut resp = ApiResponse::success(
        json!({
            "chat": chat,
            "chats": chats,
            "models": online.models,
            "selected_model": binding.selected(),
        }),
        request_id,
        elapsed,
    );
    if let Some(warning) = &online.warning {
        resp = resp.with_notice(NoticeLevel::Error, warning.clone());
    }

    Ok(with_cookies(
        resp.into_response(),
        &binding_cookie(changed, &binding),
    ))
}

/// POST /api/v1/chats/{id}/messages - Submit one conversation turn.
///
/// The session binding is reconciled against the live model list first;
/// with no model online the submission aborts without touching the
/// record. A gateway failure still succeeds as a request: both the user
/// turn and the durable error turn are persisted, and the failure text
/// is echoed as a transient notice.
pub async fn submit_turn(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<String>,
    Json(body): Json<SubmitTurnRequest>,
) -> Result<Response, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();
    let id = parse_uuid(&id)?;

    let attachment = body
        .attachment
        .map(|payload| {
            let bytes = BASE64.decode(payload.content_base64.as_bytes()).map_err(|_| {
                AppError::Validation("Attachment content is not valid base64.".to_string())
            })?;
            Ok::<_, AppError>(Attachment {
                filename: payload.filename,
                bytes,
            })
        })
        .transpose()?;

    let online = state.chat_service.models().online().await;
    let mut binding = session.binding;
    let changed = binding.reconcile(&online);

    let input = TurnInput {
        prompt: body.prompt,
        attachment,
    };
    let outcome = state
        .chat_service
        .submit_turn(&session.user, &id, input, binding.selected())
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let redirect = chat_url(&id);
    let resp = match outcome {
        TurnOutcome::Completed { record } => {
            ApiResponse::success(json!({ "chat": record }), request_id, elapsed)
                .with_redirect(redirect)
        }
        TurnOutcome::Failed { record, warning } => {
            ApiResponse::success(json!({ "chat": record }), request_id, elapsed)
                .with_notice(NoticeLevel::Error, warning)
                .with_redirect(redirect)
        }
        TurnOutcome::Skipped => ApiResponse::success(json!({}), request_id, elapsed)
            .with_redirect(redirect),
    };

    Ok(with_cookies(
        resp.into_response(),
        &binding_cookie(changed, &binding),
    ))
}

/// PATCH /api/v1/chats/{id} - Rename a chat.
pub async fn rename_chat(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<String>,
    Json(body): Json<RenameChatRequest>,
) -> Result<Response, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();
    let id = parse_uuid(&id)?;

    let record = state
        .chat_service
        .rename_chat(&session.user, &id, &body.title)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let redirect = chat_url(&id);
    let resp = ApiResponse::success(json!({ "chat": record }), request_id, elapsed)
        .with_redirect(redirect);
    Ok(resp.into_response())
}

/// POST /api/v1/chats/{id}/duplicate - Duplicate a chat.
pub async fn duplicate_chat(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();
    let id = parse_uuid(&id)?;

    let copy = state
        .chat_service
        .duplicate_chat(&session.user, &id)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let redirect = chat_url(&copy.id);
    let resp = ApiResponse::success(json!({ "chat": copy }), request_id, elapsed)
        .with_redirect(redirect);
    Ok(resp.into_response())
}

/// DELETE /api/v1/chats/{id} - Delete a chat.
///
/// Deleting an already-deleted chat is a 404; other records are
/// unaffected either way.
pub async fn delete_chat(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();
    let id = parse_uuid(&id)?;

    state.chat_service.delete_chat(&session.user, &id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(json!({}), request_id, elapsed)
        .with_notice(NoticeLevel::Success, "Chat deleted.")
        .with_redirect("/");
    Ok(resp.into_response())
}
