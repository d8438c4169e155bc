//! Application error type mapping the core taxonomy to HTTP status codes
//! and the envelope format.
//!
//! No core failure terminates request handling further up: every variant
//! renders as a status code, a machine-readable code, a flash-style
//! notice, and -- where one exists -- a safe redirect target.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatfront_types::error::{ChatStoreError, SelectionError, TurnError, UserError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat record persistence errors.
    Store(ChatStoreError),
    /// Turn execution errors.
    Turn(TurnError),
    /// Model selection rejection.
    Selection(SelectionError),
    /// Username validation failure.
    User(UserError),
    /// No identity established for this request.
    Unauthorized(String),
    /// Malformed request input.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatStoreError> for AppError {
    fn from(e: ChatStoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        AppError::Turn(e)
    }
}

impl From<SelectionError> for AppError {
    fn from(e: SelectionError) -> Self {
        AppError::Selection(e)
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        AppError::User(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, redirect) = match &self {
            AppError::Store(ChatStoreError::NotFound) => (
                StatusCode::NOT_FOUND,
                "CHAT_NOT_FOUND",
                "Chat not found.".to_string(),
                Some("/"),
            ),
            AppError::Store(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.to_string(),
                None,
            ),
            AppError::Turn(TurnError::NoModelAvailable) => (
                StatusCode::CONFLICT,
                "NO_MODEL_ONLINE",
                "No models online.".to_string(),
                None,
            ),
            AppError::Turn(TurnError::Store(ChatStoreError::NotFound)) => (
                StatusCode::NOT_FOUND,
                "CHAT_NOT_FOUND",
                "Chat not found.".to_string(),
                Some("/"),
            ),
            AppError::Turn(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "TURN_ERROR",
                e.to_string(),
                None,
            ),
            AppError::Selection(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_MODEL",
                e.to_string(),
                None,
            ),
            AppError::User(e) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                e.to_string(),
                None,
            ),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                msg.clone(),
                Some("/login"),
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
                None,
            ),
        };

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "notice": { "level": "error", "message": message },
            "redirect": redirect,
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
