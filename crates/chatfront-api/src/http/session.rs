//! Cookie-session identity extractor.
//!
//! The browser session is the opaque per-user identity store: `cf_user`
//! holds the validated username, `cf_model` the session's model
//! selection. The extractor materializes both into a [`SessionContext`]
//! scoped to one request; handlers write changed state back via
//! `Set-Cookie`. This is an identity mechanism, not a security boundary.

use std::collections::HashMap;

use axum::extract::FromRequestParts;
use axum::http::header::{HeaderMap, COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::response::Response;

use chatfront_core::llm::binding::ModelBinding;
use chatfront_types::user::UserName;

use crate::http::error::AppError;
use crate::state::AppState;

/// Cookie carrying the username.
pub const USER_COOKIE: &str = "cf_user";
/// Cookie carrying the session's selected model.
pub const MODEL_COOKIE: &str = "cf_model";

/// Per-request session state: who the user is and which model their
/// session has bound.
pub struct SessionContext {
    pub user: UserName,
    pub binding: ModelBinding,
}

impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = parse_cookies(&parts.headers);

        let raw_user = cookies.get(USER_COOKIE).ok_or_else(|| {
            AppError::Unauthorized("No identity established. Log in first.".to_string())
        })?;
        // A stale or hand-edited cookie goes back through login rather
        // than reaching the store with an unvalidated directory name.
        let user = UserName::new(raw_user)
            .map_err(|e| AppError::Unauthorized(format!("Invalid session identity: {e}")))?;

        let selected = cookies
            .get(MODEL_COOKIE)
            .filter(|v| !v.is_empty())
            .cloned();

        Ok(SessionContext {
            user,
            binding: ModelBinding::new(selected),
        })
    }
}

/// Collect `name=value` pairs from all `Cookie` headers.
fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for header in headers.get_all(COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                cookies.insert(name.to_string(), value.to_string());
            }
        }
    }
    cookies
}

/// `Set-Cookie` value storing a session field.
pub fn session_cookie(name: &str, value: &str) -> String {
    format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value expiring a session field.
pub fn clear_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Append `Set-Cookie` headers to a response.
///
/// A cookie string that is not a valid header value is skipped rather
/// than failing the response.
pub fn with_cookies(mut response: Response, cookies: &[String]) -> Response {
    for cookie in cookies {
        if let Ok(value) = HeaderValue::from_str(cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}
