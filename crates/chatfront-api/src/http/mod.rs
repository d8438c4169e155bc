//! HTTP/REST API layer for Chatfront.
//!
//! Axum-based REST API at `/api/v1/` with cookie-session identity,
//! envelope response format, and CORS support. The HTML rendering layer
//! consumes these endpoints; every response carries the state to render
//! plus an optional redirect target and transient notice.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod session;
