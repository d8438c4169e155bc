//! Remote LLM Manager gateway client.

pub mod http;
pub mod types;

pub use http::HttpModelGateway;
