//! Observability bootstrap for Chatfront.

pub mod tracing_setup;
