//! Business logic for the Chatfront chat lifecycle.
//!
//! This crate defines the trait seams (`ChatStore`, `ModelGateway`) and
//! the orchestration built on top of them: the conversation turn
//! executor, the session model binder, the model directory, and per-record
//! mutation locking. Concrete adapters live in `chatfront-infra`;
//! this crate never depends on infrastructure.

pub mod chat;
pub mod llm;
