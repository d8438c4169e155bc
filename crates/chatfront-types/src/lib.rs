//! Shared domain types for Chatfront.
//!
//! This crate contains the core domain types used across the Chatfront
//! front-end: chat records, messages, user identity, configuration, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod user;
