//! Chat record persistence adapters.

pub mod fs;

pub use fs::FsChatStore;
