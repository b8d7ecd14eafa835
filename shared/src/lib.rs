//! Shared utilities and types for the EML materials backend

pub mod observability;
pub mod types;

pub use types::error::{BackendError, BackendResult};
