//! Shared type definitions for the materials backend

pub mod error;

pub use error::{BackendError, BackendResult};
