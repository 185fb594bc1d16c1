//! services/docvault/src/error.rs
//!
//! Defines the primary error type for the client service.

use crate::config::ConfigError;
use docvault_core::{ActionError, ApiError, ValidationError};

/// The primary error type for the `docvault` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A normalized error returned by the document backend.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Input rejected before any request was sent.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Represents a failure while building the HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g., reading an upload from disk).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Represents a failure to serialize output.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Bad command-line arguments.
    #[error("Usage: {0}")]
    Usage(String),
}

impl From<ActionError> for AppError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::Validation(e) => AppError::Validation(e),
            ActionError::Api(e) => AppError::Api(e),
        }
    }
}
