//! Error types for the filegate-store crate

use crate::key::ObjectKey;
use thiserror::Error;

/// Result type alias using `StoreError`
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during object storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// No object at the given key
    #[error("object not found: {0}")]
    NotFound(ObjectKey),

    /// The credential's scope does not cover the attempted action
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The backend exists but cannot serve the request right now
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend call did not complete in time
    #[error("backend timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Could not reach the backend at all
    #[error("connection error: {0}")]
    Connection(String),

    /// Unexpected HTTP-level failure from the backend
    #[error("http error: {0}")]
    Http(String),

    /// Store was configured incorrectly
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout { seconds: 30 }
        } else if err.is_connect() {
            StoreError::Connection(err.to_string())
        } else {
            StoreError::Http(err.to_string())
        }
    }
}
