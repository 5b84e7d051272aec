//! Error types for Herodex.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the hero store and its callers.
#[derive(Error, Debug)]
pub enum Error {
    /// No hero matched the lookup key.
    #[error("Hero not found: {key}")]
    HeroNotFound {
        /// The id or name fragment that was looked up.
        key: String,
    },

    /// The caller supplied an unusable request.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of what was wrong.
        message: String,
    },

    /// Reading or writing the snapshot failed.
    #[error("Storage error at {}: {message}", path.display())]
    Storage {
        /// Snapshot location.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Returns `true` if the error was caused by the caller's input rather
    /// than by the store itself.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::HeroNotFound { .. } | Self::InvalidRequest { .. })
    }

    /// Creates a not-found error for the given key.
    #[must_use]
    pub fn hero_not_found(key: impl ToString) -> Self {
        Self::HeroNotFound {
            key: key.to_string(),
        }
    }

    /// Creates an invalid request error with the given message.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a storage error for the given path.
    #[must_use]
    pub fn storage(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Storage {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Creates an internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
