//! Response bodies that are not plain heroes or pages.

use herodex_core::Hero;
use serde::{Deserialize, Serialize};

/// `{ "message": ... }`, used for the root endpoint and every error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message body.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body returned after a successful delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Confirmation message.
    pub message: String,
    /// The hero that was removed.
    #[serde(rename = "deletedHero")]
    pub deleted_hero: Hero,
}

/// Liveness details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the server is answering.
    pub status: String,
    /// Heroes currently held.
    pub heroes: usize,
    /// Seconds since the server state was created.
    pub uptime_seconds: u64,
}
