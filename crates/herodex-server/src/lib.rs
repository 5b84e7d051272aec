//! # Herodex Server
//!
//! HTTP API over the hero catalogue.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, Server, ServerConfig, ServerConfigBuilder, DEFAULT_PORT};
