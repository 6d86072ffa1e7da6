//! Read-only HTTP API over the mirrored product catalog.
//!
//! This crate provides the Axum surface in front of [`catalog_store`]:
//!
//! - **REST endpoints** for listing, looking up, filtering, and searching
//!   products, plus the distinct category list
//! - **Status and health** endpoints that answer even before the first
//!   snapshot has loaded
//! - **Environment configuration** and server lifecycle with graceful
//!   shutdown on a cancellation token
//!
//! Query failures map to HTTP statuses in [`error::ApiError`]: not ready is
//! 503, unknown id is 404, missing parameters are 400.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use config::{AppConfig, ConfigError, LogFormat};
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
