//! Axum HTTP API server.
//!
//! This crate provides:
//! - Video upload with synchronous preview extraction
//! - Asynchronous job dispatch with in-memory progress tracking
//! - Output file serving
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod registry;
pub mod routes;
pub mod runner;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use registry::TaskRegistry;
pub use routes::create_router;
pub use state::AppState;
