//! Axum HTTP API server.
//!
//! This crate provides:
//! - `POST /generate` and `POST /reset_topics` over the job orchestrator
//! - Static serving of finished videos
//! - Watch-time logging per served video
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod watch;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
pub use watch::WatchTracker;
