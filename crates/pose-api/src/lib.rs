//! Axum HTTP server for single-pose estimation.
//!
//! This crate provides:
//! - `POST /`: data URI image in, PoseNet pose in source pixel space out
//! - Per-request draw surfaces and a load-once model handle
//! - CORS, body limits, request IDs and structured request logging
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::PoseService;
pub use state::AppState;
