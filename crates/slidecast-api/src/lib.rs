//! Axum HTTP API server.
//!
//! This crate provides:
//! - Project submission and background rendering
//! - Job status polling and cancellation
//! - CORS, request logging and body limits

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
