//! # docportal-api
//!
//! HTTP API layer for DocPortal built on Axum. Every handler authenticates
//! the request, validates its parameters, performs one storage operation
//! through a service, and answers with JSON or a structured error.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
