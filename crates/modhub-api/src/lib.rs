//! # modhub-api
//!
//! HTTP API layer for the ModHub version catalog built on Axum.
//!
//! Provides the `/v1` catalog endpoints, middleware (CORS, request logging,
//! tracing, timeouts), extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
