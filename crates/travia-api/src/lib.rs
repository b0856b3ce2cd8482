//! HTTP API for the travel assistant.
//!
//! Exposes the query endpoint, session management, and a health check over
//! axum, with CORS, request tracing, and rate limiting.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use routes::{create_router, start_server};
pub use state::AppState;
