//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression, rate
//! limiting, and all endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::rate_limit::RateLimiter;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // The browser frontend is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_per_sec = state
        .config
        .lock()
        .map(|c| c.general.rate_limit_per_sec)
        .unwrap_or(100);

    // Only /query is budgeted; session reads and deletes stay cheap.
    let query_route = Router::new()
        .route("/query", post(handlers::query))
        .layer(axum::middleware::from_fn(
            crate::rate_limit::rate_limit_middleware,
        ))
        .layer(axum::Extension(RateLimiter::new(max_per_sec)));

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/session/{session_id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .merge(query_route)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured port.
pub async fn start_server(state: AppState) -> Result<(), travia_core::error::TraviaError> {
    let port = state
        .config
        .lock()
        .map(|c| c.general.port)
        .unwrap_or(8000);
    let addr = format!("127.0.0.1:{}", port);

    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| travia_core::error::TraviaError::Api(format!("Failed to bind: {}", e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| travia_core::error::TraviaError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
