//! Per-second budget for the query endpoint.
//!
//! Each query runs an LLM call and potentially dozens of travel-API
//! requests, so `/query` is throttled while the cheap session and health
//! endpoints are not. The budget comes from `general.rate_limit_per_sec`
//! in the configuration.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Extension, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Fixed one-second window. The whole window state lives in a single
/// atomic word: epoch second in the high 32 bits, request count in the
/// low 32, updated with a compare-and-swap loop.
#[derive(Clone)]
pub struct RateLimiter {
    max_per_sec: u64,
    state: Arc<AtomicU64>,
}

const COUNT_MASK: u64 = 0xFFFF_FFFF;

impl RateLimiter {
    pub fn new(max_per_sec: u64) -> Self {
        Self {
            max_per_sec,
            state: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Count this request against the current window. Returns false once
    /// the window's budget is spent.
    fn try_acquire(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            & COUNT_MASK;

        let mut observed = self.state.load(Ordering::Relaxed);
        loop {
            let window = observed >> 32;
            let count = observed & COUNT_MASK;
            let next_count = if window == now { count + 1 } else { 1 };
            let next = (now << 32) | next_count.min(COUNT_MASK);
            match self.state.compare_exchange_weak(
                observed,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next_count <= self.max_per_sec,
                Err(current) => observed = current,
            }
        }
    }
}

/// Axum middleware enforcing the query budget.
pub async fn rate_limit_middleware(
    Extension(limiter): Extension<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.try_acquire() {
        next.run(req).await
    } else {
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": "too_many_requests",
                "message": "Rate limit exceeded"
            })),
        )
            .into_response()
    }
}
