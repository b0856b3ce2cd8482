//! Error types for the travel API client.

use serde::Deserialize;
use travia_core::error::TraviaError;

/// Errors from the Amadeus API or the transport underneath it.
#[derive(Debug, thiserror::Error)]
pub enum TravelApiError {
    /// HTTP 429 from the provider.
    #[error("rate limited by provider")]
    RateLimited,
    /// A structured error the provider reported in its response body.
    #[error("provider error (code {code:?}, status {status}): {detail}")]
    Upstream {
        code: Option<i64>,
        status: u16,
        detail: String,
    },
    /// Token acquisition or refresh failed.
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl TravelApiError {
    /// Whether the provider itself is down, which triggers the web-search
    /// fallback. Error code 141 or HTTP 500.
    pub fn is_system_down(&self) -> bool {
        matches!(
            self,
            TravelApiError::Upstream { code: Some(141), .. }
                | TravelApiError::Upstream { status: 500, .. }
        )
    }
}

impl From<reqwest::Error> for TravelApiError {
    fn from(err: reqwest::Error) -> Self {
        TravelApiError::Transport(err.to_string())
    }
}

impl From<TravelApiError> for TraviaError {
    fn from(err: TravelApiError) -> Self {
        TraviaError::Travel(err.to_string())
    }
}

/// Amadeus error body, e.g. `{"errors": [{"code": 141, "status": 500, ...}]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEntry {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorBody {
    /// Map the first reported error to a [`TravelApiError`], falling back to
    /// the HTTP status when the body is empty or unstructured.
    pub fn into_error(self, http_status: u16) -> TravelApiError {
        if http_status == 429 {
            return TravelApiError::RateLimited;
        }
        match self.errors.into_iter().next() {
            Some(entry) => TravelApiError::Upstream {
                code: entry.code,
                status: entry.status.unwrap_or(http_status),
                detail: entry
                    .detail
                    .or(entry.title)
                    .unwrap_or_else(|| "no detail provided".to_string()),
            },
            None => TravelApiError::Upstream {
                code: None,
                status: http_status,
                detail: "no error body".to_string(),
            },
        }
    }
}
