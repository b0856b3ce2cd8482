//! User query sanitization.
//!
//! Rejects empty or oversized input, script/code injection markers, and SQL
//! injection shapes, then collapses whitespace. Runs before anything else
//! touches the query.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum accepted query length in characters.
pub const MAX_QUERY_LENGTH: usize = 1000;

static BLOCKED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)<script>",
        r"(?i)javascript:",
        r"(?i)onerror=",
        r"(?i)onclick=",
        r"(?i)eval\(",
        r"(?i)exec\(",
        r"(?i)__import__",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("blocked pattern must compile"))
    .collect()
});

static SQL_INJECTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)'\s*OR\s*'1'\s*=\s*'1",
        r"(?i)\bDROP\s+TABLE\b",
        r"(?i)\bUNION\s+SELECT\b",
        r"--\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("injection pattern must compile"))
    .collect()
});

/// Why a query was rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SanitizeError {
    #[error("Query cannot be empty")]
    Empty,
    #[error("Query too long (max {MAX_QUERY_LENGTH} characters)")]
    TooLong,
    #[error("Query contains potentially malicious content")]
    BlockedContent,
    #[error("Query contains invalid characters")]
    InvalidCharacters,
}

/// Validates and normalizes raw user queries.
pub struct QuerySanitizer;

impl QuerySanitizer {
    /// Return the cleaned query or the reason it was rejected.
    pub fn sanitize(query: &str) -> Result<String, SanitizeError> {
        if query.trim().is_empty() {
            return Err(SanitizeError::Empty);
        }
        if query.chars().count() > MAX_QUERY_LENGTH {
            return Err(SanitizeError::TooLong);
        }

        for pattern in BLOCKED_PATTERNS.iter() {
            if pattern.is_match(query) {
                tracing::warn!(pattern = pattern.as_str(), "Blocked malicious query pattern");
                return Err(SanitizeError::BlockedContent);
            }
        }
        for pattern in SQL_INJECTION_PATTERNS.iter() {
            if pattern.is_match(query) {
                tracing::warn!(pattern = pattern.as_str(), "Blocked injection attempt");
                return Err(SanitizeError::InvalidCharacters);
            }
        }

        Ok(query.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}
