//! Error types for the LLM client.

use travia_core::error::TraviaError;

/// Errors from talking to the local LLM runtime.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("model produced invalid output: {0}")]
    InvalidOutput(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Transport(err.to_string())
    }
}

impl From<LlmError> for TraviaError {
    fn from(err: LlmError) -> Self {
        TraviaError::Llm(err.to_string())
    }
}
