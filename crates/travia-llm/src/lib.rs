//! Ollama chat client for structured travel-intent extraction.
//!
//! The agent talks to the LLM only through the [`IntentExtractor`] trait so
//! tests can substitute a scripted extractor for the real server.

pub mod client;
pub mod error;

pub use client::{IntentExtractor, OllamaClient, StaticExtractor};
pub use error::LlmError;
