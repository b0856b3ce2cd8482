//! Ollama chat client with structured (JSON-schema constrained) output.
//!
//! Uses Ollama's `/api/chat` endpoint with the `format` field set to the
//! `TravelIntent` JSON schema, so the model is forced to answer with a
//! parseable intent object.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use travia_core::config::LlmConfig;
use travia_core::types::TravelIntent;

use crate::error::LlmError;

/// Extracts a structured [`TravelIntent`] from a fully assembled prompt.
///
/// The agent builds the prompt (rules, resolved dates, conversation
/// history, current query); implementations only run the model.
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    async fn extract(&self, prompt: &str) -> Result<TravelIntent, LlmError>;
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    format: serde_json::Value,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// JSON schema handed to Ollama's `format` field.
///
/// Kept in sync with [`TravelIntent`]'s serde representation.
fn intent_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "intent": {
                "type": "string",
                "enum": ["flight_search", "hotel_search", "both", "clarify", "follow_up"]
            },
            "origin": { "type": ["string", "null"] },
            "destination": { "type": ["string", "null"] },
            "check_in": { "type": ["string", "null"] },
            "check_out": { "type": ["string", "null"] },
            "travelers": { "type": "integer", "minimum": 1 },
            "reasoning": { "type": "string" }
        },
        "required": ["intent", "reasoning"]
    })
}

// =============================================================================
// OllamaClient
// =============================================================================

/// Production extractor backed by a local Ollama server.
pub struct OllamaClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl OllamaClient {
    /// Create a client from the LLM section of the config.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        Ok(Self { http, config })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl IntentExtractor for OllamaClient {
    async fn extract(&self, prompt: &str) -> Result<TravelIntent, LlmError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            format: intent_schema(),
            options: ChatOptions {
                temperature: self.config.temperature,
            },
        };

        let response = self.http.post(self.chat_url()).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Ollama returned an error status");
            return Err(LlmError::Status(status.as_u16()));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidOutput(e.to_string()))?;

        let intent: TravelIntent = serde_json::from_str(&body.message.content)
            .map_err(|e| LlmError::InvalidOutput(format!("{}: {}", e, body.message.content)))?;

        tracing::debug!(intent = ?intent.intent, "Intent extracted");
        Ok(intent)
    }
}

// =============================================================================
// StaticExtractor (test double)
// =============================================================================

/// Extractor that returns pre-scripted intents in order, then repeats the
/// last one. Lets agent and API tests run without an LLM server.
pub struct StaticExtractor {
    scripted: std::sync::Mutex<Vec<TravelIntent>>,
}

impl StaticExtractor {
    /// Always answer with the single given intent.
    pub fn new(intent: TravelIntent) -> Self {
        Self {
            scripted: std::sync::Mutex::new(vec![intent]),
        }
    }

    /// Answer with each intent in turn; the last one repeats.
    pub fn sequence(intents: Vec<TravelIntent>) -> Self {
        assert!(!intents.is_empty(), "sequence requires at least one intent");
        Self {
            scripted: std::sync::Mutex::new(intents),
        }
    }
}

#[async_trait]
impl IntentExtractor for StaticExtractor {
    async fn extract(&self, _prompt: &str) -> Result<TravelIntent, LlmError> {
        let mut scripted = self
            .scripted
            .lock()
            .map_err(|e| LlmError::InvalidOutput(format!("script lock poisoned: {}", e)))?;
        if scripted.len() > 1 {
            Ok(scripted.remove(0))
        } else {
            Ok(scripted[0].clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use travia_core::types::IntentKind;

    #[test]
    fn test_chat_url_strips_trailing_slash() {
        let client = OllamaClient::new(LlmConfig {
            base_url: "http://127.0.0.1:11434/".to_string(),
            ..LlmConfig::default()
        })
        .unwrap();
        assert_eq!(client.chat_url(), "http://127.0.0.1:11434/api/chat");
    }

    #[test]
    fn test_intent_schema_lists_all_kinds() {
        let schema = intent_schema();
        let kinds = schema["properties"]["intent"]["enum"].as_array().unwrap();
        assert_eq!(kinds.len(), 5);
        assert!(kinds.iter().any(|k| k == "flight_search"));
        assert!(kinds.iter().any(|k| k == "follow_up"));
    }

    #[test]
    fn test_schema_matches_serde_representation() {
        // A document shaped like the schema must deserialize into TravelIntent.
        let content = r#"{
            "intent": "both",
            "origin": "BOM",
            "destination": "DEL",
            "check_in": "2026-09-01",
            "check_out": "2026-09-03",
            "travelers": 2,
            "reasoning": "all fields present"
        }"#;
        let intent: TravelIntent = serde_json::from_str(content).unwrap();
        assert_eq!(intent.intent, IntentKind::Both);
        assert_eq!(intent.travelers, 2);
    }

    #[tokio::test]
    async fn test_static_extractor_repeats_single() {
        let extractor = StaticExtractor::new(TravelIntent::clarify("need more info"));
        let a = extractor.extract("anything").await.unwrap();
        let b = extractor.extract("anything else").await.unwrap();
        assert_eq!(a.intent, IntentKind::Clarify);
        assert_eq!(b.reasoning, "need more info");
    }

    #[tokio::test]
    async fn test_static_extractor_sequence() {
        let extractor = StaticExtractor::sequence(vec![
            TravelIntent {
                intent: IntentKind::FlightSearch,
                origin: Some("BOM".to_string()),
                destination: Some("DEL".to_string()),
                check_in: Some("2099-01-01".to_string()),
                check_out: None,
                travelers: 1,
                reasoning: String::new(),
            },
            TravelIntent::clarify("second"),
        ]);
        let first = extractor.extract("q1").await.unwrap();
        let second = extractor.extract("q2").await.unwrap();
        let third = extractor.extract("q3").await.unwrap();
        assert_eq!(first.intent, IntentKind::FlightSearch);
        assert_eq!(second.intent, IntentKind::Clarify);
        // Last intent repeats once the script is exhausted.
        assert_eq!(third.intent, IntentKind::Clarify);
    }

    #[tokio::test]
    async fn test_extract_against_unreachable_server() {
        // Port 9 (discard) is not running an HTTP server; the client must
        // surface a transport error rather than panic.
        let client = OllamaClient::new(LlmConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..LlmConfig::default()
        })
        .unwrap();
        let result = client.extract("find me a flight").await;
        assert!(matches!(result, Err(LlmError::Transport(_))));
    }
}
