use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, TraviaError};

/// Top-level configuration for the Travia backend.
///
/// Loaded from `travia.toml` by default. Each section corresponds to a
/// subsystem; all sections have serde defaults so a partial file loads.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraviaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub amadeus: AmadeusConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
}

impl TraviaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Amadeus credentials from `AMADEUS_CLIENT_ID` / `AMADEUS_CLIENT_SECRET`
    /// override whatever the file contains.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: TraviaConfig = toml::from_str(&content)?;
        config.amadeus.apply_env_overrides();
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                let mut config = Self::default();
                config.amadeus.apply_env_overrides();
                config
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| TraviaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Port the HTTP API binds to.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Query requests allowed per second before the API returns 429.
    pub rate_limit_per_sec: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            log_level: "info".to_string(),
            rate_limit_per_sec: 100,
        }
    }
}

/// Local LLM runtime settings (Ollama).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the Ollama server.
    pub base_url: String,
    /// Model name to request.
    pub model: String,
    /// Sampling temperature. Intent extraction wants determinism.
    pub temperature: f64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            temperature: 0.0,
            timeout_secs: 120,
        }
    }
}

/// Travel-data provider (Amadeus) settings.
///
/// Both credential fields are redacted from Debug output so they cannot
/// leak through logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmadeusConfig {
    /// OAuth2 client id.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// API base URL. The test environment by default.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl AmadeusConfig {
    /// Let environment variables win over the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("AMADEUS_CLIENT_ID") {
            self.client_id = id;
        }
        if let Ok(secret) = std::env::var("AMADEUS_CLIENT_SECRET") {
            self.client_secret = secret;
        }
    }
}

impl Default for AmadeusConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            base_url: "https://test.api.amadeus.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for AmadeusConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmadeusConfig")
            .field("client_id", &"***")
            .field("client_secret", &"***")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum user query length in characters.
    pub max_query_length: usize,
    /// Number of prior history messages carried into the intent prompt.
    pub context_messages: usize,
    /// Session timeout in minutes.
    pub session_timeout_minutes: u32,
    /// Maximum flight/hotel results included in an answer.
    pub max_results: usize,
    /// EUR to INR conversion rate used when formatting prices.
    pub eur_to_inr: f64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_query_length: 1000,
            context_messages: 4,
            session_timeout_minutes: 30,
            max_results: 5,
            eur_to_inr: 107.19,
        }
    }
}

/// Web-search fallback settings, used when the travel API is down.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Whether the web-search fallback is enabled at all.
    pub enabled: bool,
    /// SearXNG instances tried in order until one answers.
    pub searxng_instances: Vec<String>,
    /// Per-instance request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            searxng_instances: vec![
                "https://searx.be/search".to_string(),
                "https://search.bus-hit.me/search".to_string(),
                "https://searx.tiekoetter.com/search".to_string(),
                "https://paulgo.io/search".to_string(),
            ],
            timeout_secs: 10,
        }
    }
}
