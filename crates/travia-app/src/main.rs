//! Travia backend binary - composition root.
//!
//! Ties the crates together into a single executable:
//! 1. Load configuration from TOML (credentials from the environment)
//! 2. Build the LLM and travel API clients
//! 3. Assemble the agent pipeline and session store
//! 4. Start the axum REST API server

mod cli;

use std::sync::Arc;

use clap::Parser;

use travia_agent::{SearxSearcher, TravelAgent};
use travia_amadeus::AmadeusClient;
use travia_api::{routes, AppState};
use travia_core::config::TraviaConfig;
use travia_llm::OllamaClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();

    // Config first so the log level can come from it.
    let config_file = args.resolve_config_path();
    let mut config = TraviaConfig::load_or_default(&config_file);
    config.general.port = args.resolve_port(config.general.port);
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }

    // Tracing. RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(config.general.log_level.clone())
            }),
        )
        .init();

    tracing::info!("Starting Travia v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    if config.amadeus.client_id.is_empty() || config.amadeus.client_secret.is_empty() {
        tracing::warn!(
            "Amadeus credentials missing; set AMADEUS_CLIENT_ID and AMADEUS_CLIENT_SECRET"
        );
    }

    // Clients.
    let extractor = OllamaClient::new(config.llm.clone())?;
    tracing::info!(
        base_url = config.llm.base_url.as_str(),
        model = config.llm.model.as_str(),
        "LLM client ready"
    );

    let travel = AmadeusClient::new(config.amadeus.clone())?;
    tracing::info!(base_url = config.amadeus.base_url.as_str(), "Travel API client ready");

    let searcher = SearxSearcher::new(&config.fallback)?;
    if config.fallback.enabled {
        tracing::info!(
            instances = config.fallback.searxng_instances.len(),
            "Web-search fallback enabled"
        );
    }

    // Agent and API state.
    let agent = TravelAgent::new(
        Arc::new(extractor),
        Arc::new(travel),
        Arc::new(searcher),
        config.chat.clone(),
        &config.fallback,
    );
    let state = AppState::new(config, agent);
    tracing::info!("Agent pipeline and session store initialized");

    routes::start_server(state).await?;

    Ok(())
}
