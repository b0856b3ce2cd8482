//! Application state shared across all route handlers.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use travia_agent::{SessionStore, TravelAgent};
use travia_core::config::TraviaConfig;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Mutex<TraviaConfig>>,
    /// The agent pipeline that answers queries.
    pub agent: Arc<TravelAgent>,
    /// In-memory conversation sessions.
    pub sessions: Arc<SessionStore>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: TraviaConfig, agent: TravelAgent) -> Self {
        let sessions = SessionStore::new(config.chat.session_timeout_minutes as u64);
        Self {
            config: Arc::new(Mutex::new(config)),
            agent: Arc::new(agent),
            sessions: Arc::new(sessions),
            start_time: Instant::now(),
        }
    }
}
