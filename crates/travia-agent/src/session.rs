//! In-memory conversation sessions.
//!
//! Sessions hold the message history and the last search results so
//! follow-up questions can reuse them. Expired sessions are pruned lazily
//! on access; nothing persists across restarts.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use travia_core::error::{Result, TraviaError};
use travia_core::types::{FlightOffer, HotelOffer, TravelIntent};

/// One turn of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "user" or "assistant".
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Per-conversation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: Uuid,
    pub conversation_history: Vec<ChatMessage>,
    pub last_intent: Option<TravelIntent>,
    pub last_flights: Vec<FlightOffer>,
    pub last_hotels: Vec<HotelOffer>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    fn new(session_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            conversation_history: Vec::new(),
            last_intent: None,
            last_flights: Vec::new(),
            last_hotels: Vec::new(),
            created_at: now,
            last_active: now,
        }
    }
}

/// Thread-safe store of active sessions.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
    timeout: Duration,
}

impl SessionStore {
    /// `timeout_minutes` is how long an idle session survives.
    pub fn new(timeout_minutes: u64) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            timeout: Duration::minutes(timeout_minutes as i64),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Session>>> {
        self.sessions
            .lock()
            .map_err(|_| TraviaError::Session("session store lock poisoned".to_string()))
    }

    /// Fetch an existing session or start a new one. A provided id that has
    /// expired (or never existed) starts a fresh session under that id.
    pub fn get_or_create(&self, session_id: Option<Uuid>) -> Result<Session> {
        let mut sessions = self.lock()?;
        let cutoff = Utc::now() - self.timeout;
        sessions.retain(|_, s| s.last_active > cutoff);

        let id = session_id.unwrap_or_else(Uuid::new_v4);
        let session = sessions.entry(id).or_insert_with(|| {
            tracing::info!(session_id = %id, "Created new session");
            Session::new(id)
        });
        Ok(session.clone())
    }

    pub fn get(&self, session_id: Uuid) -> Result<Option<Session>> {
        let sessions = self.lock()?;
        Ok(sessions.get(&session_id).cloned())
    }

    /// Write a session back, stamping its activity time.
    pub fn update(&self, mut session: Session) -> Result<()> {
        session.last_active = Utc::now();
        let mut sessions = self.lock()?;
        sessions.insert(session.session_id, session);
        Ok(())
    }

    /// Remove a session. Returns false if it did not exist.
    pub fn delete(&self, session_id: Uuid) -> Result<bool> {
        let mut sessions = self.lock()?;
        Ok(sessions.remove(&session_id).is_some())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }
}
