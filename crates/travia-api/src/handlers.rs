//! Route handler functions for all API endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use travia_agent::{AgentInput, ChatMessage, Session};
use travia_core::types::TravelIntent;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request and response types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    /// Omit to start a new conversation.
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub session_id: Uuid,
    pub intent: Option<TravelIntent>,
    pub used_flight_api: bool,
    pub used_hotel_api: bool,
    pub conversation_history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub active_sessions: usize,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /query. Runs one turn of the conversation.
pub async fn query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let sanitized = travia_agent::QuerySanitizer::sanitize(&req.query)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let session_id = match req.session_id.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            Uuid::parse_str(raw)
                .map_err(|_| ApiError::BadRequest("Invalid session ID format".to_string()))?,
        ),
    };

    let mut session = state.sessions.get_or_create(session_id)?;
    session
        .conversation_history
        .push(ChatMessage::user(sanitized.clone()));

    let outcome = state
        .agent
        .run(AgentInput {
            query: sanitized,
            history: session.conversation_history.clone(),
            last_flights: session.last_flights.clone(),
            last_hotels: session.last_hotels.clone(),
        })
        .await?;

    session
        .conversation_history
        .push(ChatMessage::assistant(outcome.response.clone()));
    session.last_intent = outcome.intent.clone();
    session.last_flights = outcome.flights.clone();
    session.last_hotels = outcome.hotels.clone();
    state.sessions.update(session.clone())?;

    Ok(Json(QueryResponse {
        answer: outcome.response,
        session_id: session.session_id,
        intent: outcome.intent,
        used_flight_api: !outcome.flights.is_empty(),
        used_hotel_api: !outcome.hotels.is_empty(),
        conversation_history: session.conversation_history,
    }))
}

/// GET /session/{id}.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    let id = Uuid::parse_str(&session_id)
        .map_err(|_| ApiError::BadRequest("Invalid session ID format".to_string()))?;
    match state.sessions.get(id)? {
        Some(session) => Ok(Json(session)),
        None => Err(ApiError::NotFound("Session not found".to_string())),
    }
}

/// DELETE /session/{id}.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = Uuid::parse_str(&session_id)
        .map_err(|_| ApiError::BadRequest("Invalid session ID format".to_string()))?;
    if state.sessions.delete(id)? {
        Ok(Json(DeleteResponse {
            message: "Session cleared".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("Session not found".to_string()))
    }
}

/// GET /health.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        active_sessions: state.sessions.len()?,
        uptime_secs: state.start_time.elapsed().as_secs(),
    }))
}
