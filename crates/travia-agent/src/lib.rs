//! The conversational travel agent: query sanitization, intent extraction
//! and validation, flight and hotel search, clarification, web-search
//! fallback, and response synthesis.
//!
//! [`TravelAgent`] wires the pipeline together; [`SessionStore`] keeps
//! per-conversation state between requests.

pub mod airports;
pub mod graph;
pub mod intent;
pub mod prompt;
pub mod sanitize;
pub mod session;
pub mod synthesis;
pub mod websearch;

pub use airports::AirportDirectory;
pub use graph::{AgentInput, AgentOutcome, TravelAgent};
pub use sanitize::{QuerySanitizer, SanitizeError};
pub use session::{ChatMessage, Session, SessionStore};
pub use websearch::{SearchResult, SearxSearcher, WebSearcher};
