//! Core crate for Travia: configuration, errors, and shared domain types.
//!
//! Everything here is dependency-light so that the LLM, travel-API, agent,
//! and HTTP crates can all build on a common vocabulary.

pub mod config;
pub mod dates;
pub mod error;
pub mod types;

pub use config::TraviaConfig;
pub use error::{Result, TraviaError};
pub use types::{
    FlightOffer, FlightSegment, HotelInfo, HotelOffer, IntentKind, PricedOffer, RoomInfo,
    TravelIntent,
};
