//! Amadeus Self-Service API client: flight offers, hotel listings, hotel
//! offers, and location lookups, behind the [`TravelApi`] trait.
//!
//! OAuth2 token handling lives in [`token`]; responses are normalized into
//! `travia-core` domain types so nothing downstream sees wire JSON.

pub mod cache;
pub mod client;
pub mod error;
pub mod token;

pub use cache::AirportCityCache;
pub use client::{AmadeusClient, Location, TravelApi};
pub use error::TravelApiError;
pub use token::TokenManager;
