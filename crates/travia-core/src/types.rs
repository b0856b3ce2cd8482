//! Shared domain types: travel intent and normalized flight/hotel offers.
//!
//! The Amadeus crate parses wire JSON into these; the agent routes on the
//! intent and the synthesis step formats the offers.

use serde::{Deserialize, Serialize};

/// What the user is asking for, as classified by the LLM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// One-way flight search.
    FlightSearch,
    /// Hotel search in a destination city.
    HotelSearch,
    /// Flight plus hotel in one trip.
    Both,
    /// Required information is missing or invalid; ask the user.
    Clarify,
    /// Question about, or modification of, the previous results.
    FollowUp,
}

fn default_travelers() -> u32 {
    1
}

/// Structured travel intent extracted from a natural-language query.
///
/// Field usage by kind:
/// - `FlightSearch`: origin = departure airport, destination = arrival
///   airport, check_in = departure date.
/// - `HotelSearch`: destination = hotel city (never origin), check_in and
///   check_out bracket the stay.
/// - `Both`: all four fields.
///
/// Dates are ISO `YYYY-MM-DD` strings as returned by the extraction prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelIntent {
    pub intent: IntentKind,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub check_in: Option<String>,
    #[serde(default)]
    pub check_out: Option<String>,
    #[serde(default = "default_travelers")]
    pub travelers: u32,
    #[serde(default)]
    pub reasoning: String,
}

impl TravelIntent {
    /// A clarify intent with the given reasoning.
    pub fn clarify(reasoning: impl Into<String>) -> Self {
        Self {
            intent: IntentKind::Clarify,
            origin: None,
            destination: None,
            check_in: None,
            check_out: None,
            travelers: 1,
            reasoning: reasoning.into(),
        }
    }
}

/// One leg of a flight itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSegment {
    /// Two-letter IATA carrier code, e.g. "AI".
    pub carrier_code: String,
    /// Flight number within the carrier, e.g. "805".
    pub number: String,
    /// Departure airport IATA code.
    pub departure_iata: String,
    /// Departure timestamp as reported by the provider (ISO 8601).
    pub departure_at: String,
    /// Arrival airport IATA code.
    pub arrival_iata: String,
    /// Arrival timestamp (ISO 8601).
    pub arrival_at: String,
}

/// A priced flight offer. Only the first itinerary's segments are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    pub segments: Vec<FlightSegment>,
    /// Total price in `currency`.
    pub price_total: f64,
    pub currency: String,
}

impl FlightOffer {
    /// The first segment, if the offer has any.
    pub fn first_segment(&self) -> Option<&FlightSegment> {
        self.segments.first()
    }
}

/// Static hotel facts independent of dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelInfo {
    pub hotel_id: String,
    pub name: String,
    #[serde(default)]
    pub city_name: Option<String>,
    /// Distance from the city center, in the provider's unit.
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub distance_unit: Option<String>,
}

/// Room details attached to a priced offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomInfo {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub beds: Option<u32>,
    #[serde(default)]
    pub bed_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A bookable room offer with price and policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedOffer {
    pub currency: String,
    pub total: f64,
    pub base: f64,
    pub check_in: String,
    pub check_out: String,
    #[serde(default)]
    pub room: RoomInfo,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub cancellation_type: Option<String>,
    #[serde(default)]
    pub cancellation_text: Option<String>,
}

/// A hotel with zero or more priced offers.
///
/// `available` is false when the city listing returned the hotel but no
/// offer search produced pricing for the requested dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOffer {
    pub hotel: HotelInfo,
    pub available: bool,
    #[serde(default)]
    pub offers: Vec<PricedOffer>,
}
