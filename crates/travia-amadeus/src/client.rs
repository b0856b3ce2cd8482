//! The [`TravelApi`] trait and its Amadeus-backed implementation.
//!
//! Wire DTOs mirror the provider's camelCase JSON and are converted into
//! `travia-core` types at the boundary. Prices arrive as decimal strings and
//! are parsed here.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use travia_core::config::AmadeusConfig;
use travia_core::types::{
    FlightOffer, FlightSegment, HotelInfo, HotelOffer, PricedOffer, RoomInfo,
};

use crate::error::{ErrorBody, TravelApiError};
use crate::token::TokenManager;

/// An airport or city returned by the location reference endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub iata_code: String,
    pub name: String,
    pub city_name: Option<String>,
}

/// Travel search operations the agent depends on.
#[async_trait]
pub trait TravelApi: Send + Sync {
    /// One-way flight offers between two IATA airport codes.
    async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        departure_date: &str,
        adults: u32,
    ) -> Result<Vec<FlightOffer>, TravelApiError>;

    /// Hotels listed for a city code, without pricing.
    async fn hotels_by_city(&self, city_code: &str) -> Result<Vec<HotelInfo>, TravelApiError>;

    /// Priced offers for one hotel over a date range.
    async fn hotel_offers(
        &self,
        hotel_id: &str,
        adults: u32,
        check_in: &str,
        check_out: &str,
    ) -> Result<Vec<HotelOffer>, TravelApiError>;

    /// Look up airports or cities by keyword.
    async fn location_info(
        &self,
        keyword: &str,
        sub_type: &str,
    ) -> Result<Vec<Location>, TravelApiError>;
}

// =============================================================================
// Wire DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFlightOffer {
    #[serde(default)]
    itineraries: Vec<WireItinerary>,
    price: WirePrice,
}

#[derive(Debug, Deserialize)]
struct WireItinerary {
    #[serde(default)]
    segments: Vec<WireSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSegment {
    carrier_code: String,
    number: String,
    departure: WireEndpoint,
    arrival: WireEndpoint,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEndpoint {
    iata_code: String,
    at: String,
}

#[derive(Debug, Deserialize)]
struct WirePrice {
    #[serde(default)]
    currency: Option<String>,
    total: String,
    #[serde(default)]
    base: Option<String>,
}

impl WireFlightOffer {
    fn into_domain(self) -> Result<FlightOffer, TravelApiError> {
        // Only the first itinerary matters for one-way searches.
        let segments = self
            .itineraries
            .into_iter()
            .next()
            .map(|it| it.segments)
            .unwrap_or_default()
            .into_iter()
            .map(|s| FlightSegment {
                carrier_code: s.carrier_code,
                number: s.number,
                departure_iata: s.departure.iata_code,
                departure_at: s.departure.at,
                arrival_iata: s.arrival.iata_code,
                arrival_at: s.arrival.at,
            })
            .collect();
        Ok(FlightOffer {
            segments,
            price_total: parse_price(&self.price.total)?,
            currency: self.price.currency.unwrap_or_else(|| "EUR".to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireHotel {
    hotel_id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<WireAddress>,
    #[serde(default)]
    distance: Option<WireDistance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAddress {
    #[serde(default)]
    city_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireDistance {
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    unit: Option<String>,
}

impl From<WireHotel> for HotelInfo {
    fn from(w: WireHotel) -> Self {
        HotelInfo {
            name: w.name.unwrap_or_else(|| "Unknown Hotel".to_string()),
            hotel_id: w.hotel_id,
            city_name: w.address.and_then(|a| a.city_name),
            distance: w.distance.as_ref().and_then(|d| d.value),
            distance_unit: w.distance.and_then(|d| d.unit),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireHotelOffer {
    hotel: WireHotel,
    #[serde(default)]
    available: bool,
    #[serde(default)]
    offers: Vec<WireRoomOffer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRoomOffer {
    check_in_date: String,
    check_out_date: String,
    price: WirePrice,
    #[serde(default)]
    room: Option<WireRoom>,
    #[serde(default)]
    policies: Option<WirePolicies>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRoom {
    #[serde(default)]
    type_estimated: Option<WireRoomEstimate>,
    #[serde(default)]
    description: Option<WireText>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRoomEstimate {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    beds: Option<u32>,
    #[serde(default)]
    bed_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireText {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePolicies {
    #[serde(default)]
    payment_type: Option<String>,
    #[serde(default)]
    cancellation: Option<WireCancellation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCancellation {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    description: Option<WireText>,
}

impl WireHotelOffer {
    fn into_domain(self) -> Result<HotelOffer, TravelApiError> {
        let offers = self
            .offers
            .into_iter()
            .map(|o| {
                let (room, description) = match o.room {
                    Some(r) => (r.type_estimated, r.description.and_then(|d| d.text)),
                    None => (None, None),
                };
                let (payment_type, cancellation) = match o.policies {
                    Some(p) => (p.payment_type, p.cancellation),
                    None => (None, None),
                };
                let (cancellation_type, cancellation_text) = match cancellation {
                    Some(c) => (c.kind, c.description.and_then(|d| d.text)),
                    None => (None, None),
                };
                Ok(PricedOffer {
                    currency: o.price.currency.unwrap_or_else(|| "EUR".to_string()),
                    total: parse_price(&o.price.total)?,
                    base: match o.price.base {
                        Some(ref b) => parse_price(b)?,
                        None => 0.0,
                    },
                    check_in: o.check_in_date,
                    check_out: o.check_out_date,
                    room: RoomInfo {
                        category: room.as_ref().and_then(|r| r.category.clone()),
                        beds: room.as_ref().and_then(|r| r.beds),
                        bed_type: room.and_then(|r| r.bed_type),
                        description,
                    },
                    payment_type,
                    cancellation_type,
                    cancellation_text,
                })
            })
            .collect::<Result<Vec<_>, TravelApiError>>()?;
        Ok(HotelOffer {
            hotel: self.hotel.into(),
            available: self.available,
            offers,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLocation {
    #[serde(default)]
    iata_code: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<WireAddress>,
}

fn parse_price(s: &str) -> Result<f64, TravelApiError> {
    s.parse::<f64>()
        .map_err(|_| TravelApiError::Decode(format!("unparseable price: {s:?}")))
}

// =============================================================================
// AmadeusClient
// =============================================================================

/// Production [`TravelApi`] implementation against the Amadeus Self-Service
/// API (test or production environment per `base_url`).
pub struct AmadeusClient {
    http: reqwest::Client,
    tokens: TokenManager,
    base_url: String,
}

impl AmadeusClient {
    pub fn new(config: AmadeusConfig) -> Result<Self, TravelApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .build()?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let tokens = TokenManager::new(http.clone(), config);
        Ok(Self {
            http,
            tokens,
            base_url,
        })
    }

    /// Authenticated GET with one retry on 401 after invalidating the token.
    async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, TravelApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut retried = false;
        loop {
            let token = self.tokens.bearer().await?;
            let response = self
                .http
                .get(&url)
                .bearer_auth(&token)
                .query(query)
                .send()
                .await?;

            let status = response.status();
            if status.as_u16() == 401 && !retried {
                tracing::debug!(path, "Token rejected, refreshing and retrying");
                self.tokens.invalidate().await;
                retried = true;
                continue;
            }
            if !status.is_success() {
                let body: ErrorBody = response.json().await.unwrap_or(ErrorBody { errors: vec![] });
                let err = body.into_error(status.as_u16());
                tracing::warn!(path, %err, "Provider request failed");
                return Err(err);
            }
            return response
                .json()
                .await
                .map_err(|e| TravelApiError::Decode(e.to_string()));
        }
    }
}

#[async_trait]
impl TravelApi for AmadeusClient {
    async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        departure_date: &str,
        adults: u32,
    ) -> Result<Vec<FlightOffer>, TravelApiError> {
        let adults = adults.to_string();
        let body = self
            .get(
                "/v2/shopping/flight-offers",
                &[
                    ("originLocationCode", origin),
                    ("destinationLocationCode", destination),
                    ("departureDate", departure_date),
                    ("adults", adults.as_str()),
                ],
            )
            .await?;
        let envelope: DataEnvelope<WireFlightOffer> =
            serde_json::from_value(body).map_err(|e| TravelApiError::Decode(e.to_string()))?;
        tracing::info!(origin, destination, offers = envelope.data.len(), "Flight search complete");
        envelope.data.into_iter().map(|o| o.into_domain()).collect()
    }

    async fn hotels_by_city(&self, city_code: &str) -> Result<Vec<HotelInfo>, TravelApiError> {
        let body = self
            .get(
                "/v1/reference-data/locations/hotels/by-city",
                &[("cityCode", city_code)],
            )
            .await?;
        let envelope: DataEnvelope<WireHotel> =
            serde_json::from_value(body).map_err(|e| TravelApiError::Decode(e.to_string()))?;
        Ok(envelope.data.into_iter().map(HotelInfo::from).collect())
    }

    async fn hotel_offers(
        &self,
        hotel_id: &str,
        adults: u32,
        check_in: &str,
        check_out: &str,
    ) -> Result<Vec<HotelOffer>, TravelApiError> {
        let adults = adults.to_string();
        let body = self
            .get(
                "/v3/shopping/hotel-offers",
                &[
                    ("hotelIds", hotel_id),
                    ("adults", adults.as_str()),
                    ("checkInDate", check_in),
                    ("checkOutDate", check_out),
                ],
            )
            .await?;
        let envelope: DataEnvelope<WireHotelOffer> =
            serde_json::from_value(body).map_err(|e| TravelApiError::Decode(e.to_string()))?;
        envelope.data.into_iter().map(|o| o.into_domain()).collect()
    }

    async fn location_info(
        &self,
        keyword: &str,
        sub_type: &str,
    ) -> Result<Vec<Location>, TravelApiError> {
        let body = self
            .get(
                "/v1/reference-data/locations",
                &[("keyword", keyword), ("subType", sub_type)],
            )
            .await?;
        let envelope: DataEnvelope<WireLocation> =
            serde_json::from_value(body).map_err(|e| TravelApiError::Decode(e.to_string()))?;
        Ok(envelope
            .data
            .into_iter()
            .filter_map(|l| {
                let iata_code = l.iata_code?;
                Some(Location {
                    name: l.name.unwrap_or_else(|| iata_code.clone()),
                    city_name: l.address.and_then(|a| a.city_name),
                    iata_code,
                })
            })
            .collect())
    }
}
