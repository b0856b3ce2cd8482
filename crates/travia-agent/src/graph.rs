//! The agent pipeline: extract intent, validate it, route to the right
//! search, and synthesize the answer.
//!
//! Routing mirrors the conversation model: flight and hotel searches call
//! the travel API, `both` runs flights then hotels, clarify answers
//! immediately, and follow-ups re-present the previous results. When the
//! travel API reports a system outage the flight path degrades to web
//! search.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use travia_amadeus::{AirportCityCache, TravelApi, TravelApiError};
use travia_core::config::{ChatConfig, FallbackConfig};
use travia_core::error::Result;
use travia_core::types::{FlightOffer, HotelOffer, IntentKind, TravelIntent};
use travia_llm::IntentExtractor;

use crate::airports::AirportDirectory;
use crate::intent::validate_intent;
use crate::prompt::intent_prompt;
use crate::session::ChatMessage;
use crate::synthesis::{clarify_response, synthesize};
use crate::websearch::{fallback_advice, format_web_results, WebSearcher};

/// Pause before retrying after the hotel offer endpoint rate-limits us.
const RATE_LIMIT_PAUSE: Duration = Duration::from_millis(500);

/// Hotel ids taken from the city listing before querying offers.
const MAX_HOTEL_IDS: usize = 30;

/// Stop querying hotel offers once this many are priced.
const ENOUGH_PRICED_OFFERS: usize = 5;

/// Everything the agent needs for one turn.
pub struct AgentInput {
    pub query: String,
    pub history: Vec<ChatMessage>,
    /// Results from the previous turn, for follow-up questions.
    pub last_flights: Vec<FlightOffer>,
    pub last_hotels: Vec<HotelOffer>,
}

/// What one turn produced.
#[derive(Debug)]
pub struct AgentOutcome {
    pub response: String,
    pub intent: Option<TravelIntent>,
    pub flights: Vec<FlightOffer>,
    pub hotels: Vec<HotelOffer>,
}

impl AgentOutcome {
    fn message(response: impl Into<String>, intent: TravelIntent) -> Self {
        Self {
            response: response.into(),
            intent: Some(intent),
            flights: Vec::new(),
            hotels: Vec::new(),
        }
    }
}

enum FlightStep {
    Offers(Vec<FlightOffer>),
    /// The provider is down; degrade to web search with this query.
    WebSearch(String),
    Failed(String),
}

enum HotelStep {
    Offers(Vec<HotelOffer>),
    Failed(String),
}

/// The conversational travel agent.
pub struct TravelAgent {
    extractor: Arc<dyn IntentExtractor>,
    travel: Arc<dyn TravelApi>,
    searcher: Arc<dyn WebSearcher>,
    airports: AirportDirectory,
    cities: AirportCityCache,
    chat: ChatConfig,
    fallback_enabled: bool,
}

impl TravelAgent {
    pub fn new(
        extractor: Arc<dyn IntentExtractor>,
        travel: Arc<dyn TravelApi>,
        searcher: Arc<dyn WebSearcher>,
        chat: ChatConfig,
        fallback: &FallbackConfig,
    ) -> Self {
        let cities = AirportCityCache::new(travel.clone());
        Self {
            extractor,
            travel,
            searcher,
            airports: AirportDirectory::new(),
            cities,
            chat,
            fallback_enabled: fallback.enabled,
        }
    }

    /// Run one turn of the conversation.
    pub async fn run(&self, input: AgentInput) -> Result<AgentOutcome> {
        let prompt = intent_prompt(&input.query, &input.history, self.chat.context_messages);
        let raw = self.extractor.extract(&prompt).await?;
        let intent = validate_intent(raw, &self.airports);
        tracing::info!(kind = ?intent.intent, "Intent resolved");

        match intent.intent {
            IntentKind::Clarify => {
                let response = clarify_response(&intent);
                Ok(AgentOutcome::message(response, intent))
            }
            IntentKind::FollowUp => {
                let cities = self.resolve_cities(&input.last_flights).await;
                let response = synthesize(
                    &input.last_flights,
                    &input.last_hotels,
                    &cities,
                    self.chat.eur_to_inr,
                    self.chat.max_results,
                );
                Ok(AgentOutcome {
                    response,
                    intent: Some(intent),
                    flights: input.last_flights,
                    hotels: input.last_hotels,
                })
            }
            IntentKind::FlightSearch => match self.flight_step(&intent).await {
                FlightStep::Offers(flights) => self.synthesized(intent, flights, vec![]).await,
                FlightStep::WebSearch(query) => Ok(self.web_search_step(intent, query).await),
                FlightStep::Failed(message) => Ok(AgentOutcome::message(message, intent)),
            },
            IntentKind::HotelSearch => match self.hotel_step(&intent).await {
                HotelStep::Offers(hotels) => self.synthesized(intent, vec![], hotels).await,
                HotelStep::Failed(message) => Ok(AgentOutcome::message(message, intent)),
            },
            IntentKind::Both => match self.flight_step(&intent).await {
                FlightStep::WebSearch(query) => Ok(self.web_search_step(intent, query).await),
                FlightStep::Failed(message) => Ok(AgentOutcome::message(message, intent)),
                FlightStep::Offers(flights) => match self.hotel_step(&intent).await {
                    HotelStep::Offers(hotels) => self.synthesized(intent, flights, hotels).await,
                    // Keep the flights even when the hotel half failed.
                    HotelStep::Failed(_) => self.synthesized(intent, flights, vec![]).await,
                },
            },
        }
    }

    async fn synthesized(
        &self,
        intent: TravelIntent,
        flights: Vec<FlightOffer>,
        hotels: Vec<HotelOffer>,
    ) -> Result<AgentOutcome> {
        let cities = self.resolve_cities(&flights).await;
        let response = synthesize(
            &flights,
            &hotels,
            &cities,
            self.chat.eur_to_inr,
            self.chat.max_results,
        );
        Ok(AgentOutcome {
            response,
            intent: Some(intent),
            flights,
            hotels,
        })
    }

    /// City names for every airport code in the shown flights. The provider
    /// cache is tried first, then the built-in directory.
    async fn resolve_cities(&self, flights: &[FlightOffer]) -> HashMap<String, String> {
        let mut cities = HashMap::new();
        for offer in flights.iter().take(self.chat.max_results) {
            if let Some(segment) = offer.first_segment() {
                for code in [&segment.departure_iata, &segment.arrival_iata] {
                    if !cities.contains_key(code.as_str()) {
                        cities.insert(code.clone(), self.city_name(code).await);
                    }
                }
            }
        }
        cities
    }

    async fn city_name(&self, code: &str) -> String {
        let resolved = self.cities.city_name(code).await;
        if resolved == code {
            self.airports.city_name(code)
        } else {
            resolved
        }
    }

    async fn flight_step(&self, intent: &TravelIntent) -> FlightStep {
        let origin = intent.origin.clone().unwrap_or_default();
        let destination = intent.destination.clone().unwrap_or_default();
        let check_in = intent.check_in.clone().unwrap_or_default();
        if origin.is_empty() || destination.is_empty() || check_in.is_empty() {
            return FlightStep::Failed("Missing flight search parameters".to_string());
        }

        match self
            .travel
            .search_flights(&origin, &destination, &check_in, intent.travelers)
            .await
        {
            Ok(flights) => FlightStep::Offers(flights),
            Err(err) if err.is_system_down() && self.fallback_enabled => {
                tracing::warn!(%err, "Travel API down, degrading to web search");
                let origin_city = self.airports.city_name(&origin);
                let dest_city = self.airports.city_name(&destination);
                let date = NaiveDate::parse_from_str(&check_in, "%Y-%m-%d")
                    .map(|d| d.format("%B %d, %Y").to_string())
                    .unwrap_or_else(|_| check_in.clone());
                FlightStep::WebSearch(format!(
                    "flights from {origin_city} to {dest_city} on {date} price"
                ))
            }
            Err(err) => {
                tracing::error!(%err, "Flight search failed");
                FlightStep::Failed(format!("Flight search error: {err}"))
            }
        }
    }

    async fn web_search_step(&self, intent: TravelIntent, query: String) -> AgentOutcome {
        let results = self.searcher.search(&query).await;
        let response = if results.is_empty() {
            let origin_city = intent
                .origin
                .as_deref()
                .map(|o| self.airports.city_name(o))
                .unwrap_or_else(|| "departure city".to_string());
            let dest_city = intent
                .destination
                .as_deref()
                .map(|d| self.airports.city_name(d))
                .unwrap_or_else(|| "destination city".to_string());
            let date = intent
                .check_in
                .clone()
                .unwrap_or_else(|| "your selected date".to_string());
            fallback_advice(&origin_city, &dest_city, &date)
        } else {
            format_web_results(&query, &results)
        };
        AgentOutcome::message(response, intent)
    }

    async fn hotel_step(&self, intent: &TravelIntent) -> HotelStep {
        let destination = intent.destination.clone().unwrap_or_default();
        let check_in = intent.check_in.clone().unwrap_or_default();
        let check_out = intent.check_out.clone().unwrap_or_default();
        if destination.is_empty() {
            return HotelStep::Failed("Missing destination city for hotel search".to_string());
        }
        if check_in.is_empty() || check_out.is_empty() {
            return HotelStep::Failed(
                "Missing check-in or check-out dates for hotel search".to_string(),
            );
        }

        let listed = match self.travel.hotels_by_city(&destination).await {
            Ok(listed) => listed,
            Err(err) => {
                tracing::error!(%err, "Hotel listing failed");
                return HotelStep::Failed(format!("Hotel search error: {err}"));
            }
        };
        if listed.is_empty() {
            return HotelStep::Failed(format!("No hotels found in city: {destination}"));
        }
        tracing::info!(city = destination.as_str(), hotels = listed.len(), "Hotels listed");

        let mut priced: Vec<HotelOffer> = Vec::new();
        for hotel in listed.iter().take(MAX_HOTEL_IDS) {
            match self
                .travel
                .hotel_offers(&hotel.hotel_id, intent.travelers, &check_in, &check_out)
                .await
            {
                Ok(offers) => {
                    priced.extend(offers.into_iter().filter(|o| !o.offers.is_empty()));
                    if priced.len() >= ENOUGH_PRICED_OFFERS {
                        break;
                    }
                }
                Err(TravelApiError::RateLimited) => {
                    tracing::debug!("Rate limited on hotel offers, pausing");
                    tokio::time::sleep(RATE_LIMIT_PAUSE).await;
                }
                Err(err) => {
                    tracing::debug!(hotel_id = hotel.hotel_id.as_str(), %err, "Skipping hotel");
                }
            }
        }

        if priced.is_empty() {
            // No pricing anywhere; show the first listed hotels without offers.
            let basic = listed
                .into_iter()
                .take(ENOUGH_PRICED_OFFERS)
                .map(|hotel| HotelOffer {
                    hotel,
                    available: false,
                    offers: Vec::new(),
                })
                .collect();
            return HotelStep::Offers(basic);
        }
        HotelStep::Offers(priced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use travia_amadeus::Location;
    use travia_core::types::{FlightSegment, HotelInfo, PricedOffer, RoomInfo};
    use travia_llm::StaticExtractor;

    use crate::websearch::SearchResult;

    fn sample_flight() -> FlightOffer {
        FlightOffer {
            segments: vec![FlightSegment {
                carrier_code: "AI".to_string(),
                number: "805".to_string(),
                departure_iata: "BOM".to_string(),
                departure_at: "2099-01-01T06:00:00".to_string(),
                arrival_iata: "DEL".to_string(),
                arrival_at: "2099-01-01T08:10:00".to_string(),
            }],
            price_total: 100.0,
            currency: "EUR".to_string(),
        }
    }

    fn priced_hotel(id: &str) -> HotelOffer {
        HotelOffer {
            hotel: HotelInfo {
                hotel_id: id.to_string(),
                name: format!("Hotel {id}"),
                city_name: Some("DELHI".to_string()),
                distance: None,
                distance_unit: None,
            },
            available: true,
            offers: vec![PricedOffer {
                currency: "EUR".to_string(),
                total: 90.0,
                base: 80.0,
                check_in: "2099-01-01".to_string(),
                check_out: "2099-01-03".to_string(),
                room: RoomInfo::default(),
                payment_type: None,
                cancellation_type: None,
                cancellation_text: None,
            }],
        }
    }

    #[derive(Default)]
    struct FakeTravelApi {
        flights_down: bool,
        flights: Vec<FlightOffer>,
        listed_hotels: Vec<HotelInfo>,
        /// Scripted per-call results for hotel_offers, consumed in order.
        offer_script: Mutex<Vec<std::result::Result<Vec<HotelOffer>, TravelApiError>>>,
        offer_calls: AtomicUsize,
    }

    #[async_trait]
    impl TravelApi for FakeTravelApi {
        async fn search_flights(
            &self,
            _origin: &str,
            _destination: &str,
            _departure_date: &str,
            _adults: u32,
        ) -> std::result::Result<Vec<FlightOffer>, TravelApiError> {
            if self.flights_down {
                return Err(TravelApiError::Upstream {
                    code: Some(141),
                    status: 500,
                    detail: "SYSTEM ERROR HAS OCCURRED".to_string(),
                });
            }
            Ok(self.flights.clone())
        }

        async fn hotels_by_city(
            &self,
            _city_code: &str,
        ) -> std::result::Result<Vec<HotelInfo>, TravelApiError> {
            Ok(self.listed_hotels.clone())
        }

        async fn hotel_offers(
            &self,
            _hotel_id: &str,
            _adults: u32,
            _check_in: &str,
            _check_out: &str,
        ) -> std::result::Result<Vec<HotelOffer>, TravelApiError> {
            self.offer_calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.offer_script.lock().unwrap();
            if script.is_empty() {
                Ok(vec![])
            } else {
                script.remove(0)
            }
        }

        async fn location_info(
            &self,
            _keyword: &str,
            _sub_type: &str,
        ) -> std::result::Result<Vec<Location>, TravelApiError> {
            Err(TravelApiError::Transport("offline".to_string()))
        }
    }

    struct FakeSearcher {
        results: Vec<SearchResult>,
    }

    #[async_trait]
    impl WebSearcher for FakeSearcher {
        async fn search(&self, _query: &str) -> Vec<SearchResult> {
            self.results.clone()
        }
    }

    fn agent_with(
        intents: Vec<TravelIntent>,
        travel: FakeTravelApi,
        search_results: Vec<SearchResult>,
    ) -> TravelAgent {
        TravelAgent::new(
            Arc::new(StaticExtractor::sequence(intents)),
            Arc::new(travel),
            Arc::new(FakeSearcher {
                results: search_results,
            }),
            ChatConfig::default(),
            &FallbackConfig::default(),
        )
    }

    fn flight_intent() -> TravelIntent {
        TravelIntent {
            intent: IntentKind::FlightSearch,
            origin: Some("BOM".to_string()),
            destination: Some("DEL".to_string()),
            check_in: Some("2099-01-01".to_string()),
            check_out: None,
            travelers: 1,
            reasoning: String::new(),
        }
    }

    fn hotel_intent() -> TravelIntent {
        TravelIntent {
            intent: IntentKind::HotelSearch,
            origin: None,
            destination: Some("DEL".to_string()),
            check_in: Some("2099-01-01".to_string()),
            check_out: Some("2099-01-03".to_string()),
            travelers: 1,
            reasoning: String::new(),
        }
    }

    fn input(query: &str) -> AgentInput {
        AgentInput {
            query: query.to_string(),
            history: vec![],
            last_flights: vec![],
            last_hotels: vec![],
        }
    }

    #[tokio::test]
    async fn test_flight_search_synthesizes_offers() {
        let travel = FakeTravelApi {
            flights: vec![sample_flight()],
            ..Default::default()
        };
        let agent = agent_with(vec![flight_intent()], travel, vec![]);
        let outcome = agent.run(input("flight BOM to DEL")).await.unwrap();
        assert!(outcome.response.contains("✈️ **FLIGHTS:**"));
        assert!(outcome.response.contains("Mumbai (BOM) → Delhi (DEL)"));
        assert_eq!(outcome.flights.len(), 1);
        assert!(outcome.hotels.is_empty());
    }

    #[tokio::test]
    async fn test_clarify_intent_asks_for_details() {
        let agent = agent_with(
            vec![TravelIntent::clarify("Missing: departure city/airport")],
            FakeTravelApi::default(),
            vec![],
        );
        let outcome = agent.run(input("book something")).await.unwrap();
        assert!(outcome.response.contains("I need more information"));
        assert!(outcome.response.contains("Missing: departure city/airport"));
    }

    #[tokio::test]
    async fn test_incomplete_flight_intent_downgraded_before_search() {
        // The extractor claims a flight search but gives no fields.
        let incomplete = TravelIntent {
            intent: IntentKind::FlightSearch,
            ..TravelIntent::clarify("")
        };
        let agent = agent_with(vec![incomplete], FakeTravelApi::default(), vec![]);
        let outcome = agent.run(input("flight please")).await.unwrap();
        assert_eq!(
            outcome.intent.as_ref().map(|i| i.intent),
            Some(IntentKind::Clarify)
        );
        assert!(outcome.response.contains("departure city/airport"));
    }

    #[tokio::test]
    async fn test_provider_outage_uses_web_search() {
        let travel = FakeTravelApi {
            flights_down: true,
            ..Default::default()
        };
        let results = vec![SearchResult {
            title: "Cheap BOM-DEL flights".to_string(),
            url: "https://example.com".to_string(),
            snippet: "from ₹3500".to_string(),
        }];
        let agent = agent_with(vec![flight_intent()], travel, results);
        let outcome = agent.run(input("flight BOM to DEL")).await.unwrap();
        assert!(outcome.response.contains("web search"));
        assert!(outcome.response.contains("Cheap BOM-DEL flights"));
        // The search query uses city names and a spelled-out date.
        assert!(outcome
            .response
            .contains("flights from Mumbai to Delhi on January 01, 2099 price"));
    }

    #[tokio::test]
    async fn test_outage_with_failed_search_gives_advice() {
        let travel = FakeTravelApi {
            flights_down: true,
            ..Default::default()
        };
        let agent = agent_with(vec![flight_intent()], travel, vec![]);
        let outcome = agent.run(input("flight BOM to DEL")).await.unwrap();
        assert!(outcome.response.contains("web search is also having issues"));
        assert!(outcome.response.contains("From: Mumbai"));
    }

    #[tokio::test]
    async fn test_hotel_search_collects_priced_offers() {
        let listed: Vec<HotelInfo> = (0..3)
            .map(|i| HotelInfo {
                hotel_id: format!("H{i}"),
                name: format!("Hotel {i}"),
                city_name: Some("DELHI".to_string()),
                distance: None,
                distance_unit: None,
            })
            .collect();
        let travel = FakeTravelApi {
            listed_hotels: listed,
            offer_script: Mutex::new(vec![
                Ok(vec![priced_hotel("H0")]),
                Err(TravelApiError::Upstream {
                    code: Some(3664),
                    status: 400,
                    detail: "NO ROOMS AVAILABLE".to_string(),
                }),
                Ok(vec![priced_hotel("H2")]),
            ]),
            ..Default::default()
        };
        let agent = agent_with(vec![hotel_intent()], travel, vec![]);
        let outcome = agent.run(input("hotel in Delhi")).await.unwrap();
        assert_eq!(outcome.hotels.len(), 2);
        assert!(outcome.response.contains("🏨 **HOTELS:**"));
        assert!(outcome.response.contains("Hotel H0"));
        assert!(outcome.response.contains("Hotel H2"));
    }

    #[tokio::test]
    async fn test_hotel_search_without_pricing_lists_basics() {
        let listed: Vec<HotelInfo> = (0..8)
            .map(|i| HotelInfo {
                hotel_id: format!("H{i}"),
                name: format!("Hotel {i}"),
                city_name: Some("DELHI".to_string()),
                distance: None,
                distance_unit: None,
            })
            .collect();
        let travel = FakeTravelApi {
            listed_hotels: listed,
            ..Default::default()
        };
        let agent = agent_with(vec![hotel_intent()], travel, vec![]);
        let outcome = agent.run(input("hotel in Delhi")).await.unwrap();
        // First five listed hotels, shown without pricing.
        assert_eq!(outcome.hotels.len(), 5);
        assert!(outcome.hotels.iter().all(|h| !h.available));
        assert!(outcome.response.contains("No pricing available"));
    }

    #[tokio::test]
    async fn test_hotel_search_empty_city() {
        let agent = agent_with(vec![hotel_intent()], FakeTravelApi::default(), vec![]);
        let outcome = agent.run(input("hotel in Delhi")).await.unwrap();
        assert_eq!(outcome.response, "No hotels found in city: DEL");
    }

    #[tokio::test]
    async fn test_both_runs_flights_and_hotels() {
        let travel = FakeTravelApi {
            flights: vec![sample_flight()],
            listed_hotels: vec![HotelInfo {
                hotel_id: "H0".to_string(),
                name: "Hotel H0".to_string(),
                city_name: Some("DELHI".to_string()),
                distance: None,
                distance_unit: None,
            }],
            offer_script: Mutex::new(vec![Ok(vec![priced_hotel("H0")])]),
            ..Default::default()
        };
        let both = TravelIntent {
            intent: IntentKind::Both,
            check_out: Some("2099-01-03".to_string()),
            ..flight_intent()
        };
        let agent = agent_with(vec![both], travel, vec![]);
        let outcome = agent.run(input("flight and hotel")).await.unwrap();
        assert!(outcome.response.contains("✈️ **FLIGHTS:**"));
        assert!(outcome.response.contains("🏨 **HOTELS:**"));
        assert_eq!(outcome.flights.len(), 1);
        assert_eq!(outcome.hotels.len(), 1);
    }

    #[tokio::test]
    async fn test_follow_up_reuses_previous_results() {
        let follow_up = TravelIntent {
            intent: IntentKind::FollowUp,
            ..TravelIntent::clarify("")
        };
        let agent = agent_with(vec![follow_up], FakeTravelApi::default(), vec![]);
        let outcome = agent
            .run(AgentInput {
                query: "show those flights again".to_string(),
                history: vec![],
                last_flights: vec![sample_flight()],
                last_hotels: vec![],
            })
            .await
            .unwrap();
        assert!(outcome.response.contains("AI 805"));
        assert_eq!(outcome.flights.len(), 1);
    }

    #[tokio::test]
    async fn test_follow_up_without_history() {
        let follow_up = TravelIntent {
            intent: IntentKind::FollowUp,
            ..TravelIntent::clarify("")
        };
        let agent = agent_with(vec![follow_up], FakeTravelApi::default(), vec![]);
        let outcome = agent.run(input("what about those?")).await.unwrap();
        assert_eq!(outcome.response, "No results available for your search.");
    }
}
