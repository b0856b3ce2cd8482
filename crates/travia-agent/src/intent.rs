//! Post-extraction intent validation.
//!
//! The model gets field placement wrong often enough that its output cannot
//! be trusted directly: hotel cities end up in `origin`, required fields go
//! missing, dates land in the past. Anything unusable is downgraded to a
//! clarify intent with the missing pieces named in `reasoning`.

use travia_core::dates;
use travia_core::types::{IntentKind, TravelIntent};

use crate::airports::AirportDirectory;

/// Validate and repair an extracted intent.
pub fn validate_intent(mut intent: TravelIntent, airports: &AirportDirectory) -> TravelIntent {
    let original_kind = intent.intent;

    // Hotel searches sometimes arrive with the city in the origin field.
    if original_kind == IntentKind::HotelSearch
        && intent.origin.is_some()
        && intent.destination.is_none()
    {
        intent.destination = intent.origin.take();
    }

    // Resolve city names and aliases to codes where the directory knows them.
    if let Some(origin) = intent.origin.as_deref() {
        if let Some(code) = airports.iata_for(origin) {
            intent.origin = Some(code);
        }
    }
    if let Some(destination) = intent.destination.as_deref() {
        if let Some(code) = airports.iata_for(destination) {
            intent.destination = Some(code);
        }
    }

    let mut missing: Vec<&str> = Vec::new();
    match original_kind {
        IntentKind::FlightSearch => {
            if intent.origin.is_none() {
                missing.push("departure city/airport");
            }
            if intent.destination.is_none() {
                missing.push("arrival city/airport");
            }
            if intent.origin.is_some() && intent.origin == intent.destination {
                missing.push("arrival city/airport (cannot be same as departure)");
            }
            if intent.check_in.is_none() {
                missing.push("departure/travel date");
            }
        }
        IntentKind::HotelSearch => {
            if intent.destination.is_none() {
                missing.push("destination city");
            }
            if intent.check_in.is_none() {
                missing.push("check-in date");
            }
            if intent.check_out.is_none() {
                missing.push("check-out date");
            }
        }
        IntentKind::Both => {
            if intent.origin.is_none() {
                missing.push("departure city/airport");
            }
            if intent.destination.is_none() {
                missing.push("destination city");
            }
            if intent.check_in.is_none() {
                missing.push("check-in/departure date");
            }
            if intent.check_out.is_none() {
                missing.push("check-out date");
            }
        }
        IntentKind::Clarify | IntentKind::FollowUp => {}
    }

    if !missing.is_empty() {
        let reasoning = format!("Missing: {}", missing.join(", "));
        tracing::info!(kind = ?original_kind, %reasoning, "Intent downgraded to clarify");
        intent.intent = IntentKind::Clarify;
        intent.reasoning = reasoning;
        return intent;
    }

    // Past or malformed check-in dates cannot be searched.
    if let Some(check_in) = intent.check_in.as_deref() {
        match dates::is_past_date(check_in) {
            Some(true) => {
                intent.intent = IntentKind::Clarify;
                intent.reasoning = "Check-in/departure date cannot be in the past".to_string();
            }
            None => {
                intent.intent = IntentKind::Clarify;
                intent.reasoning = "Invalid date format. Please provide a valid date.".to_string();
            }
            Some(false) => {}
        }
    }

    intent
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(kind: IntentKind) -> TravelIntent {
        TravelIntent {
            intent: kind,
            origin: None,
            destination: None,
            check_in: None,
            check_out: None,
            travelers: 1,
            reasoning: String::new(),
        }
    }

    #[test]
    fn test_complete_flight_search_passes() {
        let dir = AirportDirectory::new();
        let intent = TravelIntent {
            origin: Some("BOM".to_string()),
            destination: Some("DEL".to_string()),
            check_in: Some("2099-01-01".to_string()),
            ..base(IntentKind::FlightSearch)
        };
        let out = validate_intent(intent, &dir);
        assert_eq!(out.intent, IntentKind::FlightSearch);
    }

    #[test]
    fn test_city_names_resolved_to_codes() {
        let dir = AirportDirectory::new();
        let intent = TravelIntent {
            origin: Some("Bombay".to_string()),
            destination: Some("bangalore".to_string()),
            check_in: Some("2099-01-01".to_string()),
            ..base(IntentKind::FlightSearch)
        };
        let out = validate_intent(intent, &dir);
        assert_eq!(out.origin.as_deref(), Some("BOM"));
        assert_eq!(out.destination.as_deref(), Some("BLR"));
        assert_eq!(out.intent, IntentKind::FlightSearch);
    }

    #[test]
    fn test_flight_search_missing_fields_downgrades() {
        let dir = AirportDirectory::new();
        let out = validate_intent(base(IntentKind::FlightSearch), &dir);
        assert_eq!(out.intent, IntentKind::Clarify);
        assert!(out.reasoning.contains("departure city/airport"));
        assert!(out.reasoning.contains("arrival city/airport"));
        assert!(out.reasoning.contains("departure/travel date"));
    }

    #[test]
    fn test_same_origin_and_destination_downgrades() {
        let dir = AirportDirectory::new();
        let intent = TravelIntent {
            origin: Some("BOM".to_string()),
            destination: Some("Mumbai".to_string()),
            check_in: Some("2099-01-01".to_string()),
            ..base(IntentKind::FlightSearch)
        };
        let out = validate_intent(intent, &dir);
        assert_eq!(out.intent, IntentKind::Clarify);
        assert!(out.reasoning.contains("cannot be same as departure"));
    }

    #[test]
    fn test_hotel_city_in_origin_is_moved() {
        let dir = AirportDirectory::new();
        let intent = TravelIntent {
            origin: Some("Delhi".to_string()),
            check_in: Some("2099-01-01".to_string()),
            check_out: Some("2099-01-03".to_string()),
            ..base(IntentKind::HotelSearch)
        };
        let out = validate_intent(intent, &dir);
        assert_eq!(out.intent, IntentKind::HotelSearch);
        assert!(out.origin.is_none());
        assert_eq!(out.destination.as_deref(), Some("DEL"));
    }

    #[test]
    fn test_hotel_search_missing_checkout_downgrades() {
        let dir = AirportDirectory::new();
        let intent = TravelIntent {
            destination: Some("DEL".to_string()),
            check_in: Some("2099-01-01".to_string()),
            ..base(IntentKind::HotelSearch)
        };
        let out = validate_intent(intent, &dir);
        assert_eq!(out.intent, IntentKind::Clarify);
        assert_eq!(out.reasoning, "Missing: check-out date");
    }

    #[test]
    fn test_both_requires_all_four_fields() {
        let dir = AirportDirectory::new();
        let intent = TravelIntent {
            origin: Some("BOM".to_string()),
            destination: Some("DEL".to_string()),
            check_in: Some("2099-01-01".to_string()),
            ..base(IntentKind::Both)
        };
        let out = validate_intent(intent, &dir);
        assert_eq!(out.intent, IntentKind::Clarify);
        assert_eq!(out.reasoning, "Missing: check-out date");
    }

    #[test]
    fn test_past_date_downgrades() {
        let dir = AirportDirectory::new();
        let intent = TravelIntent {
            origin: Some("BOM".to_string()),
            destination: Some("DEL".to_string()),
            check_in: Some("2000-01-01".to_string()),
            ..base(IntentKind::FlightSearch)
        };
        let out = validate_intent(intent, &dir);
        assert_eq!(out.intent, IntentKind::Clarify);
        assert_eq!(out.reasoning, "Check-in/departure date cannot be in the past");
    }

    #[test]
    fn test_malformed_date_downgrades() {
        let dir = AirportDirectory::new();
        let intent = TravelIntent {
            origin: Some("BOM".to_string()),
            destination: Some("DEL".to_string()),
            check_in: Some("25th January".to_string()),
            ..base(IntentKind::FlightSearch)
        };
        let out = validate_intent(intent, &dir);
        assert_eq!(out.intent, IntentKind::Clarify);
        assert!(out.reasoning.contains("Invalid date format"));
    }

    #[test]
    fn test_clarify_and_follow_up_untouched() {
        let dir = AirportDirectory::new();
        let clarify = validate_intent(base(IntentKind::Clarify), &dir);
        assert_eq!(clarify.intent, IntentKind::Clarify);
        let follow_up = validate_intent(base(IntentKind::FollowUp), &dir);
        assert_eq!(follow_up.intent, IntentKind::FollowUp);
    }
}
