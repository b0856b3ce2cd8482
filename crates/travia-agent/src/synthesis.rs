//! Response synthesis: turns search results into the markdown answer shown
//! to the user, converting prices to INR.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime};

use travia_core::types::{FlightOffer, HotelOffer, TravelIntent};

/// Fixed conversion rates for non-EUR currencies the provider returns.
const GBP_TO_INR: f64 = 125.0;
const USD_TO_INR: f64 = 83.0;

/// Longest room description shown before truncation.
const MAX_DESCRIPTION_LEN: usize = 150;

/// Convert an amount to whole rupees. Unknown currencies pass through
/// unconverted rather than guessing a rate.
pub fn to_inr(currency: &str, amount: f64, eur_to_inr: f64) -> i64 {
    let rate = match currency {
        "EUR" => eur_to_inr,
        "GBP" => GBP_TO_INR,
        "USD" => USD_TO_INR,
        _ => 1.0,
    };
    (amount * rate) as i64
}

/// Render a provider timestamp as "01 Sep 2026, 06:00 AM". Timezone offsets
/// are dropped; unparseable input is shown as-is.
fn format_departure(at: &str) -> String {
    if let Ok(dt) = NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M:%S") {
        return dt.format("%d %b %Y, %I:%M %p").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(at) {
        return dt.naive_local().format("%d %b %Y, %I:%M %p").to_string();
    }
    at.to_string()
}

/// Format search results into the final answer. `cities` maps IATA codes to
/// city names for the route line.
pub fn synthesize(
    flights: &[FlightOffer],
    hotels: &[HotelOffer],
    cities: &HashMap<String, String>,
    eur_to_inr: f64,
    max_results: usize,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !flights.is_empty() {
        lines.push("✈️ **FLIGHTS:**".to_string());
        for offer in flights.iter().take(max_results) {
            let Some(segment) = offer.first_segment() else {
                continue;
            };
            let city = |code: &str| {
                cities
                    .get(code)
                    .cloned()
                    .unwrap_or_else(|| code.to_string())
            };
            let price_inr = to_inr(&offer.currency, offer.price_total, eur_to_inr);
            lines.push(format!(
                "  {} {} | {} ({}) → {} ({}) | {} | ₹{}",
                segment.carrier_code,
                segment.number,
                city(&segment.departure_iata),
                segment.departure_iata,
                city(&segment.arrival_iata),
                segment.arrival_iata,
                format_departure(&segment.departure_at),
                price_inr,
            ));
        }
        lines.push(String::new());
    }

    if !hotels.is_empty() {
        lines.push("🏨 **HOTELS:**".to_string());
        lines.push(String::new());
        for (idx, h) in hotels.iter().take(max_results).enumerate() {
            lines.push(format!(
                "{}. **{}** (ID: {})",
                idx + 1,
                h.hotel.name,
                h.hotel.hotel_id
            ));

            if let Some(offer) = h.offers.first() {
                let total_inr = to_inr(&offer.currency, offer.total, eur_to_inr);
                let base_inr = to_inr(&offer.currency, offer.base, eur_to_inr);
                lines.push(format!(
                    "   💰 Price: ₹{total_inr} total (Base: ₹{base_inr}) | Currency: {}",
                    offer.currency
                ));

                let category = title_case(
                    &offer
                        .room
                        .category
                        .as_deref()
                        .unwrap_or("Standard Room")
                        .replace('_', " "),
                );
                let beds = offer
                    .room
                    .beds
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "N/A".to_string());
                let bed_type = offer.room.bed_type.as_deref().unwrap_or("N/A");
                lines.push(format!("   🛏️  Room: {category} | {beds} bed(s) - {bed_type}"));

                if let Some(desc) = offer.room.description.as_deref() {
                    if !desc.is_empty() {
                        lines.push(format!("   📝 {}", truncate(desc, MAX_DESCRIPTION_LEN)));
                    }
                }

                lines.push(format!("   📅 {} to {}", offer.check_in, offer.check_out));

                let payment = offer.payment_type.as_deref().unwrap_or("N/A");
                let cancel_type = offer.cancellation_type.as_deref().unwrap_or("N/A");
                lines.push(format!(
                    "   🏷️  Payment: {payment} | Cancellation: {cancel_type}"
                ));
                let cancel_text = offer
                    .cancellation_text
                    .as_deref()
                    .unwrap_or("No cancellation info");
                lines.push(format!("   ℹ️  {cancel_text}"));
            } else {
                lines.push("   ℹ️  No pricing available for selected dates".to_string());
                if let Some(city) = h.hotel.city_name.as_deref() {
                    lines.push(format!("   📍 Location: {city}"));
                }
                if let Some(distance) = h.hotel.distance {
                    let unit = h.hotel.distance_unit.as_deref().unwrap_or("");
                    lines.push(format!("   📏 Distance from center: {distance} {unit}"));
                }
            }
            lines.push(String::new());
        }
    }

    if lines.is_empty() {
        return "No results available for your search.".to_string();
    }
    lines.join("\n")
}

/// "DELUXE ROOM" -> "Deluxe Room".
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Build the clarification answer: what was understood, what is still
/// needed, and example queries.
pub fn clarify_response(intent: &TravelIntent) -> String {
    let mut response = String::from("I need more information to help you book your travel.\n\n");

    if !intent.reasoning.is_empty() {
        response.push_str(&format!("**{}**\n\n", intent.reasoning));
    }

    let mut have: Vec<String> = Vec::new();
    if let Some(origin) = intent.origin.as_deref() {
        have.push(format!("✓ Departure: {origin}"));
    }
    if let Some(destination) = intent.destination.as_deref() {
        have.push(format!("✓ Destination: {destination}"));
    }
    if let Some(check_in) = intent.check_in.as_deref() {
        have.push(format!("✓ Check-in/Departure date: {check_in}"));
    }
    if let Some(check_out) = intent.check_out.as_deref() {
        have.push(format!("✓ Check-out date: {check_out}"));
    }

    if !have.is_empty() {
        response.push_str("**What I have:**\n");
        for item in &have {
            response.push_str(item);
            response.push('\n');
        }
        response.push('\n');
    }

    if intent.origin.is_some() && intent.destination.is_none() {
        response.push_str("**What I need:**\n");
        response.push_str("• Destination/Arrival city (e.g., Delhi, Bangalore, Chennai)\n");
        if intent.check_in.is_none() {
            response.push_str("• Travel/Departure date (e.g., tomorrow, 25th January)\n");
        }
        response.push_str("\n**Example:** 'to Delhi on 25th January'\n");
    } else if intent.destination.is_some() && intent.origin.is_none() {
        response.push_str("**What I need:**\n");
        response.push_str("• Departure city (e.g., Mumbai, Bangalore)\n");
        if intent.check_in.is_none() {
            response.push_str("• Travel date (e.g., tomorrow, 25th January)\n");
        }
        response.push_str("\n**Example:** 'from Mumbai on 25th January'\n");
    } else {
        response.push_str("**For flight bookings, I need:**\n");
        response.push_str("• Departure city (e.g., Mumbai, BOM)\n");
        response.push_str("• Arrival city (e.g., Delhi, DEL)\n");
        response.push_str("• Travel date (e.g., tomorrow, 25th January)\n\n");
        response.push_str("**For hotel bookings, I need:**\n");
        response.push_str("• Destination city (e.g., Delhi, Mumbai)\n");
        response.push_str("• Check-in date (e.g., 25th January)\n");
        response.push_str("• Check-out date (e.g., 27th January, or '3 nights')\n\n");
        response.push_str("**Examples:**\n");
        response.push_str("• 'Book a flight from Mumbai to Delhi on 25th January'\n");
        response.push_str("• 'Book a hotel in Delhi from 25th to 27th January'\n");
        response.push_str("• 'Flight and hotel to Bangalore next week for 3 nights'\n");
    }

    response
}
