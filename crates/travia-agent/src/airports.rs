//! Airport directory: maps city names, aliases, and IATA codes to the codes
//! the travel API expects.
//!
//! Lookup order: exact IATA code, alias table, city name, then fuzzy match
//! against known city names. The alias table covers renamed Indian cities
//! (Bombay, Madras, Calcutta) and codes people type as city names.

use std::collections::HashMap;
use std::sync::LazyLock;

struct Airport {
    iata: &'static str,
    city: &'static str,
    name: &'static str,
}

// Major airports only. City keys are matched lowercase.
static AIRPORTS: &[Airport] = &[
    Airport { iata: "BOM", city: "Mumbai", name: "Chhatrapati Shivaji Maharaj International Airport" },
    Airport { iata: "DEL", city: "Delhi", name: "Indira Gandhi International Airport" },
    Airport { iata: "BLR", city: "Bengaluru", name: "Kempegowda International Airport" },
    Airport { iata: "MAA", city: "Chennai", name: "Chennai International Airport" },
    Airport { iata: "CCU", city: "Kolkata", name: "Netaji Subhash Chandra Bose International Airport" },
    Airport { iata: "HYD", city: "Hyderabad", name: "Rajiv Gandhi International Airport" },
    Airport { iata: "COK", city: "Kochi", name: "Cochin International Airport" },
    Airport { iata: "GOI", city: "Goa", name: "Dabolim Airport" },
    Airport { iata: "AMD", city: "Ahmedabad", name: "Sardar Vallabhbhai Patel International Airport" },
    Airport { iata: "PNQ", city: "Pune", name: "Pune Airport" },
    Airport { iata: "JAI", city: "Jaipur", name: "Jaipur International Airport" },
    Airport { iata: "GAU", city: "Guwahati", name: "Lokpriya Gopinath Bordoloi International Airport" },
    Airport { iata: "TRV", city: "Thiruvananthapuram", name: "Trivandrum International Airport" },
    Airport { iata: "CCJ", city: "Kozhikode", name: "Calicut International Airport" },
    Airport { iata: "IXC", city: "Chandigarh", name: "Chandigarh International Airport" },
    Airport { iata: "LKO", city: "Lucknow", name: "Chaudhary Charan Singh International Airport" },
    Airport { iata: "NAG", city: "Nagpur", name: "Dr. Babasaheb Ambedkar International Airport" },
    Airport { iata: "VNS", city: "Varanasi", name: "Lal Bahadur Shastri International Airport" },
    Airport { iata: "PAT", city: "Patna", name: "Jay Prakash Narayan Airport" },
    Airport { iata: "SXR", city: "Srinagar", name: "Sheikh ul-Alam International Airport" },
    Airport { iata: "BHO", city: "Bhopal", name: "Raja Bhoj Airport" },
    Airport { iata: "IDR", city: "Indore", name: "Devi Ahilya Bai Holkar Airport" },
    Airport { iata: "RPR", city: "Raipur", name: "Swami Vivekananda Airport" },
    Airport { iata: "IXB", city: "Bagdogra", name: "Bagdogra Airport" },
    Airport { iata: "IXZ", city: "Port Blair", name: "Veer Savarkar International Airport" },
    Airport { iata: "IXR", city: "Ranchi", name: "Birsa Munda Airport" },
    Airport { iata: "IXU", city: "Aurangabad", name: "Aurangabad Airport" },
    Airport { iata: "IXE", city: "Mangalore", name: "Mangalore International Airport" },
    Airport { iata: "TRZ", city: "Tiruchirappalli", name: "Tiruchirappalli International Airport" },
    Airport { iata: "TIR", city: "Tirupati", name: "Tirupati Airport" },
    Airport { iata: "IXJ", city: "Jammu", name: "Jammu Airport" },
    Airport { iata: "IXL", city: "Leh", name: "Kushok Bakula Rimpochee Airport" },
    Airport { iata: "VTZ", city: "Visakhapatnam", name: "Visakhapatnam Airport" },
    Airport { iata: "BDQ", city: "Vadodara", name: "Vadodara Airport" },
    Airport { iata: "DXB", city: "Dubai", name: "Dubai International Airport" },
    Airport { iata: "AUH", city: "Abu Dhabi", name: "Abu Dhabi International Airport" },
    Airport { iata: "DOH", city: "Doha", name: "Hamad International Airport" },
    Airport { iata: "SIN", city: "Singapore", name: "Singapore Changi Airport" },
    Airport { iata: "BKK", city: "Bangkok", name: "Suvarnabhumi Airport" },
    Airport { iata: "KUL", city: "Kuala Lumpur", name: "Kuala Lumpur International Airport" },
    Airport { iata: "CMB", city: "Colombo", name: "Bandaranaike International Airport" },
    Airport { iata: "KTM", city: "Kathmandu", name: "Tribhuvan International Airport" },
    Airport { iata: "DAC", city: "Dhaka", name: "Hazrat Shahjalal International Airport" },
    Airport { iata: "LHR", city: "London", name: "Heathrow Airport" },
    Airport { iata: "CDG", city: "Paris", name: "Charles de Gaulle Airport" },
    Airport { iata: "FRA", city: "Frankfurt", name: "Frankfurt Airport" },
    Airport { iata: "AMS", city: "Amsterdam", name: "Amsterdam Schiphol Airport" },
    Airport { iata: "JFK", city: "New York", name: "John F. Kennedy International Airport" },
    Airport { iata: "LAX", city: "Los Angeles", name: "Los Angeles International Airport" },
    Airport { iata: "ORD", city: "Chicago", name: "O'Hare International Airport" },
    Airport { iata: "HND", city: "Tokyo", name: "Haneda Airport" },
    Airport { iata: "SYD", city: "Sydney", name: "Sydney Kingsford Smith Airport" },
];

// Alternative name -> canonical city. Includes codes commonly typed as
// city names ("mum" is not an airport code for Mumbai, but people use it).
static ALIASES: &[(&str, &str)] = &[
    ("cochin", "kochi"),
    ("bombay", "mumbai"),
    ("bangalore", "bengaluru"),
    ("calcutta", "kolkata"),
    ("madras", "chennai"),
    ("trivandrum", "thiruvananthapuram"),
    ("calicut", "kozhikode"),
    ("poona", "pune"),
    ("baroda", "vadodara"),
    ("mum", "mumbai"),
    ("navi mumbai", "mumbai"),
    ("new delhi", "delhi"),
];

static CITY_TO_IATA: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    AIRPORTS
        .iter()
        .map(|a| (a.city.to_lowercase(), a.iata))
        .collect()
});

const FUZZY_THRESHOLD: f64 = 0.85;

/// Resolves free-text locations to IATA airport codes.
pub struct AirportDirectory;

impl AirportDirectory {
    pub fn new() -> Self {
        Self
    }

    fn normalize(location: &str) -> String {
        location
            .trim()
            .to_lowercase()
            .replace(" airport", "")
            .replace(" international", "")
            .replace(" domestic", "")
    }

    /// Best-effort IATA code for a city name, alias, or code.
    pub fn iata_for(&self, location: &str) -> Option<String> {
        if location.trim().is_empty() {
            return None;
        }

        let upper = location.trim().to_uppercase();
        if upper.len() == 3 && AIRPORTS.iter().any(|a| a.iata == upper) {
            return Some(upper);
        }

        let normalized = Self::normalize(location);
        let canonical = ALIASES
            .iter()
            .find(|(alias, _)| *alias == normalized)
            .map(|(_, city)| (*city).to_string())
            .unwrap_or(normalized);

        if let Some(iata) = CITY_TO_IATA.get(&canonical) {
            return Some((*iata).to_string());
        }

        self.fuzzy_match(&canonical)
            .and_then(|city| CITY_TO_IATA.get(&city).map(|i| (*i).to_string()))
    }

    /// Closest city name by normalized edit distance, with a boost when one
    /// string contains the other.
    fn fuzzy_match(&self, query: &str) -> Option<String> {
        let mut best: Option<(String, f64)> = None;
        for city in CITY_TO_IATA.keys() {
            let mut score = strsim::normalized_levenshtein(query, city);
            if city.contains(query) || query.contains(city.as_str()) {
                score = score.max(0.9);
            }
            if score >= FUZZY_THRESHOLD
                && best.as_ref().map(|(_, s)| score > *s).unwrap_or(true)
            {
                best = Some((city.clone(), score));
            }
        }
        if let Some((city, score)) = &best {
            tracing::debug!(query, city = city.as_str(), score, "Fuzzy city match");
        }
        best.map(|(city, _)| city)
    }

    /// City name for a known IATA code, or the code itself.
    pub fn city_name(&self, iata: &str) -> String {
        let upper = iata.trim().to_uppercase();
        AIRPORTS
            .iter()
            .find(|a| a.iata == upper)
            .map(|a| a.city.to_string())
            .unwrap_or(upper)
    }

    /// Full airport name for a known IATA code.
    pub fn airport_name(&self, iata: &str) -> Option<&'static str> {
        let upper = iata.trim().to_uppercase();
        AIRPORTS.iter().find(|a| a.iata == upper).map(|a| a.name)
    }
}

impl Default for AirportDirectory {
    fn default() -> Self {
        Self::new()
    }
}
