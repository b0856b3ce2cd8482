//! IATA code to city name cache.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::client::TravelApi;

/// Resolves airport codes to city names via the location endpoint, caching
/// results for the process lifetime. Lookup failures fall back to the code
/// itself so formatting never breaks on a cache miss.
pub struct AirportCityCache {
    api: Arc<dyn TravelApi>,
    cache: Mutex<HashMap<String, String>>,
}

impl AirportCityCache {
    pub fn new(api: Arc<dyn TravelApi>) -> Self {
        Self {
            api,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// City name for an airport code, e.g. "BOM" -> "MUMBAI".
    pub async fn city_name(&self, iata_code: &str) -> String {
        {
            let cache = self.cache.lock().await;
            if let Some(city) = cache.get(iata_code) {
                return city.clone();
            }
        }

        match self.api.location_info(iata_code, "AIRPORT").await {
            Ok(locations) => {
                let city = locations
                    .into_iter()
                    .find_map(|l| l.city_name)
                    .unwrap_or_else(|| iata_code.to_string());
                let mut cache = self.cache.lock().await;
                cache.insert(iata_code.to_string(), city.clone());
                city
            }
            Err(err) => {
                tracing::debug!(iata_code, %err, "City lookup failed, using code");
                iata_code.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Location;
    use crate::error::TravelApiError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use travia_core::types::{FlightOffer, HotelInfo, HotelOffer};

    struct CountingApi {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl TravelApi for CountingApi {
        async fn search_flights(
            &self,
            _origin: &str,
            _destination: &str,
            _departure_date: &str,
            _adults: u32,
        ) -> Result<Vec<FlightOffer>, TravelApiError> {
            unimplemented!("not used by cache tests")
        }

        async fn hotels_by_city(
            &self,
            _city_code: &str,
        ) -> Result<Vec<HotelInfo>, TravelApiError> {
            unimplemented!("not used by cache tests")
        }

        async fn hotel_offers(
            &self,
            _hotel_id: &str,
            _adults: u32,
            _check_in: &str,
            _check_out: &str,
        ) -> Result<Vec<HotelOffer>, TravelApiError> {
            unimplemented!("not used by cache tests")
        }

        async fn location_info(
            &self,
            keyword: &str,
            _sub_type: &str,
        ) -> Result<Vec<Location>, TravelApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TravelApiError::Transport("down".to_string()));
            }
            Ok(vec![Location {
                iata_code: keyword.to_string(),
                name: format!("{keyword} INTL"),
                city_name: Some("MUMBAI".to_string()),
            }])
        }
    }

    #[tokio::test]
    async fn test_lookup_is_cached() {
        let api = Arc::new(CountingApi {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let cache = AirportCityCache::new(api.clone());
        assert_eq!(cache.city_name("BOM").await, "MUMBAI");
        assert_eq!(cache.city_name("BOM").await, "MUMBAI");
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back_to_code() {
        let api = Arc::new(CountingApi {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let cache = AirportCityCache::new(api.clone());
        assert_eq!(cache.city_name("DEL").await, "DEL");
        // Failures are not cached; the next call retries.
        assert_eq!(cache.city_name("DEL").await, "DEL");
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }
}
