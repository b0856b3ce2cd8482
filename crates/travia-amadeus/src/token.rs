//! OAuth2 client-credentials token handling.
//!
//! Amadeus issues short-lived bearer tokens from
//! `POST /v1/security/oauth2/token`. The manager caches the token and
//! refreshes it 30 seconds before the reported expiry so in-flight requests
//! never race the cutoff.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;

use travia_core::config::AmadeusConfig;

use crate::error::TravelApiError;

/// Refresh this long before the provider-reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Caches and refreshes the OAuth2 bearer token.
pub struct TokenManager {
    http: reqwest::Client,
    config: AmadeusConfig,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    pub fn new(http: reqwest::Client, config: AmadeusConfig) -> Self {
        Self {
            http,
            config,
            cached: Mutex::new(None),
        }
    }

    fn token_url(&self) -> String {
        format!(
            "{}/v1/security/oauth2/token",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// A valid bearer token, fetching a fresh one if the cache is empty or
    /// inside the expiry margin.
    pub async fn bearer(&self) -> Result<String, TravelApiError> {
        let mut cached = self.cached.lock().await;
        if let Some(entry) = cached.as_ref() {
            if Instant::now() < entry.expires_at {
                return Ok(entry.token.clone());
            }
        }

        let fresh = self.fetch().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    /// Drop the cached token. Called after a 401 so the next request
    /// authenticates from scratch.
    pub async fn invalidate(&self) {
        let mut cached = self.cached.lock().await;
        *cached = None;
    }

    async fn fetch(&self) -> Result<CachedToken, TravelApiError> {
        tracing::debug!("Requesting new access token");
        let response = self
            .http
            .post(self.token_url())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TravelApiError::Auth(format!(
                "token endpoint returned status {}",
                status.as_u16()
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| TravelApiError::Auth(format!("invalid token response: {e}")))?;

        let lifetime = Duration::from_secs(body.expires_in).saturating_sub(EXPIRY_MARGIN);
        Ok(CachedToken {
            token: body.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }
}
