//! Web-search fallback for when the travel API is down.
//!
//! Queries public SearXNG instances in order until one answers. If none do,
//! the caller falls back to a static advice message with booking-site links.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use travia_core::config::FallbackConfig;

/// One web search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Abstracts the search backend so the agent can be tested offline.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Top results for a query, or an empty vec if every backend failed.
    async fn search(&self, query: &str) -> Vec<SearchResult>;
}

#[derive(Debug, Deserialize)]
struct SearxResponse {
    #[serde(default)]
    results: Vec<SearxResult>,
}

#[derive(Debug, Deserialize)]
struct SearxResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// How many results to keep from a successful search.
const MAX_RESULTS: usize = 5;

/// [`WebSearcher`] over a list of public SearXNG instances.
pub struct SearxSearcher {
    http: reqwest::Client,
    instances: Vec<String>,
}

impl SearxSearcher {
    pub fn new(config: &FallbackConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            instances: config.searxng_instances.clone(),
        })
    }
}

#[async_trait]
impl WebSearcher for SearxSearcher {
    async fn search(&self, query: &str) -> Vec<SearchResult> {
        for instance in &self.instances {
            tracing::debug!(instance, "Trying search instance");
            let response = self
                .http
                .get(instance)
                .query(&[
                    ("q", query),
                    ("format", "json"),
                    ("categories", "general"),
                    ("language", "en"),
                ])
                .send()
                .await;

            let response = match response {
                Ok(r) if r.status().is_success() => r,
                Ok(r) => {
                    tracing::debug!(instance, status = r.status().as_u16(), "Instance refused");
                    continue;
                }
                Err(err) => {
                    tracing::debug!(instance, %err, "Instance unreachable");
                    continue;
                }
            };

            match response.json::<SearxResponse>().await {
                Ok(body) if !body.results.is_empty() => {
                    tracing::info!(instance, results = body.results.len(), "Web search succeeded");
                    return body
                        .results
                        .into_iter()
                        .take(MAX_RESULTS)
                        .map(|r| SearchResult {
                            title: if r.title.is_empty() {
                                "No title".to_string()
                            } else {
                                r.title
                            },
                            url: r.url,
                            snippet: r.content,
                        })
                        .collect();
                }
                Ok(_) => continue,
                Err(err) => {
                    tracing::debug!(instance, %err, "Bad response body");
                    continue;
                }
            }
        }
        tracing::warn!("All search instances failed");
        Vec::new()
    }
}

/// Format web results into the degraded-mode answer.
pub fn format_web_results(query: &str, results: &[SearchResult]) -> String {
    let mut out = format!(
        "\n⚠️ **Note: The live flight booking API is temporarily unavailable.**\n\n\
         🔍 **Here's what I found from web search for \"{query}\":**\n\n"
    );
    for (idx, result) in results.iter().enumerate() {
        let snippet = if result.snippet.is_empty() {
            "No description available".to_string()
        } else {
            result.snippet.chars().take(200).collect()
        };
        out.push_str(&format!(
            "\n**{}. {}**\n{}...\n🔗 {}\n\n",
            idx + 1,
            result.title,
            snippet,
            result.url
        ));
    }
    out.push_str(
        "\n💡 **Recommendations:**\n\
         - Visit the links above for real-time pricing and availability\n\
         - Check airline websites directly for best deals\n\
         - Compare prices on multiple booking platforms\n\
         - The live API should be back online soon - try again later!\n\n\
         ⚠️ **Disclaimer:** The information above is from web search results and may not \
         reflect current prices or availability. These are estimated options found on the internet.\n",
    );
    out
}

/// Static advice shown when both the travel API and web search are down.
pub fn fallback_advice(origin_city: &str, dest_city: &str, date: &str) -> String {
    format!(
        "\n⚠️ **The flight booking API is temporarily unavailable and web search is also having issues.**\n\n\
         📋 **Your Search Details:**\n\
         - From: {origin_city}\n\
         - To: {dest_city}\n\
         - Date: {date}\n\n\
         💡 **What you can do:**\n\
         1. **Visit these sites directly:**\n\
            - Google Flights: https://www.google.com/flights\n\
            - Skyscanner: https://www.skyscanner.com\n\
            - Kayak: https://www.kayak.com\n\n\
         2. **Check airline websites:**\n\
            - Air India: https://www.airindia.in\n\
            - IndiGo: https://www.goindigo.in\n\
            - Vistara: https://www.airvistara.com\n\n\
         3. **Try again later** - The API should be back online soon!\n\n\
         🔄 I'll be able to provide real-time flight data once the API is restored.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_searx_response_parsing() {
        let body: SearxResponse = serde_json::from_str(
            r#"{"results": [{"title": "Cheap flights", "url": "https://example.com", "content": "From ₹4000"}]}"#,
        )
        .unwrap();
        assert_eq!(body.results.len(), 1);
        assert_eq!(body.results[0].title, "Cheap flights");
    }

    #[test]
    fn test_searx_response_tolerates_missing_fields() {
        let body: SearxResponse = serde_json::from_str(r#"{"results": [{}]}"#).unwrap();
        assert!(body.results[0].title.is_empty());
        let empty: SearxResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.results.is_empty());
    }

    #[test]
    fn test_format_web_results() {
        let results = vec![
            SearchResult {
                title: "Mumbai to Delhi flights".to_string(),
                url: "https://example.com/flights".to_string(),
                snippet: "Starting at ₹3,500".to_string(),
            },
            SearchResult {
                title: "Best deals".to_string(),
                url: "https://example.org".to_string(),
                snippet: String::new(),
            },
        ];
        let out = format_web_results("flights from Mumbai to Delhi", &results);
        assert!(out.contains("temporarily unavailable"));
        assert!(out.contains("\"flights from Mumbai to Delhi\""));
        assert!(out.contains("**1. Mumbai to Delhi flights**"));
        assert!(out.contains("Starting at ₹3,500..."));
        assert!(out.contains("**2. Best deals**"));
        assert!(out.contains("No description available"));
        assert!(out.contains("Disclaimer"));
    }

    #[test]
    fn test_long_snippet_truncated() {
        let results = vec![SearchResult {
            title: "T".to_string(),
            url: "u".to_string(),
            snippet: "y".repeat(400),
        }];
        let out = format_web_results("q", &results);
        let line = out.lines().find(|l| l.starts_with('y')).unwrap();
        assert_eq!(line.chars().filter(|c| *c == 'y').count(), 200);
    }

    #[test]
    fn test_fallback_advice_mentions_route() {
        let out = fallback_advice("Mumbai", "Delhi", "2026-09-01");
        assert!(out.contains("From: Mumbai"));
        assert!(out.contains("To: Delhi"));
        assert!(out.contains("Date: 2026-09-01"));
        assert!(out.contains("Google Flights"));
    }

    #[tokio::test]
    async fn test_unreachable_instances_return_empty() {
        let config = FallbackConfig {
            enabled: true,
            searxng_instances: vec!["http://127.0.0.1:9/search".to_string()],
            timeout_secs: 1,
        };
        let searcher = SearxSearcher::new(&config).unwrap();
        assert!(searcher.search("flights").await.is_empty());
    }
}
