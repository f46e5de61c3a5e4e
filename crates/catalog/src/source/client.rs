//! HTTP source fetcher with retry logic.

use super::SourceFetcher;
use crate::error::SourceError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Fetches source files from `<base_url>/<name>`
pub struct HttpSourceFetcher {
    /// HTTP client
    client: Client,
    /// Base URL the source names are appended to
    base_url: String,
    /// Maximum retries for failed requests
    max_retries: u32,
    /// Base delay for retry (exponential backoff)
    retry_delay_ms: u64,
}

impl HttpSourceFetcher {
    /// Create a new HTTP source fetcher
    pub fn new(base_url: impl Into<String>, max_retries: u32, retry_delay_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("catalog/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_retries,
            retry_delay_ms,
        })
    }

    /// URL a source name resolves to
    pub fn source_url(&self, source: &str) -> String {
        format!("{}/{}", self.base_url, source.trim_start_matches('/'))
    }

    fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_delay_ms.saturating_mul(2u64.saturating_pow(attempt)))
    }

    /// Whether a failed status is worth another attempt
    fn is_retryable(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }
}

#[async_trait]
impl SourceFetcher for HttpSourceFetcher {
    async fn fetch(&self, source: &str) -> Result<Value, SourceError> {
        let url = self.source_url(source);
        let mut attempt = 0;

        loop {
            debug!(url = %url, attempt = attempt + 1, "Fetching source");

            let error = match self.client.get(&url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let body = response.bytes().await.map_err(|error| SourceError::Http {
                            source_name: source.to_string(),
                            error,
                        })?;
                        return serde_json::from_slice(&body).map_err(|error| SourceError::Parse {
                            source_name: source.to_string(),
                            error,
                        });
                    }

                    let error = SourceError::Status {
                        source_name: source.to_string(),
                        status: status.as_u16(),
                    };
                    if !Self::is_retryable(status) {
                        return Err(error);
                    }
                    error
                }
                Err(error) => SourceError::Http {
                    source_name: source.to_string(),
                    error,
                },
            };

            if attempt >= self.max_retries {
                return Err(error);
            }

            let delay = self.backoff(attempt);
            warn!(
                url = %url,
                error = %error,
                delay_ms = delay.as_millis() as u64,
                "Source request failed, retrying"
            );
            sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let fetcher = HttpSourceFetcher::new("https://cdn.example.com/jsons/", 3, 1000);
        assert!(fetcher.is_ok());
    }

    #[test]
    fn test_source_url() -> Result<()> {
        let fetcher = HttpSourceFetcher::new("https://cdn.example.com/jsons/", 0, 10)?;
        assert_eq!(
            fetcher.source_url("anime.json"),
            "https://cdn.example.com/jsons/anime.json"
        );
        assert_eq!(
            fetcher.source_url("/south.json"),
            "https://cdn.example.com/jsons/south.json"
        );
        Ok(())
    }

    #[test]
    fn test_backoff_doubles() -> Result<()> {
        let fetcher = HttpSourceFetcher::new("http://localhost", 3, 100)?;
        assert_eq!(fetcher.backoff(0), Duration::from_millis(100));
        assert_eq!(fetcher.backoff(1), Duration::from_millis(200));
        assert_eq!(fetcher.backoff(2), Duration::from_millis(400));
        Ok(())
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(HttpSourceFetcher::is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(HttpSourceFetcher::is_retryable(StatusCode::BAD_GATEWAY));
        assert!(!HttpSourceFetcher::is_retryable(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() -> Result<()> {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let fetcher = HttpSourceFetcher::new("http://127.0.0.1:9", 0, 1)?;
        let result = fetcher.fetch("anime.json").await;
        assert!(matches!(
            result,
            Err(SourceError::Http { .. }) | Err(SourceError::Status { .. })
        ));
        Ok(())
    }
}
