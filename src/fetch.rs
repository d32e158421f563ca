//! Remote badge fetching.
//!
//! [`BadgeFetcher`] is the seam between the resolver and the network. The
//! production implementation, [`ShieldsIoClient`], issues a single GET per
//! cache miss and treats anything outside the 2xx class as a failure.
//! Tests swap in stub fetchers so the pipeline runs without a network.
//!
//! There is no retry logic anywhere on this path: the cache makes fetches
//! rare, and a build that cannot reach the endpoint degrades at the
//! rendering layer instead of stalling on retries.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::config::SiteConfig;
use crate::error::ShieldError;

/// Source of badge payloads, keyed by canonical query string.
#[async_trait]
pub trait BadgeFetcher: Send + Sync {
    /// Fetch the payload for one canonical query.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::Fetch`] on transport failure or a non-2xx
    /// response.
    async fn fetch(&self, query: &str) -> Result<Vec<u8>, ShieldError>;
}

/// HTTP client for the shields.io static badge endpoint.
#[derive(Debug, Clone)]
pub struct ShieldsIoClient {
    endpoint: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl ShieldsIoClient {
    /// Create a client for the given endpoint with a per-request timeout.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Create a client from site configuration.
    #[must_use]
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.endpoint.clone(), config.fetch_timeout())
    }

    /// The configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl BadgeFetcher for ShieldsIoClient {
    async fn fetch(&self, query: &str) -> Result<Vec<u8>, ShieldError> {
        let url = format!("{}?{}", self.endpoint, query);
        debug!(%url, "fetching shield");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ShieldError::Fetch {
                status: None,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShieldError::Fetch {
                status: Some(status.as_u16()),
                reason: format!(
                    "{} for {url}",
                    status.canonical_reason().unwrap_or("unexpected status")
                ),
            });
        }

        let payload = response.bytes().await.map_err(|e| ShieldError::Fetch {
            status: None,
            reason: format!("failed reading response body: {e}"),
        })?;
        Ok(payload.to_vec())
    }
}
