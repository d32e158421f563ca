//! Badge resolution: serve from cache, fetch on miss.
//!
//! [`ShieldFactory`] ties the pipeline together. A resolution derives the
//! cache file name from the request, serves the payload from disk when the
//! entry exists, and otherwise fetches it and persists it before anything
//! else observes it. Dimension extraction runs on whichever payload was
//! used, so a hit and a miss produce identical [`Shield`] values.
//!
//! A failed fetch leaves no cache entry behind: persistence happens only
//! after the fetcher returns bytes, and the store's atomic write means a
//! crash mid-write is invisible to later builds.

use tracing::debug;

use crate::cache::ShieldStore;
use crate::config::SiteConfig;
use crate::error::ShieldError;
use crate::fetch::{BadgeFetcher, ShieldsIoClient};
use crate::request::BadgeRequest;
use crate::shield::Shield;
use crate::svg;

/// Resolves badge requests against a site's cache, fetching on miss.
///
/// Generic over the fetcher so tests can resolve without a network; the
/// default client talks to the configured shields.io endpoint.
#[derive(Debug)]
pub struct ShieldFactory<C = ShieldsIoClient> {
    store: ShieldStore,
    client: C,
}

impl ShieldFactory {
    /// Build a factory from site configuration, with the production
    /// HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::Storage`] if the source directory cannot be
    /// resolved to an absolute path.
    pub fn new(config: &SiteConfig) -> Result<Self, ShieldError> {
        Self::with_client(config, ShieldsIoClient::from_config(config))
    }
}

impl<C: BadgeFetcher> ShieldFactory<C> {
    /// Build a factory with an explicit fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::Storage`] if the source directory cannot be
    /// resolved to an absolute path.
    pub fn with_client(config: &SiteConfig, client: C) -> Result<Self, ShieldError> {
        Ok(Self {
            store: ShieldStore::new(&config.source_dir)?,
            client,
        })
    }

    /// The underlying cache store.
    #[must_use]
    pub fn store(&self) -> &ShieldStore {
        &self.store
    }

    /// Resolve one badge request to a cached shield.
    ///
    /// On a cache hit the fetcher is never consulted. On a miss the
    /// payload is fetched and persisted before this returns, so the next
    /// resolution of the same request is a hit.
    ///
    /// # Errors
    ///
    /// - [`ShieldError::Fetch`] if the badge was not cached and fetching
    ///   failed; no cache entry is created.
    /// - [`ShieldError::Storage`] if cache I/O failed.
    /// - [`ShieldError::Metadata`] if the payload is not parseable XML.
    pub async fn resolve(&self, request: &BadgeRequest) -> Result<Shield, ShieldError> {
        let name = request.cache_file_name();
        self.store.ensure_root().await?;

        let payload = if self.store.contains(&name) {
            debug!(entry = %name, "shield cache hit");
            self.store.read(&name).await?
        } else {
            let query = request.canonical_query();
            debug!(entry = %name, %query, "shield cache miss");
            let payload = self.client.fetch(&query).await?;
            self.store.write(&name, &payload).await?;
            payload
        };

        let (width, height) = svg::intrinsic_dimensions(&payload)?;
        Ok(Shield::new(
            width,
            height,
            self.store.path_for(&name),
            request.href().map(str::to_string),
            request.alt().map(str::to_string),
            request.class().map(str::to_string),
        ))
    }
}
