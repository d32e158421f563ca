//! shieldcache - Cached shields.io badge resolver for static-site builds
//!
//! A static-site build that renders shields.io badges at every run is slow
//! and fragile: each badge is a network round trip, and an endpoint outage
//! fails the build. shieldcache resolves badges through a content-addressed
//! cache in the site source tree, so each distinct badge is fetched exactly
//! once and every later build renders offline.
//!
//! # Architecture Overview
//!
//! A badge flows through a fixed pipeline:
//! - A [`request::BadgeRequest`] canonicalizes the badge fields into a query
//!   string, in insertion order, with presentation fields stripped
//! - The MD5 of that canonical query names the cache entry
//!   (`<hex>.svg` under `<source_dir>/_cache/shields_io/`)
//! - [`resolver::ShieldFactory`] serves the payload from
//!   [`cache::ShieldStore`], fetching via [`fetch::BadgeFetcher`] only on a
//!   miss and persisting atomically before returning
//! - [`svg::intrinsic_dimensions`] measures the payload for the markup
//! - [`assets::ShieldRegistrar`] queues the cached file with the build's
//!   static assets, idempotently by basename
//! - [`render::render_badge`] emits `<img>`/`<a>` markup, degrading to a
//!   plain `<p>` fallback on any failure so one bad badge cannot fail a
//!   build
//!
//! # Core Modules
//!
//! - [`request`] - Badge request modeling, canonicalization, cache keys
//! - [`cache`] - Content-addressed on-disk badge store
//! - [`fetch`] - Fetcher trait and the shields.io HTTP client
//! - [`svg`] - Intrinsic dimension extraction
//! - [`resolver`] - Fetch-or-cache orchestration
//! - [`assets`] - Static-asset registration with locale gating
//! - [`render`] - Markup and fallback rendering
//! - [`shield`] - The resolved badge value type
//!
//! ## Supporting Modules
//!
//! - [`cli`] - `render`, `prefetch`, and `cache` subcommands
//! - [`config`] - Site configuration (`shieldcache.toml`)
//! - [`constants`] - Endpoint, path, and timeout constants
//! - [`error`] - Error types and user-facing error reporting
//!
//! # Example
//!
//! ```rust,no_run
//! use shieldcache::assets::{ShieldRegistrar, StaticAssets};
//! use shieldcache::config::SiteConfig;
//! use shieldcache::render::render_badge;
//! use shieldcache::request::BadgeRequest;
//! use shieldcache::resolver::ShieldFactory;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let site = SiteConfig::load().await?;
//! let factory = ShieldFactory::new(&site)?;
//! let registrar = ShieldRegistrar::new();
//! let mut assets = StaticAssets::new();
//!
//! let request = BadgeRequest::new()
//!     .param("label", "build")
//!     .param("message", "passing")
//!     .with_href("https://ci.example.com");
//!
//! let markup = render_badge(&factory, &registrar, &mut assets, &request).await;
//! println!("{markup}");
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod render;
pub mod request;
pub mod resolver;
pub mod shield;
pub mod svg;

pub use error::{ErrorContext, ShieldError, user_friendly_error};
