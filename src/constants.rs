//! Global constants used throughout the shieldcache codebase.
//!
//! This module contains the shields.io endpoint, fixed path components, and
//! timeout values that are used across multiple modules. Defining them
//! centrally improves maintainability and makes magic values more
//! discoverable.

/// Endpoint for static badge generation.
///
/// The canonical query string of a badge request is appended after `?`.
pub const DEFAULT_SHIELDS_ENDPOINT: &str = "https://img.shields.io/static/v1";

/// Cache directory relative to the site source directory.
///
/// All cached badges live flat in this directory, named by the MD5 of
/// their canonical query.
pub const CACHE_SUBDIR: &str = "_cache/shields_io";

/// Destination directory for registered shield assets, relative to the
/// site output root.
pub const SHIELD_ASSET_DIR: &str = "assets/img/shields";

/// File extension for cached badge payloads.
pub const SVG_EXTENSION: &str = ".svg";

/// Default timeout for a single badge fetch, in seconds.
///
/// Applied per request; there are no retries, so this bounds the total
/// time a cache miss can block a build.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of concurrent resolutions during prefetch.
///
/// Badge fetches are small and I/O-bound, so a modest fixed bound keeps
/// throughput high without hammering the endpoint.
pub const DEFAULT_MAX_PARALLEL: usize = 8;
