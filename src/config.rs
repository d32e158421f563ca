//! Site configuration for shieldcache.
//!
//! Configuration lives next to the site it serves, in a `shieldcache.toml`
//! at the site root, and controls where the badge cache lives, how chatty
//! the build is, and how badges are fetched. Every field has a default, so
//! a missing file is equivalent to an empty one.
//!
//! # File Format
//!
//! ```toml
//! source_dir = "site"
//! verbose = true
//! endpoint = "https://img.shields.io/static/v1"
//! timeout_secs = 30
//! ```
//!
//! # Path Resolution
//!
//! The config path is resolved in precedence order:
//! 1. Explicit path (`--config` flag)
//! 2. `SHIELDCACHE_CONFIG` environment variable
//! 3. `shieldcache.toml` in the current directory

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{DEFAULT_SHIELDS_ENDPOINT, DEFAULT_TIMEOUT_SECS};

/// Configuration for a site's badge resolution.
///
/// Loaded from TOML; unknown keys are rejected so misspelled fields fail at
/// load time instead of silently falling back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Site source directory; the badge cache lives beneath it.
    ///
    /// Relative paths are interpreted against the process working directory
    /// and resolved to absolute form when the store is built.
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Emit debug-level build logging.
    #[serde(default)]
    pub verbose: bool,

    /// Static badge endpoint; the canonical query is appended after `?`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-fetch timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_endpoint() -> String {
    DEFAULT_SHIELDS_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            verbose: false,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from the default location.
    ///
    /// Returns defaults if no config file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional explicit path.
    ///
    /// An explicit path must exist; without one, this behaves like
    /// [`SiteConfig::load`].
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path does not exist, or if the file
    /// cannot be read or parsed.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(&path).await,
            None => Self::load().await,
        }
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read site config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse site config from {}", path.display()))
    }

    /// Save configuration to a specific path, creating parent directories
    /// as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize site config")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write site config to {}", path.display()))?;

        Ok(())
    }

    /// Default config file path.
    ///
    /// Honors the `SHIELDCACHE_CONFIG` environment variable, falling back to
    /// `shieldcache.toml` in the current directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        std::env::var_os("SHIELDCACHE_CONFIG")
            .map_or_else(|| PathBuf::from("shieldcache.toml"), PathBuf::from)
    }

    /// Per-fetch timeout as a [`std::time::Duration`].
    #[must_use]
    pub const fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }

    /// The site source directory resolved to an absolute path.
    ///
    /// Resolution happens against the current working directory without
    /// touching the filesystem; the directory does not need to exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    pub fn absolute_source_dir(&self) -> Result<PathBuf> {
        std::path::absolute(&self.source_dir).with_context(|| {
            format!("Failed to resolve site source dir {}", self.source_dir.display())
        })
    }
}
