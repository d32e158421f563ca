//! Command-line interface for shieldcache.
//!
//! The CLI wraps the resolution pipeline for site builds and maintenance:
//!
//! - `render` - Resolve one badge directive and print its markup
//! - `prefetch` - Warm the cache from a manifest of directives
//! - `cache` - Inspect or clean the badge cache
//!
//! Global flags control logging (`--verbose`/`--quiet`), configuration
//! (`--config`), and progress output (`--no-progress`). Logging goes to
//! stderr so `render` can print markup to stdout cleanly.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::SiteConfig;

mod cache;
mod prefetch;
mod render;

/// Runtime configuration derived from global CLI flags.
///
/// Built by [`Cli::build_config`] and threaded to the subcommands, which
/// keeps flag handling testable without touching process state.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level for the subscriber filter.
    ///
    /// Common values are `"error"`, `"info"`, and `"debug"`. When `None`,
    /// `RUST_LOG`, the site config's `verbose` flag, and finally the `info`
    /// default decide.
    pub log_level: Option<String>,

    /// Whether to disable progress bars and animated output.
    pub no_progress: bool,

    /// Explicit site config path, overriding `SHIELDCACHE_CONFIG` and the
    /// default `shieldcache.toml`.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Configuration with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Main CLI structure for shieldcache.
///
/// Uses the `clap` derive API for parsing, help text, and validation.
/// Options marked `global = true` are available to all subcommands.
#[derive(Parser)]
#[command(
    name = "shieldcache",
    about = "Cached shields.io badge resolver for static-site builds",
    version,
    long_about = "shieldcache resolves shields.io static badges through a content-addressed \
                  cache in the site source tree, so repeated builds render badges without \
                  touching the network."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output with debug-level detail.
    ///
    /// Shows cache hits and misses, fetch URLs, and registration events.
    /// Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors, for automation.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the site configuration file.
    ///
    /// Overrides the `SHIELDCACHE_CONFIG` environment variable and the
    /// default `shieldcache.toml` in the current directory.
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable progress bars.
    #[arg(long, global = true)]
    no_progress: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Resolve one badge directive and print its markup.
    ///
    /// The directive is a JSON object of badge fields; the resolved badge
    /// is served from cache when possible and the resulting `<img>` markup
    /// (or the degraded `<p>` fallback) goes to stdout.
    ///
    /// See [`render::RenderCommand`] for detailed options and behavior.
    Render(render::RenderCommand),

    /// Warm the badge cache from a manifest of directives.
    ///
    /// Reads a JSON array of directives and resolves them concurrently,
    /// reporting per-badge outcomes. Exits nonzero if any badge failed.
    ///
    /// See [`prefetch::PrefetchCommand`] for detailed options and behavior.
    Prefetch(prefetch::PrefetchCommand),

    /// Inspect or clean the badge cache.
    ///
    /// See [`cache::CacheCommand`] for detailed options and behavior.
    Cache(cache::CacheCommand),
}

impl Cli {
    /// Execute the parsed command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the command
    /// fails.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Build a [`CliConfig`] from the parsed global flags.
    ///
    /// `--verbose` maps to debug-level logging and `--quiet` to errors
    /// only; with neither flag the level is left open for `RUST_LOG` and
    /// the site config to decide.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            config_path: self.config.clone(),
        }
    }

    /// Execute with an explicit configuration, for tests and programmatic
    /// use.
    ///
    /// Loads the site config, initializes logging, and dispatches to the
    /// subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the command
    /// fails.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let site = SiteConfig::load_with_optional(config.config_path.clone()).await?;
        init_logging(&config, &site);

        match self.command {
            Commands::Render(cmd) => cmd.execute(site).await,
            Commands::Prefetch(cmd) => cmd.execute(site, config.no_progress).await,
            Commands::Cache(cmd) => cmd.execute(site).await,
        }
    }
}

/// Install the global tracing subscriber.
///
/// Precedence: explicit CLI flag level, then `RUST_LOG`, then the site
/// config's `verbose` flag, then `info`. Repeated initialization (as in
/// tests) is a no-op.
fn init_logging(config: &CliConfig, site: &SiteConfig) {
    let filter = match &config.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if site.verbose {
                EnvFilter::new("debug")
            } else {
                EnvFilter::new("info")
            }
        }),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
