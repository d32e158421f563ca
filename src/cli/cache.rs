//! Cache command: inspect or clean the badge cache.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::cache::ShieldStore;
use crate::config::SiteConfig;

/// Inspect or clean the site's badge cache.
///
/// Cached badges never expire on their own; `clean` is the manual reset
/// for picking up upstream style changes or reclaiming space.
#[derive(Args)]
pub struct CacheCommand {
    #[command(subcommand)]
    command: CacheSubcommand,

    /// Override the configured site source directory
    #[arg(short, long, global = true, value_name = "DIR")]
    source_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum CacheSubcommand {
    /// Show the cache location, entry count, and total size
    Info,
    /// Delete every cached badge
    Clean,
}

impl CacheCommand {
    /// Execute the cache command.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache store cannot be built or listed.
    pub async fn execute(self, mut site: SiteConfig) -> Result<()> {
        if let Some(dir) = self.source_dir {
            site.source_dir = dir;
        }

        let store =
            ShieldStore::new(&site.source_dir).context("Failed to open the badge cache")?;

        match self.command {
            CacheSubcommand::Info => {
                let stats = store.stats().await?;
                println!("Cache root: {}", store.root().display());
                println!("Entries:    {}", stats.entries);
                println!("Total size: {}", format_bytes(stats.total_bytes));
            }
            CacheSubcommand::Clean => {
                let removed = store.clear().await?;
                println!("{} Removed {removed} cached badge(s)", "✓".green());
            }
        }
        Ok(())
    }
}

fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}
