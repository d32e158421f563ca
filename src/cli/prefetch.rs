//! Prefetch command: warm the badge cache from a directive manifest.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;
use futures::StreamExt;
use futures::stream;
use indicatif::ProgressBar;
use std::path::PathBuf;

use crate::assets::{ShieldRegistrar, StaticAssets};
use crate::config::SiteConfig;
use crate::constants::DEFAULT_MAX_PARALLEL;
use crate::error::ShieldError;
use crate::request::BadgeRequest;
use crate::resolver::ShieldFactory;
use crate::shield::Shield;

/// Resolve every directive in a manifest, concurrently, ahead of a build.
///
/// The manifest is a JSON array of badge directives. Each directive is
/// resolved through the cache exactly like a build would resolve it, so a
/// subsequent build renders entirely from cache. Failures are reported
/// per badge and the command exits nonzero if any badge failed, which
/// makes prefetch usable as a CI gate.
#[derive(Args)]
pub struct PrefetchCommand {
    /// Path to a JSON array of badge directives
    manifest: PathBuf,

    /// Maximum concurrent badge resolutions
    #[arg(long, value_name = "N")]
    max_parallel: Option<usize>,

    /// Override the configured site source directory
    #[arg(short, long, value_name = "DIR")]
    source_dir: Option<PathBuf>,

    /// Copy registered shield assets into this site output root
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,
}

impl PrefetchCommand {
    /// Execute the prefetch command.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed, if
    /// registration or `--out` copying fails, or if any badge failed to
    /// resolve.
    pub async fn execute(self, mut site: SiteConfig, no_progress: bool) -> Result<()> {
        if let Some(dir) = self.source_dir {
            site.source_dir = dir;
        }

        let content = tokio::fs::read_to_string(&self.manifest)
            .await
            .with_context(|| format!("Failed to read manifest {}", self.manifest.display()))?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&content)
            .with_context(|| format!("Manifest {} is not a JSON array", self.manifest.display()))?;

        let mut requests = Vec::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            let request = BadgeRequest::from_json_value(value)
                .with_context(|| format!("Invalid badge directive at index {index}"))?;
            requests.push(request);
        }

        let factory = ShieldFactory::new(&site).context("Failed to open the badge cache")?;
        let max_parallel = self.max_parallel.unwrap_or(DEFAULT_MAX_PARALLEL).max(1);

        let total = requests.len();
        let progress = if no_progress || total == 0 {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total as u64)
        };

        let mut resolved: Vec<Shield> = Vec::new();
        let mut failures: Vec<(BadgeRequest, ShieldError)> = Vec::new();
        {
            let mut outcomes = stream::iter(requests.into_iter().map(|request| {
                let factory = &factory;
                async move {
                    let outcome = factory.resolve(&request).await;
                    (request, outcome)
                }
            }))
            .buffer_unordered(max_parallel);

            while let Some((request, outcome)) = outcomes.next().await {
                progress.inc(1);
                match outcome {
                    Ok(shield) => resolved.push(shield),
                    Err(e) => failures.push((request, e)),
                }
            }
        }
        progress.finish_and_clear();

        let registrar = ShieldRegistrar::new();
        let mut assets = StaticAssets::new();
        for shield in &resolved {
            registrar.register(&mut assets, shield)?;
            println!("  {} {}", "✓".green(), shield.basename);
        }
        for (request, error) in &failures {
            println!("  {} {}: {}", "✗".red(), request.canonical_query(), error);
        }

        if let Some(out) = &self.out {
            let copied = assets
                .copy_all(out)
                .await
                .with_context(|| format!("Failed to copy shield assets to {}", out.display()))?;
            println!("Copied {copied} shield asset(s) to {}", out.display());
        }

        if failures.is_empty() {
            println!("Prefetched {} badge(s), {} registered", total, assets.len());
            Ok(())
        } else {
            bail!("{} of {total} badge(s) failed to prefetch", failures.len());
        }
    }
}
