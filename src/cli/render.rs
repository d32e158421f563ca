//! Render command: resolve one badge directive and print its markup.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::assets::{ShieldRegistrar, StaticAssets};
use crate::config::SiteConfig;
use crate::render::render_badge;
use crate::request::BadgeRequest;
use crate::resolver::ShieldFactory;

/// Resolve a badge directive and print `<img>` markup (or the fallback).
///
/// The directive is the same JSON object a site template would embed:
/// query fields plus optional `href`, `alt`, and `class`. Resolution goes
/// through the cache, so rendering an already-cached badge never touches
/// the network. A resolution failure prints the degraded `<p>` fallback
/// and still exits zero; only a malformed directive is a hard error.
#[derive(Args)]
pub struct RenderCommand {
    /// Badge directive as a JSON object
    ///
    /// Example: `{"label":"build","message":"passing","color":"brightgreen"}`
    directive: String,

    /// Override the configured site source directory
    #[arg(short, long, value_name = "DIR")]
    source_dir: Option<PathBuf>,

    /// Copy registered shield assets into this site output root
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,
}

impl RenderCommand {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the directive is malformed, the cache store
    /// cannot be built, or `--out` copying fails.
    pub async fn execute(self, mut site: SiteConfig) -> Result<()> {
        if let Some(dir) = self.source_dir {
            site.source_dir = dir;
        }

        let request = BadgeRequest::from_json_str(&self.directive)
            .context("Failed to parse badge directive")?;

        let factory = ShieldFactory::new(&site).context("Failed to open the badge cache")?;
        let registrar = ShieldRegistrar::new();
        let mut assets = StaticAssets::new();

        let markup = render_badge(&factory, &registrar, &mut assets, &request).await;

        if let Some(out) = &self.out {
            let copied = assets
                .copy_all(out)
                .await
                .with_context(|| format!("Failed to copy shield assets to {}", out.display()))?;
            info!(copied, out = %out.display(), "copied shield assets");
        }

        println!("{markup}");
        Ok(())
    }
}
