//! shieldcache CLI entry point
//!
//! This is the main executable for the cached badge resolver. It handles
//! command-line argument parsing, error display, and command execution.
//!
//! Supported commands:
//! - `render` - Resolve one badge directive and print its markup
//! - `prefetch` - Warm the badge cache from a manifest of directives
//! - `cache` - Inspect or clean the badge cache

use anyhow::Result;
use clap::Parser;
use shieldcache::cli;
use shieldcache::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
