//! Sheaf CLI - Markdown documentation site builder.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use sheaf_static::{load_config, load_toc, SiteBuilder};

#[derive(Parser)]
#[command(name = "sheaf")]
#[command(about = "Markdown documentation site builder")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    tracing::info!("Starting documentation build");

    // Both manifests come from the current working directory.
    let config = load_config(Path::new("config.yml")).context("Failed to load config.yml")?;
    let toc = load_toc(Path::new("toc.yml")).context("Failed to load toc.yml")?;

    let result = SiteBuilder::new(config, toc)
        .build()
        .context("Build failed")?;

    tracing::info!(
        "Build complete: processed {} files in {}ms",
        result.pages,
        result.duration_ms
    );
    tracing::info!("Output directory: {}", result.output_dir.display());

    Ok(())
}
