//! `folio-site`: Generates the public site as static files.
//!
//! **Usage:**
//! ```text
//! folio-site [--config folio.toml] [--content DIR | --api URL] [--out DIR]
//! ```
//!
//! Without `--config`, `folio.toml` is read when present. Flags override the
//! file, which the environment (`FOLIO_BASE_PATH`, `FOLIO_API_URL`,
//! `FOLIO_TOKEN`) overrides in turn.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use folio_clients::{env_config, init_tracing, SourceArgs};
use folio_site::{generate, SiteConfig};

const DEFAULT_CONFIG: &str = "folio.toml";

/// Generate the Folio public site.
#[derive(Parser)]
#[command(name = "folio-site", about = "Generate the Folio public site")]
struct Args {
    /// Site configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(flatten)]
    source: SourceArgs,

    /// Output directory (default: the configured `out_dir`).
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SiteConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG).is_file() => SiteConfig::load(Path::new(DEFAULT_CONFIG))?,
        None => env_config(),
    };
    args.source.override_config(&mut config);
    let out = args.out.clone().unwrap_or_else(|| config.out_dir.clone());

    let store = args.source.open(&config)?;
    let report = generate(store.gateway(), &config, &out)?;

    println!("Site generated successfully.");
    println!("  Pages:        {}", report.pages);
    println!("  Detail pages: {}", report.detail_pages);
    if report.skipped > 0 {
        println!("  Skipped:      {} page(s) that do not decode", report.skipped);
    }
    println!("  Files:        {}", report.files.len());
    println!("  Output:       {}", out.display());
    Ok(())
}
