//! `folio-check`: Checks content and a generated site before publishing.
//!
//! **Usage:**
//! ```text
//! folio-check [--content DIR | --api URL] [--site DIR] [--base-path PATH] [--json]
//! ```
//!
//! Exits non-zero if any check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use folio_clients::{env_config, init_tracing, SourceArgs, Store};
use folio_conformance::{run_all, Severity, Targets};

/// Run the Folio conformance checks.
#[derive(Parser)]
#[command(name = "folio-check", about = "Check Folio content and generated sites")]
struct Args {
    #[command(flatten)]
    source: SourceArgs,

    /// Generated site directory to check.
    #[arg(long, value_name = "DIR")]
    site: Option<PathBuf>,

    /// Public base path the site was generated with.
    #[arg(long, value_name = "PATH")]
    base_path: Option<String>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = env_config();

    // Content is optional here: checking only a site is allowed.
    let store: Option<Store> =
        if args.source.content.is_some() || args.source.api.is_some() || config.api_url.is_some() {
            Some(args.source.open(&config)?)
        } else {
            None
        };
    let targets = Targets {
        content: store.as_ref().map(Store::gateway),
        site: args.site.clone(),
        base_path: args.base_path.clone().unwrap_or_else(|| config.base_path().to_string()),
    };
    let report = run_all(&targets)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Folio Conformance Report");
        println!("========================");
        println!();
        for result in &report.results {
            let status = match result.severity {
                Severity::Pass => "PASS",
                Severity::Warning => "WARN",
                Severity::Failure => "FAIL",
            };
            println!("[{status}] {}: {}", result.validator, result.message);
            for detail in &result.details {
                println!("       {detail}");
            }
        }
        println!();
    }

    let failed = report.failure_count();
    if failed > 0 {
        eprintln!("Conformance FAILED: {failed} check(s) did not pass.");
        process::exit(1);
    }
    eprintln!(
        "Conformance PASSED ({} checks, {} warnings).",
        report.results.len(),
        report.warning_count()
    );
    Ok(())
}
