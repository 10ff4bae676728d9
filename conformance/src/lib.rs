//! Folio conformance suite.
//!
//! Checks stored content and generated sites before they are published, and
//! reports every check as a pass, a warning or a failure.
//!
//! # Conformance Scope
//!
//! | Target | Checks |
//! |--------|--------|
//! | Pages | unique slugs, unique block ids, decodable, known block types |
//! | References | form blocks name existing forms, collection blocks known collections |
//! | Forms | unique slugs and field ids, select fields have options |
//! | Generated site | required files, HTML structure, internal links |
//!
//! # Entry Point
//!
//! ```no_run
//! use std::path::PathBuf;
//! use folio_conformance::{run_all, Targets};
//! use folio_gateway::MemoryGateway;
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = MemoryGateway::load_dir(std::path::Path::new("content"))?;
//! let targets = Targets {
//!     content: Some(&store),
//!     site: Some(PathBuf::from("public")),
//!     base_path: String::new(),
//! };
//! let report = run_all(&targets)?;
//! assert!(report.all_passed());
//! # Ok(())
//! # }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

use std::path::PathBuf;

use folio_gateway::ContentGateway;
use tracing::info;

pub use report::{ConformanceReport, Severity, TestResult};

/// What the conformance runner checks. Either target may be left out.
#[derive(Default)]
pub struct Targets<'a> {
    /// Content store whose pages and forms are checked.
    pub content: Option<&'a dyn ContentGateway>,
    /// Directory holding a generated site.
    pub site: Option<PathBuf>,
    /// Public base path the site was generated with.
    pub base_path: String,
}

/// Runs all validators and returns the aggregated report.
///
/// Validators are run in this order:
/// 1. Content: pages, references, forms
/// 2. Generated site: coverage, HTML structure, internal links
///
/// # Errors
///
/// Returns an error only if a file system operation fails. An unreachable
/// content store is reported as a failed check.
pub fn run_all(targets: &Targets<'_>) -> anyhow::Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    if let Some(content) = targets.content {
        report.extend(validators::content::validate(content));
    }
    if let Some(site) = &targets.site {
        report.extend(validators::site::validate(site, &targets.base_path)?);
    }
    if report.results.is_empty() {
        report.push(TestResult::warn("conformance", "Nothing to check"));
    }

    info!(
        checks = report.results.len(),
        warnings = report.warning_count(),
        failures = report.failure_count(),
        "conformance run finished"
    );
    Ok(report)
}
