//! Site coverage validator.
//!
//! Verifies that the generated site carries the files every deployment needs:
//! a root page, a not-found page, `sitemap.xml` and the stylesheet.

use std::path::Path;

use crate::report::{ConformanceReport, TestResult};

const REQUIRED: [&str; 4] = ["index.html", "404.html", "sitemap.xml", "css/style.css"];

/// Validates that the required files are present.
#[must_use]
pub fn validate(site: &Path) -> ConformanceReport {
    let missing: Vec<String> = REQUIRED
        .iter()
        .filter(|file| !site.join(file).is_file())
        .map(|file| (*file).to_string())
        .collect();
    let mut report = ConformanceReport::new();
    report.push(TestResult::from_issues(
        "site/coverage",
        "Root page, 404 page, sitemap and stylesheet present",
        format!("{} required file(s) missing", missing.len()),
        missing,
    ));
    report
}
