//! Generated-site validators (HTML structure, internal links, coverage).

pub mod coverage;
pub mod html;
pub mod links;

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::report::{ConformanceReport, TestResult};

/// Runs every site validator against the generated site in `site`.
///
/// # Errors
///
/// Returns an error if the site directory cannot be walked.
pub fn validate(site: &Path, base_path: &str) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    if !site.is_dir() {
        report.push(TestResult::warn(
            "site",
            format!("Site directory {} not found; skipping site checks", site.display()),
        ));
        return Ok(report);
    }
    report.extend(coverage::validate(site));
    report.extend(html::validate(site)?);
    report.extend(links::validate(site, base_path)?);
    Ok(report)
}

/// Every `.html` file under `site` as (relative path, contents), in path order.
fn html_files(site: &Path) -> Result<Vec<(String, io::Result<String>)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(site).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Cannot walk {}", site.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|x| x != "html") {
            continue;
        }
        let rel = path
            .strip_prefix(site)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        files.push((rel, std::fs::read_to_string(path)));
    }
    Ok(files)
}
