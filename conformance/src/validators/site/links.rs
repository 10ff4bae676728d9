//! Internal link validator.
//!
//! Checks that every internal `href` and `src` in the generated pages points
//! to a generated file. Directory links (`/about`, `/about/`) resolve to
//! their `index.html`, and extensionless links (`/en/404`) to `{link}.html`.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use super::html_files;
use crate::report::{ConformanceReport, TestResult};

/// Validates internal links across the generated site. `base_path` is the
/// public prefix the site was generated with.
///
/// # Errors
///
/// Returns an error if the site directory cannot be walked.
pub fn validate(site: &Path, base_path: &str) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    let mut all_files: HashSet<String> = HashSet::new();
    for entry in WalkDir::new(site) {
        let entry = entry.with_context(|| format!("Cannot walk {}", site.display()))?;
        if entry.file_type().is_file() {
            let rel = entry.path().strip_prefix(site).unwrap_or(entry.path());
            all_files.insert(rel.to_string_lossy().replace('\\', "/"));
        }
    }

    let base_path = base_path.trim_end_matches('/');
    let mut broken: Vec<String> = Vec::new();

    for (file_label, content) in html_files(site)? {
        let Ok(content) = content else { continue };
        let rel_dir = file_label.rsplit_once('/').map_or("", |(dir, _)| dir);

        for href in extract_links(&content) {
            if is_external(&href) {
                continue;
            }
            let resolved = resolve_href(rel_dir, &href, base_path);
            let resolved = resolved
                .split(['#', '?'])
                .next()
                .unwrap_or_default()
                .to_string();
            if !exists(&all_files, &resolved) {
                broken.push(format!("{file_label}: broken link → {href}"));
            }
        }
    }

    report.push(TestResult::from_issues(
        "site/links",
        "No broken internal links in the site",
        format!("{} broken internal link(s) in the site", broken.len()),
        broken,
    ));
    Ok(report)
}

fn is_external(href: &str) -> bool {
    href.is_empty()
        || href.starts_with("http://")
        || href.starts_with("https://")
        || href.starts_with("//")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
        || href.starts_with('#')
}

fn exists(all_files: &HashSet<String>, resolved: &str) -> bool {
    if resolved.is_empty() {
        return all_files.contains("index.html");
    }
    if all_files.contains(resolved) {
        return true;
    }
    let trimmed = resolved.trim_end_matches('/');
    all_files.contains(&format!("{trimmed}/index.html"))
        || all_files.contains(&format!("{trimmed}.html"))
}

/// Extracts all `href` and `src` attribute values from HTML.
fn extract_links(html: &str) -> Vec<String> {
    let mut links = Vec::new();
    for attr in ["href=\"", "src=\""] {
        let mut remaining = html;
        while let Some(idx) = remaining.find(attr) {
            remaining = &remaining[idx + attr.len()..];
            if let Some(end) = remaining.find('"') {
                links.push(remaining[..end].replace("&amp;", "&"));
                remaining = &remaining[end + 1..];
            }
        }
    }
    links
}

/// Resolves a link against the directory of the page holding it.
///
/// Root-relative links have `base_path` stripped so that a site generated
/// under a subpath prefix still resolves against the local directory.
fn resolve_href(base_dir: &str, href: &str, base_path: &str) -> String {
    if href.starts_with('/') {
        let without_base = if base_path.is_empty() {
            href
        } else {
            href.strip_prefix(base_path).unwrap_or(href)
        };
        without_base.trim_start_matches('/').to_string()
    } else if base_dir.is_empty() {
        href.to_string()
    } else {
        format!("{base_dir}/{href}")
    }
}
