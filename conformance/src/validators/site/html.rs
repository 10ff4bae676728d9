//! HTML structure validator for the generated site.
//!
//! Checks structural requirements on every `.html` file:
//! - `<title>` element present on every page
//! - Semantic elements present: `<nav>`, `<main>`, `<footer>`
//! - `lang` attribute on the `<html>` element

use std::path::Path;

use anyhow::Result;

use super::html_files;
use crate::report::{ConformanceReport, TestResult};

/// Validates the structure of every generated page.
///
/// # Errors
///
/// Returns an error if the site directory cannot be walked.
pub fn validate(site: &Path) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let mut issues: Vec<String> = Vec::new();
    let mut pages_checked = 0u32;

    for (rel_path, content) in html_files(site)? {
        match content {
            Ok(content) => issues.extend(check_html_structure(&rel_path, &content)),
            Err(e) => issues.push(format!("Cannot read {rel_path}: {e}")),
        }
        pages_checked += 1;
    }

    if pages_checked == 0 {
        report.push(TestResult::warn("site/html", "No HTML files found in the site directory"));
        return Ok(report);
    }

    report.push(TestResult::from_issues(
        "site/html",
        format!("All {pages_checked} HTML pages pass structural validation"),
        format!("HTML structure issues across {pages_checked} pages checked"),
        issues,
    ));
    Ok(report)
}

/// Checks a single HTML file for structural issues using string-based heuristics.
fn check_html_structure(path: &str, content: &str) -> Vec<String> {
    let lower = content.to_lowercase();
    let mut issues = Vec::new();

    for element in ["title", "main", "nav", "footer"] {
        if !lower.contains(&format!("<{element}")) {
            issues.push(format!("{path}: missing <{element}> element"));
        }
    }

    let has_lang = lower
        .find("<html")
        .and_then(|start| lower[start..].find('>').map(|end| &lower[start..start + end]))
        .is_some_and(|tag| tag.contains("lang="));
    if !has_lang {
        issues.push(format!("{path}: <html> missing lang attribute"));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_each_missing_element() {
        let issues = check_html_structure(
            "about/index.html",
            "<html><head><title>x</title></head><body><main></main></body></html>",
        );
        assert_eq!(
            issues,
            [
                "about/index.html: missing <nav> element",
                "about/index.html: missing <footer> element",
                "about/index.html: <html> missing lang attribute",
            ]
        );
    }

    #[test]
    fn complete_page_passes() {
        let page = "<html lang=\"ru\"><title>t</title><nav></nav><main></main><footer></footer></html>";
        assert!(check_html_structure("index.html", page).is_empty());
    }
}
