//! Page validator.
//!
//! - page slugs are present and unique
//! - block ids are unique within a page
//! - every page decodes into the typed model
//! - block types outside the known set (warning: they render nothing)

use std::collections::{BTreeMap, HashSet};

use folio_model::{BlockType, Document, Page};

use super::{page_label, ContentSnapshot};
use crate::report::{ConformanceReport, TestResult};

/// Validates page records.
#[must_use]
pub fn validate(snapshot: &ContentSnapshot) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    report.push(check_slugs(snapshot));
    report.push(check_block_ids(snapshot));
    report.push(check_decoding(snapshot));
    report.push(check_block_types(snapshot));
    report
}

fn check_slugs(snapshot: &ContentSnapshot) -> TestResult {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut issues = Vec::new();
    for page in &snapshot.pages {
        match page.opt_text("slug") {
            Some(slug) => *counts.entry(slug).or_default() += 1,
            None => issues.push(format!("{}: missing slug", page_label(page))),
        }
    }
    issues.extend(
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(slug, n)| format!("slug `{slug}` used by {n} pages")),
    );
    TestResult::from_issues(
        "content/slugs",
        format!("All {} page slugs are unique", snapshot.pages.len()),
        "Page slugs are missing or duplicated",
        issues,
    )
}

fn check_block_ids(snapshot: &ContentSnapshot) -> TestResult {
    let mut issues = Vec::new();
    for page in &snapshot.pages {
        let mut seen = HashSet::new();
        for block in page.records("blocks") {
            if let Some(id) = block.opt_text("id") {
                if !seen.insert(id.clone()) {
                    issues.push(format!("{}: block id `{id}` repeats", page_label(page)));
                }
            }
        }
    }
    TestResult::from_issues(
        "content/block-ids",
        "Block ids are unique within every page",
        "Duplicate block ids",
        issues,
    )
}

fn check_decoding(snapshot: &ContentSnapshot) -> TestResult {
    let issues: Vec<String> = snapshot
        .pages
        .iter()
        .filter_map(|page| {
            Page::from_record(page)
                .err()
                .map(|err| format!("{}: {err}", page_label(page)))
        })
        .collect();
    TestResult::from_issues(
        "content/decode",
        "Every page decodes",
        format!("{} page(s) do not decode", issues.len()),
        issues,
    )
}

fn check_block_types(snapshot: &ContentSnapshot) -> TestResult {
    let unknown: Vec<String> = snapshot
        .blocks()
        .filter_map(|(page, block)| {
            let tag = block.text("type");
            tag.parse::<BlockType>()
                .is_err()
                .then(|| format!("{page}: block `{}` has type `{tag}`", block.text("id")))
        })
        .collect();
    if unknown.is_empty() {
        TestResult::pass("content/block-types", "Every block type is known")
    } else {
        TestResult::warn_with_details(
            "content/block-types",
            format!("{} block(s) of unknown type will not render", unknown.len()),
            unknown,
        )
    }
}

#[cfg(test)]
mod tests {
    use folio_model::{ModelError, Record};
    use serde_json::json;

    use super::*;
    use crate::report::Severity;

    fn page(value: serde_json::Value) -> Result<Record, ModelError> {
        Record::from_value(value)
    }

    #[test]
    fn duplicates_are_failures() -> Result<(), ModelError> {
        let snapshot = ContentSnapshot {
            pages: vec![
                page(json!({"slug": "about", "blocks": [
                    {"id": "a", "type": "text"},
                    {"id": "a", "type": "spacer"}
                ]}))?,
                page(json!({"slug": "about"}))?,
                page(json!({"id": "p3"}))?,
            ],
            forms: Vec::new(),
        };
        let report = validate(&snapshot);
        let slugs: Vec<_> = report.by_validator("content/slugs").collect();
        assert!(slugs[0].is_failure());
        assert_eq!(slugs[0].details.len(), 2);
        assert!(report.by_validator("content/block-ids").all(TestResult::is_failure));
        Ok(())
    }

    #[test]
    fn unknown_types_only_warn() -> Result<(), ModelError> {
        let snapshot = ContentSnapshot {
            pages: vec![page(json!({"slug": "home", "blocks": [
                {"id": "x", "type": "carousel"}
            ]}))?],
            forms: Vec::new(),
        };
        let report = validate(&snapshot);
        let types: Vec<_> = report.by_validator("content/block-types").collect();
        assert_eq!(types[0].severity, Severity::Warning);
        assert!(report.all_passed());
        Ok(())
    }
}
