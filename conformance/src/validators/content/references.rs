//! Reference validator.
//!
//! - form blocks name a form that exists
//! - collection blocks name a known collection (an empty choice warns)
//! - detail prefixes are root-relative paths (warning)

use std::collections::HashSet;

use folio_model::CollectionName;

use super::ContentSnapshot;
use crate::report::{ConformanceReport, TestResult};

/// Validates references from blocks to forms and collections.
#[must_use]
pub fn validate(snapshot: &ContentSnapshot) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    report.push(check_form_refs(snapshot));
    report.extend(check_collections(snapshot));
    report
}

fn check_form_refs(snapshot: &ContentSnapshot) -> TestResult {
    let known: HashSet<String> = snapshot
        .forms
        .iter()
        .flat_map(|f| [f.opt_text("slug"), f.opt_text("id")])
        .flatten()
        .collect();
    let issues: Vec<String> = snapshot
        .blocks()
        .filter(|(_, block)| block.text("type") == "form")
        .filter_map(|(page, block)| match block.opt_text("form_slug") {
            None => Some(format!("{page}: form block `{}` names no form", block.text("id"))),
            Some(slug) if !known.contains(&slug) => {
                Some(format!("{page}: form `{slug}` does not exist"))
            }
            Some(_) => None,
        })
        .collect();
    TestResult::from_issues(
        "content/form-refs",
        "Every form block references an existing form",
        format!("{} form block(s) reference missing forms", issues.len()),
        issues,
    )
}

fn check_collections(snapshot: &ContentSnapshot) -> ConformanceReport {
    let mut unknown = Vec::new();
    let mut unset = Vec::new();
    let mut prefixes = Vec::new();
    for (page, block) in snapshot
        .blocks()
        .filter(|(_, block)| block.text("type") == "collection")
    {
        let id = block.text("id");
        match block.opt_text("collection") {
            None => unset.push(format!("{page}: collection block `{id}` lists nothing")),
            Some(name) if name.parse::<CollectionName>().is_err() => {
                unknown.push(format!("{page}: unknown collection `{name}`"));
            }
            Some(_) => {}
        }
        if let Some(prefix) = block.opt_text("detail_prefix") {
            if !prefix.starts_with('/') {
                prefixes.push(format!("{page}: detail prefix `{prefix}` is not root-relative"));
            }
        }
    }

    let mut report = ConformanceReport::new();
    report.push(TestResult::from_issues(
        "content/collections",
        "Every collection block names a known collection",
        format!("{} collection block(s) name unknown collections", unknown.len()),
        unknown,
    ));
    if !unset.is_empty() {
        report.push(TestResult::warn_with_details(
            "content/collections",
            "Collection blocks without a collection render nothing",
            unset,
        ));
    }
    if !prefixes.is_empty() {
        report.push(TestResult::warn_with_details(
            "content/detail-prefix",
            "Detail pages are only generated for root-relative prefixes",
            prefixes,
        ));
    }
    report
}
