//! Form validator.
//!
//! - form slugs are present and unique
//! - field ids are present and unique within a form
//! - select fields offer at least one option

use std::collections::HashSet;

use folio_model::FieldKind;

use super::ContentSnapshot;
use crate::report::{ConformanceReport, TestResult};

/// Validates form records.
#[must_use]
pub fn validate(snapshot: &ContentSnapshot) -> ConformanceReport {
    let mut slugs = HashSet::new();
    let mut structure = Vec::new();
    let mut selects = Vec::new();

    for form in &snapshot.forms {
        let label = form
            .opt_text("slug")
            .or_else(|| form.opt_text("id"))
            .unwrap_or_else(|| "(form without slug)".to_string());
        match form.opt_text("slug") {
            None => structure.push(format!("{label}: missing slug")),
            Some(slug) if !slugs.insert(slug.clone()) => {
                structure.push(format!("slug `{slug}` used by more than one form"));
            }
            Some(_) => {}
        }

        let mut ids = HashSet::new();
        for field in form.records("fields") {
            let id = field.text("id");
            if id.is_empty() {
                structure.push(format!("{label}: field without an id"));
            } else if !ids.insert(id.clone()) {
                structure.push(format!("{label}: field id `{id}` repeats"));
            }
            if FieldKind::parse(&field.text("type")) == FieldKind::Select
                && field.strings("options").is_empty()
            {
                selects.push(format!("{label}: select field `{id}` has no options"));
            }
        }
    }

    let mut report = ConformanceReport::new();
    report.push(TestResult::from_issues(
        "content/forms",
        format!("All {} forms are well formed", snapshot.forms.len()),
        "Forms have missing or repeated slugs or field ids",
        structure,
    ));
    report.push(TestResult::from_issues(
        "content/select-options",
        "Every select field has options",
        format!("{} select field(s) without options", selects.len()),
        selects,
    ));
    report
}

#[cfg(test)]
mod tests {
    use folio_model::{ModelError, Record};
    use serde_json::json;

    use super::*;

    #[test]
    fn select_without_options_fails() -> Result<(), ModelError> {
        let snapshot = ContentSnapshot {
            pages: Vec::new(),
            forms: vec![Record::from_value(json!({"slug": "contact", "fields": [
                {"id": "topic", "type": "select", "options": []},
                {"id": "budget", "type": "select", "options": ["< 1M", "> 1M"]},
                {"id": "email", "type": "email"}
            ]}))?],
        };
        let report = validate(&snapshot);
        let selects: Vec<_> = report.by_validator("content/select-options").collect();
        assert!(selects[0].is_failure());
        assert_eq!(selects[0].details, ["contact: select field `topic` has no options"]);
        assert!(!report.by_validator("content/forms").any(TestResult::is_failure));
        Ok(())
    }

    #[test]
    fn repeated_field_ids_fail() -> Result<(), ModelError> {
        let snapshot = ContentSnapshot {
            pages: Vec::new(),
            forms: vec![Record::from_value(json!({"slug": "contact", "fields": [
                {"id": "name", "type": "text"},
                {"id": "name", "type": "text"}
            ]}))?],
        };
        let report = validate(&snapshot);
        assert!(report.by_validator("content/forms").all(TestResult::is_failure));
        Ok(())
    }
}
