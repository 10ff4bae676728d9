//! Content validators: pages, blocks and forms as stored in the gateway.
//!
//! Checks run on the raw stored records rather than the decoded documents so
//! that content the typed model rejects (a negative limit), repairs (a duplicate
//! block id) or renders as nothing (an unknown collection) is reported instead of failing the run.

pub mod forms;
pub mod pages;
pub mod references;

use folio_gateway::{ContentGateway, GatewayError, ListQuery, FORMS, PAGES};
use folio_model::Record;

use crate::report::{ConformanceReport, TestResult};

/// The stored pages and forms, read once per run.
#[derive(Debug, Clone, Default)]
pub struct ContentSnapshot {
    /// Page records in stored order.
    pub pages: Vec<Record>,
    /// Form records in stored order.
    pub forms: Vec<Record>,
}

impl ContentSnapshot {
    /// Reads every page and form.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when either listing fails.
    pub fn load<G: ContentGateway + ?Sized>(gateway: &G) -> Result<Self, GatewayError> {
        Ok(Self {
            pages: gateway.list(PAGES, &ListQuery::new())?,
            forms: gateway.list(FORMS, &ListQuery::new())?,
        })
    }

    /// Every block record with the label of the page holding it.
    pub fn blocks(&self) -> impl Iterator<Item = (String, Record)> + '_ {
        self.pages.iter().flat_map(|page| {
            let label = page_label(page);
            page.records("blocks")
                .into_iter()
                .map(move |block| (label.clone(), block))
        })
    }
}

/// How a page is named in messages: its slug, else its id.
pub(crate) fn page_label(page: &Record) -> String {
    page.opt_text("slug")
        .or_else(|| page.opt_text("id"))
        .unwrap_or_else(|| "(page without slug)".to_string())
}

/// Runs every content validator against `snapshot`.
#[must_use]
pub fn validate_snapshot(snapshot: &ContentSnapshot) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    report.extend(pages::validate(snapshot));
    report.extend(references::validate(snapshot));
    report.extend(forms::validate(snapshot));
    report
}

/// Loads content from `gateway` and validates it. A store that cannot be
/// read is itself a failure.
#[must_use]
pub fn validate<G: ContentGateway + ?Sized>(gateway: &G) -> ConformanceReport {
    match ContentSnapshot::load(gateway) {
        Ok(snapshot) => validate_snapshot(&snapshot),
        Err(err) => {
            let mut report = ConformanceReport::new();
            report.push(TestResult::fail(
                "content/load",
                format!("Cannot read content: {err}"),
            ));
            report
        }
    }
}
