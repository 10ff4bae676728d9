//! Conformance report types: results, severity levels, and report aggregation.

use std::fmt;

use serde::Serialize;

/// Severity level of a conformance check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The check passed.
    Pass,
    /// The check identified a warning (non-blocking).
    Warning,
    /// The check failed (blocks publishing).
    Failure,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        }
    }
}

/// A single conformance check result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    /// Short identifier of the validator that produced this result.
    pub validator: String,
    /// Human-readable message describing the outcome.
    pub message: String,
    /// Severity of the result.
    pub severity: Severity,
    /// Additional detail lines, one per offending item.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl TestResult {
    fn new(validator: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
            severity,
            details: Vec::new(),
        }
    }

    /// Creates a passing result.
    pub fn pass(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Pass)
    }

    /// Creates a failure result.
    pub fn fail(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Failure)
    }

    /// Creates a failure result with additional detail lines.
    pub fn fail_with_details(
        validator: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            details,
            ..Self::fail(validator, message)
        }
    }

    /// Creates a warning result.
    pub fn warn(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Warning)
    }

    /// Creates a warning result with additional detail lines.
    pub fn warn_with_details(
        validator: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            details,
            ..Self::warn(validator, message)
        }
    }

    /// A pass when `issues` is empty, otherwise a failure listing them.
    pub fn from_issues(
        validator: &str,
        passed: impl Into<String>,
        failed: impl Into<String>,
        issues: Vec<String>,
    ) -> Self {
        if issues.is_empty() {
            Self::pass(validator, passed)
        } else {
            Self::fail_with_details(validator, failed, issues)
        }
    }

    /// Returns true if this result represents a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity.label(), self.validator, self.message)?;
        for detail in &self.details {
            write!(f, "\n    - {detail}")?;
        }
        Ok(())
    }
}

/// Aggregated conformance report from all validators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConformanceReport {
    /// All individual test results across all validators.
    pub results: Vec<TestResult>,
}

impl ConformanceReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result to this report.
    pub fn push(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Extends this report with results from another report.
    pub fn extend(&mut self, other: ConformanceReport) {
        self.results.extend(other.results);
    }

    fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity == severity).count()
    }

    /// Returns the count of failed checks.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.count(Severity::Failure)
    }

    /// Returns the count of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Returns true if all checks passed (no failures).
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }

    /// Results produced by one validator.
    pub fn by_validator<'a>(&'a self, validator: &'a str) -> impl Iterator<Item = &'a TestResult> {
        self.results.iter().filter(move |r| r.validator == validator)
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(f, "{result}")?;
        }
        write!(
            f,
            "{} checks: {} passed, {} warnings, {} failures",
            self.results.len(),
            self.count(Severity::Pass),
            self.warning_count(),
            self.failure_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_summary() {
        let mut report = ConformanceReport::new();
        report.push(TestResult::pass("content/slugs", "Page slugs are unique"));
        report.push(TestResult::warn("content/block-types", "1 unknown block"));
        report.push(TestResult::from_issues(
            "site/links",
            "ok",
            "1 broken link",
            vec!["index.html: /missing".into()],
        ));
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(!report.all_passed());

        let text = report.to_string();
        assert!(text.contains("[FAIL] site/links: 1 broken link\n    - index.html: /missing"));
        assert!(text.ends_with("3 checks: 1 passed, 1 warnings, 1 failures"));
    }

    #[test]
    fn serializes_severity_in_lowercase() -> Result<(), serde_json::Error> {
        let json = serde_json::to_value(TestResult::warn("x", "y"))?;
        assert_eq!(json["severity"], "warning");
        assert!(json.get("details").is_none());
        Ok(())
    }
}
