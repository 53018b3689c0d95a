//! Aggregate report of one conformance run.

use std::fmt;
use thiserror::Error;

/// One attempted case that did not pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFailure {
    /// 1-based position among attempted cases (skipped records are not counted)
    pub index: usize,
    /// 1-based position of the record in the fixture collection
    pub position: usize,
    /// Human-readable description of the mismatch or error
    pub message: String,
}

impl CaseFailure {
    pub fn new(index: usize, position: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            position,
            message: message.into(),
        }
    }

    /// Both coordinates of the failing case, e.g. `case 2 (fixture 5)`.
    pub fn location(&self) -> String {
        format!("case {} (fixture {})", self.index, self.position)
    }
}

/// Renders the verdict line `case <n>: <message>`.
///
/// Verdict lines carry the attempt index only. The document position is kept
/// in [`CaseFailure::position`] and shown by [`CaseFailure::location`], which
/// the runner logs for every failure.
impl fmt::Display for CaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "case {}: {}", self.index, self.message)
    }
}

/// Every failure collected during one run, ordered by attempt index.
///
/// The run passed iff [`AggregateReport::is_pass`] holds. `Display` renders
/// one `case <n>: <message>` line per failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    attempted: usize,
    failures: Vec<CaseFailure>,
}

impl AggregateReport {
    /// Build a report, sorting failures into attempt order.
    pub fn new(attempted: usize, mut failures: Vec<CaseFailure>) -> Self {
        failures.sort_by_key(|failure| failure.index);
        Self {
            attempted,
            failures,
        }
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn passed(&self) -> usize {
        self.attempted.saturating_sub(self.failures.len())
    }

    pub fn failures(&self) -> &[CaseFailure] {
        &self.failures
    }

    pub fn is_pass(&self) -> bool {
        self.failures.is_empty()
    }

    /// Convert into the run's verdict.
    pub fn into_verdict(self) -> Result<Self, AggregateFailure> {
        if self.is_pass() {
            Ok(self)
        } else {
            Err(AggregateFailure::new(self))
        }
    }
}

impl fmt::Display for AggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for failure in &self.failures {
            writeln!(f, "{failure}")?;
        }
        Ok(())
    }
}

/// The single failure raised when any case in a run failed.
#[derive(Debug, Clone, Error)]
#[error("Failed tests: \n{report}")]
pub struct AggregateFailure {
    report: AggregateReport,
}

impl AggregateFailure {
    pub fn new(report: AggregateReport) -> Self {
        Self { report }
    }

    pub fn report(&self) -> &AggregateReport {
        &self.report
    }

    pub fn into_report(self) -> AggregateReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_passes() {
        let report = AggregateReport::new(5, Vec::new());
        assert!(report.is_pass());
        assert_eq!(report.passed(), 5);
        assert_eq!(report.to_string(), "");
        assert!(report.into_verdict().is_ok());
    }

    #[test]
    fn test_failures_are_sorted_by_index() {
        let report = AggregateReport::new(
            4,
            vec![
                CaseFailure::new(3, 5, "third"),
                CaseFailure::new(1, 1, "first"),
            ],
        );
        let indices: Vec<usize> = report.failures().iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(report.to_string(), "case 1: first\ncase 3: third\n");
    }

    #[test]
    fn test_verdict_carries_every_line() {
        let report = AggregateReport::new(
            3,
            vec![
                CaseFailure::new(1, 1, "Major - expected '3' but got '4'"),
                CaseFailure::new(2, 3, "parser error: boom"),
            ],
        );
        let failure = report.into_verdict().unwrap_err();
        let msg = failure.to_string();
        assert!(msg.starts_with("Failed tests: \n"));
        assert!(msg.contains("case 1: Major - expected '3' but got '4'\n"));
        assert!(msg.contains("case 2: parser error: boom\n"));
        assert_eq!(failure.report().passed(), 1);
    }

    #[test]
    fn test_passed_never_underflows() {
        let report = AggregateReport::new(
            1,
            vec![CaseFailure::new(1, 1, "a"), CaseFailure::new(2, 2, "b")],
        );
        assert_eq!(report.passed(), 0);
        assert!(!report.is_pass());
    }

    #[test]
    fn test_location_names_fixture_position() {
        let failure = CaseFailure::new(2, 5, "Family - expected 'A' but got 'B'");
        assert_eq!(failure.location(), "case 2 (fixture 5)");
        assert_eq!(failure.to_string(), "case 2: Family - expected 'A' but got 'B'");
    }
}
