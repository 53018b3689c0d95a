//! Error types for the conformance harness.
//!
//! Every way a run can end other than a clean pass is a [`HarnessError`].
//! Most variants are fatal and abort the run before any case executes; the
//! aggregate verdict ([`HarnessError::Failed`]) is produced only after every
//! case has been attempted.

use crate::report::AggregateFailure;
use thiserror::Error;

/// The main error type for harness operations.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The fixture text could not be turned into the expected tree shape
    #[error("Fixture load error: {0}")]
    Load(String),

    /// The requested collection key is absent from the root mapping
    #[error("Fixture load error: collection '{key}' not found in document")]
    MissingCollection { key: String },

    /// A collection entry is not a mapping
    #[error("Fixture load error: entry {position} of '{key}' is not a mapping")]
    NotAMapping { key: String, position: usize },

    /// The case factory rejected a non-skipped record
    #[error("Failed to build test case from fixture {position}: {source:#}")]
    Construction {
        position: usize,
        #[source]
        source: anyhow::Error,
    },

    /// Extraction and filtering left nothing to run
    #[error("No test cases to run in collection '{collection}'")]
    EmptySuite { collection: String },

    /// At least one case failed; carries every failure of the run
    #[error(transparent)]
    Failed(#[from] AggregateFailure),

    /// Configuration-related errors (file parsing, validation, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// File I/O operation failures
    #[error("I/O operation failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A type alias for Results that use HarnessError.
pub type Result<T> = std::result::Result<T, HarnessError>;

impl HarnessError {
    /// Creates a new Load error.
    pub fn load<S: Into<String>>(msg: S) -> Self {
        HarnessError::Load(msg.into())
    }

    /// Creates a new Load error naming the fixture field involved.
    pub fn load_field<S1, S2>(field: S1, msg: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        HarnessError::Load(format!("{}: {}", field.into(), msg.into()))
    }

    /// Returns true if this error aborted the run before or instead of execution.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, HarnessError::Failed(_))
    }

    /// Returns true if this error came from reading or shaping the fixture document.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            HarnessError::Load(_)
                | HarnessError::MissingCollection { .. }
                | HarnessError::NotAMapping { .. }
        )
    }

    /// Returns the error category as a string for logging.
    pub fn category(&self) -> &'static str {
        match self {
            HarnessError::Load(_)
            | HarnessError::MissingCollection { .. }
            | HarnessError::NotAMapping { .. } => "load",
            HarnessError::Construction { .. } => "construction",
            HarnessError::EmptySuite { .. } => "empty_suite",
            HarnessError::Failed(_) => "failed",
            HarnessError::Config(_) => "config",
            HarnessError::Io(_) => "io",
        }
    }
}

impl From<config::ConfigError> for HarnessError {
    fn from(err: config::ConfigError) -> Self {
        HarnessError::Config(anyhow::Error::from(err))
    }
}

impl From<validator::ValidationErrors> for HarnessError {
    fn from(err: validator::ValidationErrors) -> Self {
        HarnessError::Config(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{AggregateReport, CaseFailure};

    #[test]
    fn test_load_errors_are_fatal() {
        let err = HarnessError::MissingCollection {
            key: "test_cases".to_string(),
        };
        assert!(err.is_fatal());
        assert!(err.is_load_error());
        assert_eq!(err.category(), "load");
        assert!(err.to_string().contains("test_cases"));
    }

    #[test]
    fn test_construction_error_display() {
        let err = HarnessError::Construction {
            position: 4,
            source: anyhow::anyhow!("missing field 'family'"),
        };
        assert_eq!(err.category(), "construction");
        assert!(!err.is_load_error());
        let msg = err.to_string();
        assert!(msg.contains("fixture 4"));
        assert!(msg.contains("missing field 'family'"));
    }

    #[test]
    fn test_aggregate_failure_is_not_fatal() {
        let report = AggregateReport::new(
            3,
            vec![CaseFailure::new(2, 2, "Family - expected 'Other' but got 'IE'")],
        );
        let err = HarnessError::from(AggregateFailure::new(report));
        assert!(!err.is_fatal());
        assert_eq!(err.category(), "failed");
        assert!(err.to_string().contains("case 2: Family"));
    }

    #[test]
    fn test_load_field_helper() {
        let err = HarnessError::load_field("user_agent_string", "value is not a scalar");
        assert_eq!(
            err.to_string(),
            "Fixture load error: user_agent_string: value is not a scalar"
        );
    }
}
