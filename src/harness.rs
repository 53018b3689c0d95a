//! Entry point tying extraction, case construction and execution together.
//!
//! A run moves through the [`Phase`]s in order, exactly once:
//! the fixture text is loaded and parsed, the collection is extracted,
//! cases are built, every case is executed, and the report is produced.
//! Any fatal error ends the run in the phase it occurred in.

use crate::cases::{CaseFactory, CaseSet, SkipPolicy, TestCase};
use crate::configuration::HarnessConfig;
use crate::document::{DocumentFormat, Yaml};
use crate::errors::Result;
use crate::fixtures::extract_records;
use crate::report::AggregateReport;
use crate::runner::{run_cases, Parser, RunOptions};
use std::fmt;
use tracing::{debug, info};

/// Lifecycle of one conformance run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Loaded,
    Extracted,
    CasesBuilt,
    Executing,
    Reported,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Loaded => "loaded",
            Phase::Extracted => "extracted",
            Phase::CasesBuilt => "cases-built",
            Phase::Executing => "executing",
            Phase::Reported => "reported",
        };
        f.write_str(name)
    }
}

/// Outcome of a run in which every attempted case passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub collection: String,
    /// Records found in the collection
    pub records: usize,
    /// Records excluded by the skip policy
    pub skipped: usize,
    pub report: AggregateReport,
}

impl RunSummary {
    pub fn attempted(&self) -> usize {
        self.report.attempted()
    }
}

/// A configured conformance harness.
#[derive(Debug, Clone, Default)]
pub struct Harness {
    skip_policy: SkipPolicy,
    options: RunOptions,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skip_policy(mut self, skip_policy: SkipPolicy) -> Self {
        self.skip_policy = skip_policy;
        self
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            skip_policy: config.skip_policy(),
            options: config.run_options(),
        }
    }

    pub fn skip_policy(&self) -> &SkipPolicy {
        &self.skip_policy
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Parse `text` as `D`, extract `collection_key` and build its cases.
    pub fn load_cases<D, F>(
        &self,
        text: &str,
        collection_key: &str,
        factory: &F,
    ) -> Result<CaseSet<F::Case>>
    where
        D: DocumentFormat,
        F: CaseFactory + ?Sized,
    {
        debug!("phase {}: {} bytes of {}", Phase::Loaded, text.len(), D::NAME);
        let records = extract_records::<D>(text, collection_key)?;
        debug!(
            "phase {}: {} records in '{}'",
            Phase::Extracted,
            records.len(),
            collection_key
        );

        let cases = CaseSet::build(&records, collection_key, &self.skip_policy, factory)?;
        debug!(
            "phase {}: {} to attempt, {} skipped",
            Phase::CasesBuilt,
            cases.attempted(),
            cases.skipped()
        );
        Ok(cases)
    }

    /// Run the whole suite and turn the report into a verdict.
    ///
    /// Fails with [`HarnessError::Failed`](crate::errors::HarnessError::Failed)
    /// if any case failed, carrying every failure of the run.
    pub async fn run<D, F, P>(
        &self,
        text: &str,
        collection_key: &str,
        factory: &F,
        parser: &P,
    ) -> Result<RunSummary>
    where
        D: DocumentFormat,
        F: CaseFactory + ?Sized,
        P: Parser<Output = <F::Case as TestCase>::Parsed>,
    {
        let cases = self.load_cases::<D, F>(text, collection_key, factory)?;

        debug!("phase {}", Phase::Executing);
        let report = run_cases(&cases, parser, &self.options).await?;
        info!(
            "phase {}: {}/{} passed in '{}'",
            Phase::Reported,
            report.passed(),
            report.attempted(),
            collection_key
        );

        let report = report.into_verdict()?;
        Ok(RunSummary {
            collection: collection_key.to_string(),
            records: cases.records(),
            skipped: cases.skipped(),
            report,
        })
    }
}

/// Run a YAML fixture collection against `parser` with default settings.
///
/// Records carrying the `js_ua` marker are skipped, cases run one at a time,
/// and every failure is collected before the verdict is returned.
pub async fn run_conformance_suite<F, P>(
    text: &str,
    collection_key: &str,
    factory: F,
    parser: &P,
) -> Result<()>
where
    F: CaseFactory,
    P: Parser<Output = <F::Case as TestCase>::Parsed>,
{
    Harness::default()
        .run::<Yaml, F, P>(text, collection_key, &factory, parser)
        .await
        .map(|_| ())
}
