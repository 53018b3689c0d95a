//! uap-conformance - a data-driven conformance harness for user-agent parsers
//!
//! Fixtures are YAML (or JSON) documents holding a collection of records,
//! each describing an input string and the result a parser should produce.
//! The harness turns every record into a typed test case, runs all of them
//! against the parser under test, and returns one verdict that lists every
//! failing case instead of stopping at the first.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use uap_conformance::cases::UserAgentCase;
//! use uap_conformance::client_info::{ClientInfo, UserAgent};
//! use uap_conformance::runner::parser_fn;
//! use uap_conformance::run_conformance_suite;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fixtures = std::fs::read_to_string("tests/fixtures/test_ua.yaml")?;
//! let parser = parser_fn(|input: &str| {
//!     Ok(ClientInfo {
//!         user_agent: UserAgent::new(if input.contains("Firefox") { "Firefox" } else { "Other" }),
//!         ..Default::default()
//!     })
//! });
//!
//! run_conformance_suite(&fixtures, "test_cases", UserAgentCase::from_record, &parser).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`document`]: minimal node view over `yaml-rust2` events and `serde_json` trees
//! - [`fixtures`]: extraction of [`FixtureRecord`]s from a named collection
//! - [`cases`]: the [`TestCase`] contract, factories and skip markers
//! - [`runner`]: the [`Parser`] boundary and the execution loop
//! - [`report`]: the aggregate verdict
//! - [`harness`]: the configured entry point tying the above together
//! - [`suites`] and [`configuration`]: the upstream fixture catalog and its settings
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`] with [`HarnessError`]. Load
//! and construction errors abort a run before any case executes; case
//! failures are collected and surface together as [`HarnessError::Failed`].

pub mod cases;
pub mod client_info;
pub mod commands;
pub mod configuration;
pub mod document;
pub mod errors;
pub mod fixtures;
pub mod harness;
pub mod output;
pub mod report;
pub mod runner;
pub mod suites;

// Re-export commonly used types
pub use cases::{CaseFactory, CaseSet, SkipPolicy, TestCase};
pub use configuration::HarnessConfig;
pub use errors::{HarnessError, Result};
pub use fixtures::FixtureRecord;
pub use harness::{run_conformance_suite, Harness, Phase, RunSummary};
pub use report::{AggregateFailure, AggregateReport, CaseFailure};
pub use runner::{run_cases, Parser, RunOptions};
