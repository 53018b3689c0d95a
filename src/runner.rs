//! Execution and aggregation loop.
//!
//! Every attempted case is parsed and verified exactly once. A case that
//! fails, whether by mismatch, parser error, panic, or timeout, becomes a
//! [`CaseFailure`] and the loop moves on; only the finished
//! [`AggregateReport`] leaves this module.

use crate::cases::{CaseSet, TestCase};
use crate::errors::{HarnessError, Result};
use crate::report::{AggregateReport, CaseFailure};
use futures::{stream, FutureExt, StreamExt};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{info, trace, warn};

/// The system under test: raw input string in, structured result out.
pub trait Parser {
    type Output;

    fn parse(&self, input: &str) -> impl Future<Output = anyhow::Result<Self::Output>> + Send;
}

/// Parser backed by a synchronous function.
#[derive(Debug, Clone)]
pub struct FnParser<F>(F);

/// Wrap a synchronous `Fn(&str) -> anyhow::Result<T>` as a [`Parser`].
pub fn parser_fn<F, T>(f: F) -> FnParser<F>
where
    F: Fn(&str) -> anyhow::Result<T>,
{
    FnParser(f)
}

impl<F, T> Parser for FnParser<F>
where
    F: Fn(&str) -> anyhow::Result<T>,
    T: Send,
{
    type Output = T;

    fn parse(&self, input: &str) -> impl Future<Output = anyhow::Result<T>> + Send {
        std::future::ready((self.0)(input))
    }
}

/// Parser backed by an async function taking its input by value.
#[derive(Debug, Clone)]
pub struct AsyncFnParser<F>(F);

/// Wrap an `Fn(String) -> impl Future<Output = anyhow::Result<T>>` as a [`Parser`].
pub fn async_parser_fn<F, Fut, T>(f: F) -> AsyncFnParser<F>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = anyhow::Result<T>> + Send,
{
    AsyncFnParser(f)
}

impl<F, Fut, T> Parser for AsyncFnParser<F>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = anyhow::Result<T>> + Send,
{
    type Output = T;

    fn parse(&self, input: &str) -> impl Future<Output = anyhow::Result<T>> + Send {
        (self.0)(input.to_string())
    }
}

/// How a case set is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Maximum number of cases in flight at once; values below 1 act as 1
    pub concurrency: usize,
    /// Per-case limit covering both parse and verify
    pub case_timeout: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            case_timeout: None,
        }
    }
}

impl RunOptions {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_case_timeout(mut self, timeout: Duration) -> Self {
        self.case_timeout = Some(timeout);
        self
    }
}

/// Run every present case of `cases` against `parser`.
///
/// Returns the report whether or not cases failed; use
/// [`AggregateReport::into_verdict`] to turn it into a pass/fail result.
/// An empty set is [`HarnessError::EmptySuite`].
///
/// A case timeout requires a Tokio runtime with the time driver enabled.
pub async fn run_cases<C, P>(
    cases: &CaseSet<C>,
    parser: &P,
    options: &RunOptions,
) -> Result<AggregateReport>
where
    C: TestCase<Parsed = P::Output>,
    P: Parser,
{
    if cases.is_empty() {
        return Err(HarnessError::EmptySuite {
            collection: cases.collection().to_string(),
        });
    }

    let attempted = cases.attempted();
    let concurrency = options.concurrency.max(1);
    info!(
        "Running {} cases from '{}' (concurrency {})",
        attempted,
        cases.collection(),
        concurrency
    );

    let outcomes: Vec<Option<CaseFailure>> = stream::iter(cases.iter().enumerate())
        .map(|(offset, (position, case))| attempt(offset + 1, position, case, parser, options))
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let failures: Vec<CaseFailure> = outcomes.into_iter().flatten().collect();
    info!(
        "Finished '{}': {} passed, {} failed",
        cases.collection(),
        attempted - failures.len(),
        failures.len()
    );
    Ok(AggregateReport::new(attempted, failures))
}

async fn attempt<C, P>(
    index: usize,
    position: usize,
    case: &C,
    parser: &P,
    options: &RunOptions,
) -> Option<CaseFailure>
where
    C: TestCase<Parsed = P::Output>,
    P: Parser,
{
    let outcome = match options.case_timeout {
        Some(limit) => match tokio::time::timeout(limit, execute(case, parser)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(format!(
                "timeout after {}ms (UA: {})",
                limit.as_millis(),
                case.input()
            )),
        },
        None => execute(case, parser).await,
    };

    match outcome {
        Ok(()) => {
            trace!("case {} passed", index);
            None
        }
        Err(message) => {
            let failure = CaseFailure::new(index, position, message);
            warn!("{} failed: {}", failure.location(), failure.message);
            Some(failure)
        }
    }
}

async fn execute<C, P>(case: &C, parser: &P) -> std::result::Result<(), String>
where
    C: TestCase<Parsed = P::Output>,
    P: Parser,
{
    let input = case.input();
    let parsed = match AssertUnwindSafe(async { parser.parse(input).await })
        .catch_unwind()
        .await
    {
        Ok(Ok(parsed)) => parsed,
        Ok(Err(err)) => return Err(format!("parser error: {err:#} (UA: {input})")),
        Err(payload) => {
            return Err(format!(
                "parser panicked: {} (UA: {input})",
                panic_message(&*payload)
            ))
        }
    };

    match std::panic::catch_unwind(AssertUnwindSafe(|| case.verify(&parsed))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(format!("{err:#}")),
        Err(payload) => Err(format!(
            "verification panicked: {} (UA: {input})",
            panic_message(&*payload)
        )),
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
