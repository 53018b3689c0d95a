//! Command implementations for the `uap-conformance` CLI.
//!
//! - [`list_command`]: print the configured suite catalog
//! - [`check_command`]: load every selected suite and build its cases
//!
//! Running a suite needs a parser, which the CLI does not have; `check`
//! therefore stops after case construction and reports record counts.

use crate::configuration::HarnessConfig;
use crate::errors::{HarnessError, Result};
use crate::output;
use crate::suites::{inspect_suite, SuiteSpec};
use tabular::{Row, Table};
use tracing::debug;

#[cfg(test)]
mod tests;

/// Suites checked by [`check_command`] and the names of those that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub checked: usize,
    pub failed: Vec<String>,
}

impl CheckSummary {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Table of the configured suites: name, case kind and fixture path.
#[must_use]
pub fn suites_table(config: &HarnessConfig) -> Table {
    let mut table = Table::new("{:<}  {:<}  {:<}");
    table.add_row(Row::new().with_cell("SUITE").with_cell("KIND").with_cell("FILE"));
    for suite in &config.suites {
        table.add_row(
            Row::new()
                .with_cell(&suite.name)
                .with_cell(&suite.kind)
                .with_cell(suite.path_in(&config.fixtures_dir).display()),
        );
    }
    table
}

pub fn list_command(config: &HarnessConfig) -> Result<()> {
    debug!("uap-conformance list");
    print!("{}", suites_table(config));
    Ok(())
}

/// Resolve suite names against the configuration; no names selects all.
pub fn select_suites<'a>(config: &'a HarnessConfig, names: &[String]) -> Result<Vec<&'a SuiteSpec>> {
    if names.is_empty() {
        return Ok(config.suites.iter().collect());
    }
    names
        .iter()
        .map(|name| {
            config.find_suite(name).ok_or_else(|| {
                HarnessError::Config(anyhow::anyhow!("unknown suite '{name}'"))
            })
        })
        .collect()
}

pub fn check_command(config: &HarnessConfig, names: &[String]) -> Result<CheckSummary> {
    debug!("uap-conformance check");
    let suites = select_suites(config, names)?;

    let mut summary = CheckSummary::default();
    for suite in suites {
        summary.checked += 1;
        match inspect_suite(suite, config) {
            Ok(inventory) => {
                let msg = format!(
                    "{}: {} records, {} to run, {} skipped",
                    output::suite_name(&suite.name),
                    output::count(inventory.records),
                    output::count(inventory.attempted),
                    inventory.skipped
                );
                if inventory.attempted == 0 {
                    output::warning(&format!("{msg} (nothing to run)"));
                } else {
                    output::success(&msg);
                }
            }
            Err(err) => {
                debug!("suite '{}' failed with {} error", suite.name, err.category());
                output::error(&format!("{}: {}", output::suite_name(&suite.name), err));
                summary.failed.push(suite.name.clone());
            }
        }
    }
    Ok(summary)
}
