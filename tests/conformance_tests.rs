//! Runs the bundled fixture suites end to end.
//!
//! The parser under test is an oracle built from the fixtures themselves,
//! so every suite passes unless the oracle is deliberately corrupted.

use rstest::*;
use std::collections::HashMap;
use std::path::PathBuf;
use uap_conformance::client_info::{ClientInfo, Device, Os, UserAgent};
use uap_conformance::configuration::HarnessConfig;
use uap_conformance::document::Yaml;
use uap_conformance::fixtures::{extract_records, FixtureRecord};
use uap_conformance::runner::parser_fn;
use uap_conformance::suites::{builtin_suites, inspect_suite, run_suite, CaseKind, SuiteSpec};
use uap_conformance::HarnessError;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[fixture]
fn config() -> HarnessConfig {
    HarnessConfig {
        fixtures_dir: fixtures_dir(),
        ..Default::default()
    }
}

fn owned(record: &FixtureRecord, key: &str) -> Option<String> {
    record.optional(key).map(str::to_string)
}

fn expected_info(kind: &CaseKind, record: &FixtureRecord) -> ClientInfo {
    let family = record.get("family").unwrap_or("Other").to_string();
    let mut info = ClientInfo::default();
    match kind {
        CaseKind::UserAgent => {
            info.user_agent = UserAgent {
                family,
                major: owned(record, "major"),
                minor: owned(record, "minor"),
                patch: owned(record, "patch"),
            }
        }
        CaseKind::Os => {
            info.os = Os {
                family,
                major: owned(record, "major"),
                minor: owned(record, "minor"),
                patch: owned(record, "patch"),
                patch_minor: owned(record, "patch_minor"),
            }
        }
        CaseKind::Device => {
            info.device = Device {
                family,
                brand: owned(record, "brand"),
                model: owned(record, "model"),
            }
        }
        CaseKind::Unknown(kind) => panic!("unexpected kind {kind}"),
    }
    info
}

/// Expected results of a suite, keyed by input string.
fn oracle_table(spec: &SuiteSpec, config: &HarnessConfig) -> HashMap<String, ClientInfo> {
    let text = spec.read_fixture(&config.fixtures_dir).unwrap();
    extract_records::<Yaml>(&text, &config.collection_key)
        .unwrap()
        .iter()
        .map(|record| {
            (
                record.get("user_agent_string").unwrap().to_string(),
                expected_info(&spec.kind, record),
            )
        })
        .collect()
}

#[rstest]
#[tokio::test]
async fn test_every_builtin_suite_passes_against_oracle(config: HarnessConfig) {
    for spec in builtin_suites() {
        let table = oracle_table(&spec, &config);
        let parser = parser_fn(|input: &str| Ok(table.get(input).cloned().unwrap_or_default()));

        let summary = run_suite(&spec, &config, &parser)
            .await
            .unwrap_or_else(|err| panic!("suite '{}' failed: {err}", spec.name));
        assert_eq!(summary.records, summary.attempted() + summary.skipped);
        assert!(summary.attempted() > 0);
    }
}

#[rstest]
#[tokio::test]
async fn test_corrupted_oracle_reports_one_case(config: HarnessConfig) {
    let spec = config.find_suite("ua").unwrap().clone();
    let mut table = oracle_table(&spec, &config);
    let chrome = table
        .values_mut()
        .find(|info| info.user_agent.family == "Chrome")
        .unwrap();
    chrome.user_agent.major = Some("46".to_string());

    let parser = parser_fn(|input: &str| Ok(table.get(input).cloned().unwrap_or_default()));
    let err = run_suite(&spec, &config, &parser).await.unwrap_err();

    let HarnessError::Failed(failure) = &err else {
        panic!("expected aggregate failure, got {err:?}");
    };
    let failures = failure.report().failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, 2);
    assert!(failures[0]
        .message
        .starts_with("Major - expected '45' but got '46'"));
    assert!(err.to_string().starts_with("Failed tests: \ncase 2: Major"));
}

#[rstest]
#[tokio::test]
async fn test_parser_errors_do_not_stop_the_run(config: HarnessConfig) {
    let spec = config.find_suite("os").unwrap().clone();
    let table = oracle_table(&spec, &config);
    let parser = parser_fn(|input: &str| {
        if input.contains("Android") {
            anyhow::bail!("no rule matched");
        }
        Ok(table.get(input).cloned().unwrap_or_default())
    });

    let err = run_suite(&spec, &config, &parser).await.unwrap_err();
    let HarnessError::Failed(failure) = err else {
        panic!("expected aggregate failure");
    };
    let report = failure.into_report();
    assert_eq!(report.attempted(), 4);
    assert_eq!(report.passed(), 3);
    assert!(report.failures()[0].message.starts_with("parser error: no rule matched"));
}

#[rstest]
#[case("ua", 7, 1)]
#[case("os", 4, 0)]
#[case("device", 4, 0)]
#[case("additional_os", 3, 0)]
#[case("firefox_ua", 3, 0)]
#[case("pgts_browsers", 4, 1)]
fn test_inventory_of_bundled_fixtures(
    config: HarnessConfig,
    #[case] name: &str,
    #[case] records: usize,
    #[case] skipped: usize,
) {
    let spec = config.find_suite(name).unwrap();
    let inventory = inspect_suite(spec, &config).unwrap();
    assert_eq!(inventory.records, records);
    assert_eq!(inventory.skipped, skipped);
    assert_eq!(inventory.attempted, records - skipped);
}
