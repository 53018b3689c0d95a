//! Unit tests for command functions

use super::*;
use crate::suites::{builtin_suites, CaseKind};
use rstest::*;
use tempfile::TempDir;

#[fixture]
fn fixtures_dir() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp directory");
    std::fs::write(
        dir.path().join("test_ua.yaml"),
        "test_cases:\n  - user_agent_string: 'Mozilla/5.0 Firefox/3.5'\n    family: 'Firefox'\n    major: '3'\n    minor: '5'\n    patch:\n",
    )
    .expect("Failed to write fixture");
    std::fs::write(dir.path().join("broken.yaml"), "other_cases: []\n")
        .expect("Failed to write fixture");
    dir
}

fn config_for(dir: &TempDir) -> HarnessConfig {
    HarnessConfig {
        fixtures_dir: dir.path().to_path_buf(),
        suites: vec![
            SuiteSpec::new("ua", "test_ua.yaml", CaseKind::UserAgent),
            SuiteSpec::new("broken", "broken.yaml", CaseKind::UserAgent),
        ],
        ..Default::default()
    }
}

#[test]
fn test_suites_table_lists_every_suite() {
    let config = HarnessConfig::default();
    let rendered = suites_table(&config).to_string();
    assert_eq!(rendered.lines().count(), builtin_suites().len() + 1);
    assert!(rendered.contains("pgts_browser_list.yaml"));
    assert!(rendered.contains("user_agent"));
}

#[test]
fn test_select_all_when_no_names() {
    let config = HarnessConfig::default();
    assert_eq!(select_suites(&config, &[]).unwrap().len(), 6);
}

#[test]
fn test_select_unknown_suite() {
    let config = HarnessConfig::default();
    let err = select_suites(&config, &["nope".to_string()]).unwrap_err();
    assert!(err.to_string().contains("unknown suite 'nope'"));
}

#[rstest]
fn test_check_passing_suite(fixtures_dir: TempDir) {
    let config = config_for(&fixtures_dir);
    let summary = check_command(&config, &["ua".to_string()]).unwrap();
    assert_eq!(summary.checked, 1);
    assert!(summary.is_ok());
}

#[rstest]
fn test_check_reports_failing_suites(fixtures_dir: TempDir) {
    let config = config_for(&fixtures_dir);
    let summary = check_command(&config, &[]).unwrap();
    assert_eq!(summary.checked, 2);
    assert_eq!(summary.failed, vec!["broken".to_string()]);
}
