//! Named fixture suites and the case kind each one exercises.

use crate::cases::{CaseSet, DeviceCase, OsCase, UserAgentCase};
use crate::client_info::ClientInfo;
use crate::configuration::HarnessConfig;
use crate::document::Yaml;
use crate::errors::{HarnessError, Result};
use crate::harness::{Harness, RunSummary};
use crate::runner::Parser;
use serde::{Deserialize, Serialize};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which part of [`ClientInfo`] a suite's fixtures describe.
#[derive(Serialize_enum_str, Deserialize_enum_str, Debug, Clone, Eq, PartialEq, Hash)]
pub enum CaseKind {
    #[serde(rename = "user_agent")]
    UserAgent,
    #[serde(rename = "os")]
    Os,
    #[serde(rename = "device")]
    Device,
    #[serde(other)]
    Unknown(String),
}

impl CaseKind {
    pub fn is_known(&self) -> bool {
        !matches!(self, CaseKind::Unknown(_))
    }
}

/// One fixture file and how to read it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SuiteSpec {
    pub name: String,
    /// File name, relative to the fixtures directory
    pub file: PathBuf,
    pub kind: CaseKind,
}

impl SuiteSpec {
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>, kind: CaseKind) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            kind,
        }
    }

    pub fn path_in(&self, fixtures_dir: &Path) -> PathBuf {
        fixtures_dir.join(&self.file)
    }

    /// Read this suite's fixture text from `fixtures_dir`.
    pub fn read_fixture(&self, fixtures_dir: &Path) -> Result<String> {
        let path = self.path_in(fixtures_dir);
        debug!("Reading suite '{}' from {}", self.name, path.display());
        std::fs::read_to_string(&path)
            .map_err(|err| HarnessError::load_field(path.display().to_string(), err.to_string()))
    }
}

/// The upstream user-agent fixture files.
pub fn builtin_suites() -> Vec<SuiteSpec> {
    vec![
        SuiteSpec::new("ua", "test_ua.yaml", CaseKind::UserAgent),
        SuiteSpec::new("os", "test_os.yaml", CaseKind::Os),
        SuiteSpec::new("device", "test_device.yaml", CaseKind::Device),
        SuiteSpec::new("additional_os", "additional_os_tests.yaml", CaseKind::Os),
        SuiteSpec::new(
            "firefox_ua",
            "firefox_user_agent_strings.yaml",
            CaseKind::UserAgent,
        ),
        SuiteSpec::new("pgts_browsers", "pgts_browser_list.yaml", CaseKind::UserAgent),
    ]
}

/// Record counts of a suite whose cases were built but not executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteInventory {
    pub records: usize,
    pub attempted: usize,
    pub skipped: usize,
}

impl<T> From<&CaseSet<T>> for SuiteInventory {
    fn from(cases: &CaseSet<T>) -> Self {
        Self {
            records: cases.records(),
            attempted: cases.attempted(),
            skipped: cases.skipped(),
        }
    }
}

fn unknown_kind(spec: &SuiteSpec, kind: &str) -> HarnessError {
    HarnessError::Config(anyhow::anyhow!(
        "suite '{}' has unknown case kind '{}'",
        spec.name,
        kind
    ))
}

/// Load a suite and build its cases without running them.
pub fn inspect_suite(spec: &SuiteSpec, config: &HarnessConfig) -> Result<SuiteInventory> {
    let text = spec.read_fixture(&config.fixtures_dir)?;
    let harness = Harness::from_config(config);
    let key = config.collection_key.as_str();

    let inventory = match &spec.kind {
        CaseKind::UserAgent => {
            SuiteInventory::from(&harness.load_cases::<Yaml, _>(&text, key, &UserAgentCase::from_record)?)
        }
        CaseKind::Os => {
            SuiteInventory::from(&harness.load_cases::<Yaml, _>(&text, key, &OsCase::from_record)?)
        }
        CaseKind::Device => {
            SuiteInventory::from(&harness.load_cases::<Yaml, _>(&text, key, &DeviceCase::from_record)?)
        }
        CaseKind::Unknown(kind) => return Err(unknown_kind(spec, kind)),
    };
    Ok(inventory)
}

/// Run a suite against a user-agent parser.
pub async fn run_suite<P>(spec: &SuiteSpec, config: &HarnessConfig, parser: &P) -> Result<RunSummary>
where
    P: Parser<Output = ClientInfo>,
{
    let text = spec.read_fixture(&config.fixtures_dir)?;
    let harness = Harness::from_config(config);
    let key = config.collection_key.as_str();

    match &spec.kind {
        CaseKind::UserAgent => {
            harness
                .run::<Yaml, _, _>(&text, key, &UserAgentCase::from_record, parser)
                .await
        }
        CaseKind::Os => {
            harness
                .run::<Yaml, _, _>(&text, key, &OsCase::from_record, parser)
                .await
        }
        CaseKind::Device => {
            harness
                .run::<Yaml, _, _>(&text, key, &DeviceCase::from_record, parser)
                .await
        }
        CaseKind::Unknown(kind) => Err(unknown_kind(spec, kind)),
    }
}
