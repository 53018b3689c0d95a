//! Harness configuration.
//!
//! Settings come from an optional file (TOML, YAML or JSON, chosen by
//! extension) overlaid with `UAP_CONFORMANCE_*` environment variables, and
//! are validated before use. Every field has a default, so an empty source
//! yields the stock harness over the builtin suite catalog.

use crate::cases::{SkipPolicy, JS_UA_MARKER};
use crate::errors::Result;
use crate::fixtures::DEFAULT_COLLECTION_KEY;
use crate::runner::RunOptions;
use crate::suites::{builtin_suites, SuiteSpec};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, trace};
use validator::{Validate, ValidationError};

/// Prefix of environment variables read by [`HarnessConfig::load`].
pub const ENV_PREFIX: &str = "UAP_CONFORMANCE";

/// Default location of fixture files, relative to the working directory.
pub const DEFAULT_FIXTURES_DIR: &str = "tests/fixtures";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_suites"))]
pub struct HarnessConfig {
    pub fixtures_dir: PathBuf,
    #[validate(length(min = 1, message = "collection_key must not be empty"))]
    pub collection_key: String,
    pub skip_markers: Vec<String>,
    #[validate(range(min = 1, message = "concurrency must be at least 1"))]
    pub concurrency: usize,
    pub case_timeout_ms: Option<u64>,
    pub suites: Vec<SuiteSpec>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: PathBuf::from(DEFAULT_FIXTURES_DIR),
            collection_key: DEFAULT_COLLECTION_KEY.to_string(),
            skip_markers: vec![JS_UA_MARKER.to_string()],
            concurrency: 1,
            case_timeout_ms: None,
            suites: builtin_suites(),
        }
    }
}

fn validate_suites(config: &HarnessConfig) -> std::result::Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for suite in &config.suites {
        if !suite.kind.is_known() {
            let mut err = ValidationError::new("unknown_kind");
            err.message = Some(
                format!("suite '{}' has unknown case kind '{}'", suite.name, suite.kind).into(),
            );
            return Err(err);
        }
        if !seen.insert(suite.name.as_str()) {
            let mut err = ValidationError::new("duplicate_suite");
            err.message = Some(format!("duplicate suite name '{}'", suite.name).into());
            return Err(err);
        }
    }
    Ok(())
}

impl HarnessConfig {
    /// Load from `path` (if given) and the process environment, then validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`HarnessConfig::load`], reading variables from `env` instead of
    /// the process environment when it is `Some`.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!("Loading config from: {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("skip_markers")
                .source(env),
        );

        let config: HarnessConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        trace!("{:?}", config);
        Ok(config)
    }

    pub fn skip_policy(&self) -> SkipPolicy {
        SkipPolicy::with_markers(self.skip_markers.iter().cloned())
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            concurrency: self.concurrency,
            case_timeout: self.case_timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn find_suite(&self, name: &str) -> Option<&SuiteSpec> {
        self.suites.iter().find(|suite| suite.name == name)
    }
}
