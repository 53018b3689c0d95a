//! Test cases and the factories that build them from fixture records.
//!
//! A [`CaseFactory`] turns one [`FixtureRecord`] into one typed
//! [`TestCase`]. Before the factory is consulted, the [`SkipPolicy`] decides
//! whether the record belongs to this parser at all; skipped records keep
//! an empty slot in the resulting [`CaseSet`] so document positions survive.

use crate::errors::{HarnessError, Result};
use crate::fixtures::FixtureRecord;
use tracing::{debug, trace};

mod device;
mod os;
mod user_agent;

pub use device::DeviceCase;
pub use os::OsCase;
pub use user_agent::UserAgentCase;

/// Marker field carried by fixtures that only apply to the JavaScript parser.
pub const JS_UA_MARKER: &str = "js_ua";

/// The executable form of one fixture.
pub trait TestCase {
    /// Result type produced by the parser under test
    type Parsed;

    /// The literal input to feed the parser.
    fn input(&self) -> &str;

    /// Compare a parsed result against this fixture's expectations.
    ///
    /// Returns an error describing the mismatch; never mutates the case.
    fn verify(&self, parsed: &Self::Parsed) -> anyhow::Result<()>;
}

/// Builds one test case from one fixture record.
///
/// Any `Fn(&FixtureRecord) -> anyhow::Result<T>` is a factory, so a
/// constructor like [`UserAgentCase::from_record`] can be passed directly.
pub trait CaseFactory {
    type Case: TestCase;

    fn build(&self, record: &FixtureRecord) -> anyhow::Result<Self::Case>;
}

impl<F, T> CaseFactory for F
where
    F: Fn(&FixtureRecord) -> anyhow::Result<T>,
    T: TestCase,
{
    type Case = T;

    fn build(&self, record: &FixtureRecord) -> anyhow::Result<T> {
        self(record)
    }
}

/// Decides which records are out of scope for the parser under test.
///
/// A record is skipped when it carries any of the marker fields, whatever
/// the field's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipPolicy {
    markers: Vec<String>,
}

impl Default for SkipPolicy {
    fn default() -> Self {
        Self::with_markers([JS_UA_MARKER])
    }
}

impl SkipPolicy {
    /// A policy that never skips.
    pub fn none() -> Self {
        Self {
            markers: Vec::new(),
        }
    }

    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    pub fn should_skip(&self, record: &FixtureRecord) -> bool {
        self.markers.iter().any(|marker| record.contains_key(marker))
    }
}

/// Test cases in document order, with skipped records left as empty slots.
#[derive(Debug, Clone)]
pub struct CaseSet<T> {
    collection: String,
    slots: Vec<Option<T>>,
}

impl<T: TestCase> CaseSet<T> {
    /// Apply the skip policy and factory to every record.
    ///
    /// A factory error aborts construction of the whole set.
    pub fn build<F>(
        records: &[FixtureRecord],
        collection: &str,
        policy: &SkipPolicy,
        factory: &F,
    ) -> Result<Self>
    where
        F: CaseFactory<Case = T> + ?Sized,
    {
        let mut slots = Vec::with_capacity(records.len());
        for (offset, record) in records.iter().enumerate() {
            let position = offset + 1;
            if policy.should_skip(record) {
                trace!("Skipping fixture {} of '{}'", position, collection);
                slots.push(None);
                continue;
            }
            let case = factory
                .build(record)
                .map_err(|source| HarnessError::Construction { position, source })?;
            slots.push(Some(case));
        }

        let set = Self {
            collection: collection.to_string(),
            slots,
        };
        debug!(
            "Built {} cases from '{}' ({} skipped)",
            set.attempted(),
            set.collection,
            set.skipped()
        );
        Ok(set)
    }
}

impl<T> CaseSet<T> {
    /// Build directly from slots; `None` marks a skipped record.
    pub fn from_slots(collection: impl Into<String>, slots: Vec<Option<T>>) -> Self {
        Self {
            collection: collection.into(),
            slots,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Number of records the set was built from.
    pub fn records(&self) -> usize {
        self.slots.len()
    }

    /// Number of cases that will be attempted.
    pub fn attempted(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn skipped(&self) -> usize {
        self.records() - self.attempted()
    }

    pub fn is_empty(&self) -> bool {
        self.attempted() == 0
    }

    /// Present cases in document order with their 1-based document position.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(offset, slot)| slot.as_ref().map(|case| (offset + 1, case)))
    }
}

/// Collects field mismatches for one case so they can be reported together.
#[derive(Debug)]
pub(crate) struct FieldCheck<'a> {
    input: &'a str,
    mismatches: Vec<String>,
}

impl<'a> FieldCheck<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            mismatches: Vec::new(),
        }
    }

    pub(crate) fn field(&mut self, name: &str, expected: Option<&str>, actual: Option<&str>) {
        if expected != actual {
            self.mismatches.push(format!(
                "{name} - expected {} but got {}",
                quoted(expected),
                quoted(actual)
            ));
        }
    }

    pub(crate) fn finish(self) -> anyhow::Result<()> {
        if self.mismatches.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("{} (UA: {})", self.mismatches.join("; "), self.input)
        }
    }
}

fn quoted(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("'{v}'"),
        None => "<none>".to_string(),
    }
}
