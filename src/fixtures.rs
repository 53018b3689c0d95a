//! Fixture extraction: fixture text → ordered list of [`FixtureRecord`]s.

use crate::document::{DocumentFormat, DocumentNode, NodeView};
use crate::errors::{HarnessError, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

/// Collection key used by the upstream fixture files.
pub const DEFAULT_COLLECTION_KEY: &str = "test_cases";

/// One fixture: field name → field value, both as text.
///
/// The harness imposes no schema; the case factory interprets the fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureRecord {
    fields: HashMap<String, String>,
}

impl FixtureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any previous value.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// A field that must be present.
    pub fn require(&self, key: &str) -> anyhow::Result<&str> {
        self.get(key)
            .ok_or_else(|| anyhow::anyhow!("missing required field '{key}'"))
    }

    /// A field that may be absent; an empty value counts as absent.
    pub fn optional(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for FixtureRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parse fixture text and extract the records of the named collection.
pub fn extract_records<D: DocumentFormat>(
    text: &str,
    collection_key: &str,
) -> Result<Vec<FixtureRecord>> {
    let root = D::parse(text)?;
    debug!("Parsed {} fixture document", D::NAME);
    records_from_node(&root, collection_key)
}

/// Extract the records of the named collection from an already parsed root.
pub fn records_from_node<N: DocumentNode>(
    root: &N,
    collection_key: &str,
) -> Result<Vec<FixtureRecord>> {
    let entries = match root.view() {
        NodeView::Mapping(entries) => entries,
        other => {
            return Err(HarnessError::load(format!(
                "document root is a {}, expected a mapping",
                other.kind()
            )))
        }
    };

    let mut top_level: HashMap<String, &N> = HashMap::with_capacity(entries.len());
    for (key, node) in entries {
        let key = key.ok_or_else(|| HarnessError::load("top-level key is not a scalar"))?;
        match top_level.entry(key.into_owned()) {
            Entry::Occupied(slot) => {
                return Err(HarnessError::load(format!(
                    "duplicate top-level key '{}'",
                    slot.key()
                )))
            }
            Entry::Vacant(slot) => {
                slot.insert(node);
            }
        }
    }

    let collection = top_level
        .get(collection_key)
        .ok_or_else(|| HarnessError::MissingCollection {
            key: collection_key.to_string(),
        })?;

    let items = match collection.view() {
        NodeView::Sequence(items) => items,
        other => {
            return Err(HarnessError::load(format!(
                "collection '{collection_key}' is a {}, expected a sequence",
                other.kind()
            )))
        }
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(offset, item)| record_from_node(item, collection_key, offset + 1))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Extracted {} records from collection '{}'",
        records.len(),
        collection_key
    );
    Ok(records)
}

fn record_from_node<N: DocumentNode>(
    node: &N,
    collection_key: &str,
    position: usize,
) -> Result<FixtureRecord> {
    let NodeView::Mapping(entries) = node.view() else {
        return Err(HarnessError::NotAMapping {
            key: collection_key.to_string(),
            position,
        });
    };

    let mut fields = HashMap::with_capacity(entries.len());
    for (key, value) in entries {
        let key = key.ok_or_else(|| {
            HarnessError::load(format!("fixture {position} has a non-scalar field name"))
        })?;
        let value = match value.view() {
            NodeView::Scalar(text) => text.into_owned(),
            NodeView::Null => String::new(),
            other => {
                return Err(HarnessError::load_field(
                    &*key,
                    format!("fixture {position} holds a {}, expected a scalar", other.kind()),
                ))
            }
        };
        if fields.insert(key.into_owned(), value).is_some() {
            return Err(HarnessError::load(format!(
                "fixture {position} repeats a field name"
            )));
        }
    }

    Ok(FixtureRecord { fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Json, Yaml};

    const FIXTURE: &str = r#"
user_agent_parsers:
  - regex: 'foo'
test_cases:
  - user_agent_string: 'Mozilla/5.0 A'
    family: 'Firefox'
    major: '3'
    minor:
  - user_agent_string: 'Mozilla/5.0 B'
    family: 'Other'
    js_ua: "{'js_user_agent_string': 'x'}"
  - user_agent_string: 'Mozilla/5.0 C'
    family: 'Chrome'
    major: 12
"#;

    #[test]
    fn test_extracts_in_document_order() {
        let records = extract_records::<Yaml>(FIXTURE, DEFAULT_COLLECTION_KEY).unwrap();
        let inputs: Vec<&str> = records
            .iter()
            .map(|r| r.get("user_agent_string").unwrap())
            .collect();
        assert_eq!(inputs, vec!["Mozilla/5.0 A", "Mozilla/5.0 B", "Mozilla/5.0 C"]);
    }

    #[test]
    fn test_scalars_are_stringified() {
        let records = extract_records::<Yaml>(FIXTURE, DEFAULT_COLLECTION_KEY).unwrap();
        assert_eq!(records[0].get("minor"), Some(""));
        assert_eq!(records[0].optional("minor"), None);
        assert_eq!(records[2].get("major"), Some("12"));
        assert!(records[1].contains_key("js_ua"));
    }

    #[test]
    fn test_unquoted_versions_keep_fixture_text() {
        let text = "test_cases:\n  - {user_agent_string: A, family: F, minor: 1.10, major: 0x1F, patch: 1e3, model: 007}\n";
        let records = extract_records::<Yaml>(text, DEFAULT_COLLECTION_KEY).unwrap();
        assert_eq!(records[0].get("minor"), Some("1.10"));
        assert_eq!(records[0].get("major"), Some("0x1F"));
        assert_eq!(records[0].get("patch"), Some("1e3"));
        assert_eq!(records[0].get("model"), Some("007"));
    }

    #[test]
    fn test_repeated_keys_are_load_errors() {
        let err = extract_records::<Yaml>("test_cases: []\ntest_cases: []\n", DEFAULT_COLLECTION_KEY)
            .unwrap_err();
        assert!(err.to_string().contains("duplicate top-level key 'test_cases'"));

        let text = "test_cases:\n  - family: A\n    family: B\n";
        let err = extract_records::<Yaml>(text, DEFAULT_COLLECTION_KEY).unwrap_err();
        assert!(err.to_string().contains("fixture 1 repeats a field name"));
    }

    #[test]
    fn test_missing_collection_is_fatal() {
        let err = extract_records::<Yaml>(FIXTURE, "device_cases").unwrap_err();
        assert!(matches!(err, HarnessError::MissingCollection { ref key } if key == "device_cases"));
    }

    #[test]
    fn test_root_must_be_a_mapping() {
        let err = extract_records::<Yaml>("- a\n- b\n", DEFAULT_COLLECTION_KEY).unwrap_err();
        assert!(err.is_load_error());
        assert!(err.to_string().contains("expected a mapping"));
    }

    #[test]
    fn test_collection_must_be_a_sequence() {
        let err = extract_records::<Yaml>("test_cases: nope\n", DEFAULT_COLLECTION_KEY).unwrap_err();
        assert!(err.to_string().contains("expected a sequence"));
    }

    #[test]
    fn test_entries_must_be_mappings() {
        let text = "test_cases:\n  - family: Other\n  - just a string\n";
        let err = extract_records::<Yaml>(text, DEFAULT_COLLECTION_KEY).unwrap_err();
        assert!(matches!(err, HarnessError::NotAMapping { position: 2, .. }));
    }

    #[test]
    fn test_nested_values_are_rejected() {
        let text = "test_cases:\n  - family: [a, b]\n";
        let err = extract_records::<Yaml>(text, DEFAULT_COLLECTION_KEY).unwrap_err();
        assert!(err.is_load_error());
        assert!(err.to_string().contains("family"));
    }

    #[test]
    fn test_empty_collection_extracts_nothing() {
        let records = extract_records::<Yaml>("test_cases: []\n", DEFAULT_COLLECTION_KEY).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_json_documents() {
        let text = r#"{"test_cases": [{"user_agent_string": "X", "family": "Other", "major": null}]}"#;
        let records = extract_records::<Json>(text, DEFAULT_COLLECTION_KEY).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].require("family").unwrap(), "Other");
        assert_eq!(records[0].get("major"), Some(""));
    }

    #[test]
    fn test_require_reports_field_name() {
        let record: FixtureRecord = [("family", "Other")].into_iter().collect();
        let err = record.require("user_agent_string").unwrap_err();
        assert!(err.to_string().contains("user_agent_string"));
    }
}
