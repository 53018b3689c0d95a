use super::{DocumentFormat, DocumentNode, NodeView};
use crate::errors::{HarnessError, Result};
use serde_json::Value;
use std::borrow::Cow;

/// JSON fixture documents, parsed with `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl DocumentFormat for Json {
    type Node = Value;

    const NAME: &'static str = "json";

    fn parse(text: &str) -> Result<Value> {
        serde_json::from_str(text).map_err(|e| HarnessError::load(format!("invalid JSON: {e}")))
    }
}

impl DocumentNode for Value {
    fn view(&self) -> NodeView<'_, Self> {
        match self {
            Value::Null => NodeView::Null,
            Value::Bool(b) => NodeView::Scalar(Cow::Owned(b.to_string())),
            Value::Number(n) => NodeView::Scalar(Cow::Owned(n.to_string())),
            Value::String(s) => NodeView::Scalar(Cow::Borrowed(s.as_str())),
            Value::Array(items) => NodeView::Sequence(items.iter().collect()),
            Value::Object(map) => NodeView::Mapping(
                map.iter()
                    .map(|(k, v)| (Some(Cow::Borrowed(k.as_str())), v))
                    .collect(),
            ),
        }
    }
}
