//! Structured-data documents consumed by the fixture extractor.
//!
//! The harness never depends on a particular tree library. It only needs to
//! look up entries of a mapping by scalar key, walk a sequence in order, and
//! read a scalar as text. [`DocumentNode`] captures exactly that, and
//! [`DocumentFormat`] turns fixture text into a root node.

use crate::errors::Result;
use std::borrow::Cow;

mod json;
mod yaml;

pub use json::Json;
pub use yaml::{Yaml, YamlNode};

/// A shallow view of one node of a fixture document.
#[derive(Debug)]
pub enum NodeView<'a, N> {
    /// Mapping entries in backend order. A key is `None` when it is not a scalar.
    Mapping(Vec<(Option<Cow<'a, str>>, &'a N)>),
    /// Sequence items in source order
    Sequence(Vec<&'a N>),
    /// Any scalar rendered as text
    Scalar(Cow<'a, str>),
    /// An explicit or implicit null
    Null,
}

impl<N> NodeView<'_, N> {
    /// Short name of the node kind for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            NodeView::Mapping(_) => "mapping",
            NodeView::Sequence(_) => "sequence",
            NodeView::Scalar(_) => "scalar",
            NodeView::Null => "null",
        }
    }
}

/// Minimal node capability needed to extract fixtures.
pub trait DocumentNode: Sized {
    fn view(&self) -> NodeView<'_, Self>;
}

/// A text format that can be parsed into a tree of [`DocumentNode`]s.
pub trait DocumentFormat {
    type Node: DocumentNode;

    /// Display name used in logs and errors
    const NAME: &'static str;

    /// Parse fixture text into its root node.
    fn parse(text: &str) -> Result<Self::Node>;
}
