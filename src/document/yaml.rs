use super::{DocumentFormat, DocumentNode, NodeView};
use crate::errors::{HarnessError, Result};
use std::borrow::Cow;
use std::collections::HashMap;
use yaml_rust2::parser::{Event, EventReceiver, Parser};
use yaml_rust2::scanner::TScalarStyle;

/// YAML fixture documents, read with the `yaml-rust2` event parser.
///
/// Scalars keep the text the fixture author wrote: `1.10` stays `1.10` and
/// `0x1F` stays `0x1F`. Only the first document of a multi-document stream
/// is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

impl DocumentFormat for Yaml {
    type Node = YamlNode;

    const NAME: &'static str = "yaml";

    fn parse(text: &str) -> Result<YamlNode> {
        let mut builder = TreeBuilder::default();
        Parser::new_from_str(text)
            .load(&mut builder, false)
            .map_err(|e| HarnessError::load(format!("invalid YAML: {e}")))?;
        builder
            .root
            .ok_or_else(|| HarnessError::load("fixture text contains no YAML document"))
    }
}

/// A YAML node whose scalars are kept as source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YamlNode {
    Null,
    Scalar(String),
    Sequence(Vec<YamlNode>),
    Mapping(Vec<(YamlNode, YamlNode)>),
}

impl YamlNode {
    fn scalar(value: String, style: TScalarStyle) -> Self {
        let is_null = matches!(style, TScalarStyle::Plain)
            && matches!(value.as_str(), "" | "~" | "null" | "Null" | "NULL");
        if is_null {
            YamlNode::Null
        } else {
            YamlNode::Scalar(value)
        }
    }
}

fn key_text(key: &YamlNode) -> Option<Cow<'_, str>> {
    match key {
        YamlNode::Scalar(text) => Some(Cow::Borrowed(text.as_str())),
        YamlNode::Null => Some(Cow::Borrowed("")),
        YamlNode::Mapping(_) | YamlNode::Sequence(_) => None,
    }
}

impl DocumentNode for YamlNode {
    fn view(&self) -> NodeView<'_, Self> {
        match self {
            YamlNode::Null => NodeView::Null,
            YamlNode::Scalar(text) => NodeView::Scalar(Cow::Borrowed(text.as_str())),
            YamlNode::Sequence(items) => NodeView::Sequence(items.iter().collect()),
            YamlNode::Mapping(entries) => {
                NodeView::Mapping(entries.iter().map(|(k, v)| (key_text(k), v)).collect())
            }
        }
    }
}

/// A container still receiving children, with its anchor id (0 when none).
enum Frame {
    Sequence(Vec<YamlNode>, usize),
    Mapping(Vec<(YamlNode, YamlNode)>, Option<YamlNode>, usize),
}

/// Builds a [`YamlNode`] tree from parser events.
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    anchors: HashMap<usize, YamlNode>,
    root: Option<YamlNode>,
}

impl TreeBuilder {
    fn finish(&mut self, node: YamlNode, anchor: usize) {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(Frame::Sequence(items, _)) => items.push(node),
            Some(Frame::Mapping(entries, pending_key, _)) => match pending_key.take() {
                Some(key) => entries.push((key, node)),
                None => *pending_key = Some(node),
            },
        }
    }
}

impl EventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event) {
        match ev {
            Event::Scalar(value, style, anchor, _) => {
                self.finish(YamlNode::scalar(value, style), anchor)
            }
            Event::Alias(anchor) => {
                let node = self.anchors.get(&anchor).cloned().unwrap_or(YamlNode::Null);
                self.finish(node, 0);
            }
            Event::SequenceStart(anchor, _) => self.stack.push(Frame::Sequence(Vec::new(), anchor)),
            Event::MappingStart(anchor, _) => {
                self.stack.push(Frame::Mapping(Vec::new(), None, anchor))
            }
            Event::SequenceEnd | Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Sequence(items, anchor)) => {
                    self.finish(YamlNode::Sequence(items), anchor)
                }
                Some(Frame::Mapping(entries, _, anchor)) => {
                    self.finish(YamlNode::Mapping(entries), anchor)
                }
                None => {}
            },
            _ => {}
        }
    }
}
