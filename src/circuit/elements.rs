//! Nodes and edges as the editor stores them.
//!
//! The layout follows the React-Flow JSON written by the designer: a node is
//! `{ id, type, position, data }` and an edge is
//! `{ id, source, target, sourceHandle, targetHandle }`. Fields the evaluator
//! does not understand are carried in `extra` maps so a load/evaluate/save
//! cycle never loses editor state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::types::{NodeKind, Position};

fn default_kind() -> NodeKind {
    NodeKind::Untyped
}

/// Kind-specific payload of a node.
///
/// Which fields matter depends on the node kind:
/// - input sources read `value` (set by the user),
/// - output sinks get `value` written by the evaluator,
/// - gates get `output_value` written by the evaluator.
///
/// Payload fields are read leniently. A `label`, `value` or `outputValue` of
/// an unexpected JSON type stays in `extra` untouched, so editor nodes with
/// their own payloads (a slider's numeric `value`) load and save unchanged.
/// Writes go through the setters, which drop any such shadowed entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct NodeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<bool>,

    #[serde(rename = "outputValue", skip_serializing_if = "Option::is_none")]
    pub output_value: Option<bool>,

    /// Payload fields owned by the editor
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const LABEL: &str = "label";
const VALUE: &str = "value";
const OUTPUT_VALUE: &str = "outputValue";

/// Remove `key` from `map` when `read` accepts its value.
fn take_typed<T>(
    map: &mut Map<String, Value>,
    key: &str,
    read: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let parsed = map.get(key).and_then(read)?;
    map.remove(key);
    Some(parsed)
}

impl From<Map<String, Value>> for NodeData {
    fn from(mut extra: Map<String, Value>) -> Self {
        let label = take_typed(&mut extra, LABEL, |v| v.as_str().map(str::to_string));
        let value = take_typed(&mut extra, VALUE, Value::as_bool);
        let output_value = take_typed(&mut extra, OUTPUT_VALUE, Value::as_bool);
        Self {
            label,
            value,
            output_value,
            extra,
        }
    }
}

impl NodeData {
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.extra.remove(LABEL);
        self.label = Some(label.into());
    }

    pub fn set_value(&mut self, value: bool) {
        self.extra.remove(VALUE);
        self.value = Some(value);
    }

    pub fn set_output_value(&mut self, value: bool) {
        self.extra.remove(OUTPUT_VALUE);
        self.output_value = Some(value);
    }
}

/// A circuit node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,

    #[serde(
        rename = "type",
        default = "default_kind",
        skip_serializing_if = "NodeKind::is_untyped"
    )]
    pub kind: NodeKind,

    #[serde(default)]
    pub position: Position,

    #[serde(default)]
    pub data: NodeData,

    /// Node fields owned by the editor (`width`, `selected`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// Create a node with an empty payload at the origin.
    pub fn new(id: impl Into<String>, kind: impl Into<NodeKind>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            position: Position::default(),
            data: NodeData::default(),
            extra: Map::new(),
        }
    }

    /// Create a node the way the palette drops it: labeled with the kind's
    /// display name and every signal low.
    pub fn with_defaults(id: impl Into<String>, kind: NodeKind, position: Position) -> Self {
        let mut data = NodeData {
            label: Some(kind.display_name().to_string()),
            ..NodeData::default()
        };
        match kind {
            NodeKind::InputSource | NodeKind::OutputSink => data.value = Some(false),
            NodeKind::AndGate | NodeKind::OrGate | NodeKind::NotGate => {
                data.output_value = Some(false)
            }
            NodeKind::Other(_) | NodeKind::Untyped => {}
        }
        Self {
            id: id.into(),
            kind,
            position,
            data,
            extra: Map::new(),
        }
    }

    /// An input source with the given level.
    pub fn input(id: impl Into<String>, value: bool) -> Self {
        Self::new(id, NodeKind::InputSource).with_value(value)
    }

    /// An output sink.
    pub fn output(id: impl Into<String>) -> Self {
        Self::new(id, NodeKind::OutputSink)
    }

    pub fn with_value(mut self, value: bool) -> Self {
        self.data.set_value(value);
        self
    }

    pub fn with_output_value(mut self, value: bool) -> Self {
        self.data.set_output_value(value);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.set_label(label);
        self
    }

    /// Label if set, id otherwise.
    pub fn display_label(&self) -> &str {
        self.data.label.as_deref().unwrap_or(&self.id)
    }
}

/// A directed connection from one node's output to an input handle of another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub source: String,

    pub target: String,

    #[serde(
        default,
        rename = "sourceHandle",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_handle: Option<String>,

    #[serde(
        default,
        rename = "targetHandle",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_handle: Option<String>,

    /// Edge fields owned by the editor (`animated`, `style`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    /// An unlabeled edge from `source` to `target`.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            extra: Map::new(),
        }
    }

    /// An edge into a named input handle of `target`.
    pub fn to_handle(
        source: impl Into<String>,
        target: impl Into<String>,
        handle: impl Into<String>,
    ) -> Self {
        Self::new(source, target).with_target_handle(handle)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_target_handle(mut self, handle: impl Into<String>) -> Self {
        self.target_handle = Some(handle.into());
        self
    }

    /// The target handle, with an empty label treated as absent.
    pub fn handle(&self) -> Option<&str> {
        self.target_handle.as_deref().filter(|h| !h.is_empty())
    }
}
