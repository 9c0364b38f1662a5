//! Core types for circuit representation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle label for the first operand of a two-input gate.
pub const HANDLE_A: &str = "a";
/// Handle label for the second operand of a two-input gate.
pub const HANDLE_B: &str = "b";
/// Handle label for the single operand of a NOT gate.
pub const HANDLE_INPUT: &str = "input";
/// Handle label every node uses for its outgoing signal.
pub const HANDLE_OUTPUT: &str = "output";

/// Index of a node within the node slice handed to the evaluator.
///
/// Node identity on the wire is the string id; `NodeId` only exists while a
/// [`CircuitGraph`](super::CircuitGraph) is borrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// The kind tag of a node.
///
/// Serialized as the React-Flow `type` string. Tags outside the known set are
/// kept in [`NodeKind::Other`] so they survive a load/evaluate/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    InputSource,
    OutputSink,
    AndGate,
    OrGate,
    NotGate,
    Other(String),
    /// No `type` tag at all; the editor draws these as its default node
    Untyped,
}

impl NodeKind {
    /// The wire tag for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::InputSource => "inputSource",
            NodeKind::OutputSink => "outputSink",
            NodeKind::AndGate => "andGate",
            NodeKind::OrGate => "orGate",
            NodeKind::NotGate => "notGate",
            NodeKind::Other(tag) => tag,
            NodeKind::Untyped => "default",
        }
    }

    /// Whether the node carried no `type` tag.
    pub fn is_untyped(&self) -> bool {
        matches!(self, NodeKind::Untyped)
    }

    /// The gate operation for gate kinds, `None` otherwise.
    pub fn gate(&self) -> Option<GateKind> {
        match self {
            NodeKind::AndGate => Some(GateKind::And),
            NodeKind::OrGate => Some(GateKind::Or),
            NodeKind::NotGate => Some(GateKind::Not),
            _ => None,
        }
    }

    /// Whether the evaluator knows this kind.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, NodeKind::Other(_) | NodeKind::Untyped)
    }

    /// Input handles accepted by this kind.
    pub fn input_handles(&self) -> &'static [&'static str] {
        match self {
            NodeKind::AndGate | NodeKind::OrGate => &[HANDLE_A, HANDLE_B],
            NodeKind::NotGate | NodeKind::OutputSink => &[HANDLE_INPUT],
            _ => &[],
        }
    }

    /// Human-readable name used as the default label of new nodes.
    pub fn display_name(&self) -> &str {
        match self {
            NodeKind::InputSource => "Input Source",
            NodeKind::OutputSink => "Output Sink",
            NodeKind::AndGate => "AND Gate",
            NodeKind::OrGate => "OR Gate",
            NodeKind::NotGate => "NOT Gate",
            NodeKind::Other(_) | NodeKind::Untyped => "Unknown",
        }
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "inputSource" => NodeKind::InputSource,
            "outputSink" => NodeKind::OutputSink,
            "andGate" => NodeKind::AndGate,
            "orGate" => NodeKind::OrGate,
            "notGate" => NodeKind::NotGate,
            _ => NodeKind::Other(tag),
        }
    }
}

impl From<&str> for NodeKind {
    fn from(tag: &str) -> Self {
        NodeKind::from(tag.to_string())
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A boolean gate operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    And,
    Or,
    Not,
}

impl GateKind {
    /// Apply the gate to its operands. `Not` ignores `b`.
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            GateKind::And => a && b,
            GateKind::Or => a || b,
            GateKind::Not => !a,
        }
    }
}

/// Canvas position of a node. Opaque to the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_round_trip() {
        for tag in ["inputSource", "outputSink", "andGate", "orGate", "notGate"] {
            let kind = NodeKind::from(tag);
            assert!(kind.is_recognized());
            assert_eq!(String::from(kind), tag);
        }
    }

    #[test]
    fn test_unknown_kind_keeps_tag() {
        let kind = NodeKind::from("xorGate");
        assert_eq!(kind, NodeKind::Other("xorGate".to_string()));
        assert!(!kind.is_recognized());
        assert_eq!(kind.gate(), None);
        assert_eq!(kind.to_string(), "xorGate");
    }

    #[test]
    fn test_gate_truth_tables() {
        let cases = [(false, false), (true, false), (false, true), (true, true)];
        let and: Vec<bool> = cases.iter().map(|&(a, b)| GateKind::And.apply(a, b)).collect();
        let or: Vec<bool> = cases.iter().map(|&(a, b)| GateKind::Or.apply(a, b)).collect();
        assert_eq!(and, vec![false, false, false, true]);
        assert_eq!(or, vec![false, true, true, true]);
        assert!(GateKind::Not.apply(false, true));
        assert!(!GateKind::Not.apply(true, false));
    }

    #[test]
    fn test_input_handles() {
        assert_eq!(NodeKind::AndGate.input_handles(), &["a", "b"]);
        assert_eq!(NodeKind::NotGate.input_handles(), &["input"]);
        assert_eq!(NodeKind::OutputSink.input_handles(), &["input"]);
        assert!(NodeKind::InputSource.input_handles().is_empty());
    }
}
