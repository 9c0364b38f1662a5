//! Editing session.
//!
//! [`CircuitSession`] owns the node and edge lists the editor displays. Every
//! mutation (palette drop, connect, delete, input toggle, label edit, load)
//! re-runs the evaluator and replaces the node list with its result.
//!
//! The input toggle is a capability of the session ([`CircuitSession::set_input`]),
//! never a field of node data, so documents stay plain data.

use log::{debug, trace};

use crate::circuit::{Edge, Node, NodeKind, Position};
use crate::document::{CircuitDocument, Viewport};
use crate::error::{GateflowError, Result};
use crate::solver::{Evaluator, EvaluatorConfig};

/// A request to connect two nodes, as the editor reports it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Connection {
    pub source: String,
    pub target: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn with_source_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }

    pub fn with_target_handle(mut self, handle: impl Into<String>) -> Self {
        self.target_handle = Some(handle.into());
        self
    }

    /// Editor-style edge id: `xy-edge__<source><sourceHandle>-<target><targetHandle>`.
    pub fn edge_id(&self) -> String {
        format!(
            "xy-edge__{}{}-{}{}",
            self.source,
            self.source_handle.as_deref().unwrap_or(""),
            self.target,
            self.target_handle.as_deref().unwrap_or("")
        )
    }

    fn matches(&self, edge: &Edge) -> bool {
        edge.source == self.source
            && edge.target == self.target
            && edge.source_handle == self.source_handle
            && edge.target_handle == self.target_handle
    }

    fn into_edge(self) -> Edge {
        let id = self.edge_id();
        Edge {
            id: Some(id),
            source: self.source,
            target: self.target,
            source_handle: self.source_handle,
            target_handle: self.target_handle,
            extra: Default::default(),
        }
    }
}

/// Outcome of the most recent evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaluationSummary {
    pub rounds: usize,
    pub settled: bool,
}

/// The editor's live circuit.
#[derive(Debug, Clone)]
pub struct CircuitSession {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    viewport: Option<Viewport>,
    evaluator: Evaluator,
    next_node: u64,
    last: EvaluationSummary,
}

impl Default for CircuitSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitSession {
    /// An empty session with the default evaluator configuration.
    pub fn new() -> Self {
        Self::with_config(EvaluatorConfig::default())
    }

    /// An empty session with a custom evaluator configuration.
    pub fn with_config(config: EvaluatorConfig) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            viewport: None,
            evaluator: Evaluator::with_config(config),
            next_node: 1,
            last: EvaluationSummary {
                rounds: 0,
                settled: true,
            },
        }
    }

    /// Load a saved document and evaluate it.
    pub fn from_document(document: CircuitDocument) -> Self {
        let mut session = Self::new();
        session.load(document);
        session
    }

    /// Replace the whole circuit with a saved document and evaluate it.
    pub fn load(&mut self, document: CircuitDocument) {
        debug!(
            "Loading circuit with {} nodes and {} edges",
            document.nodes.len(),
            document.edges.len()
        );
        self.nodes = document.nodes;
        self.edges = document.edges;
        self.viewport = document.viewport;
        self.reevaluate();
    }

    /// Snapshot the circuit as a saveable document.
    pub fn to_document(&self) -> CircuitDocument {
        CircuitDocument {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            viewport: self.viewport,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    /// Evaluator configuration used after every mutation.
    pub fn config(&self) -> &EvaluatorConfig {
        self.evaluator.config()
    }

    /// Rounds and convergence of the most recent evaluation.
    pub fn last_evaluation(&self) -> EvaluationSummary {
        self.last
    }

    /// Drop a new node from the palette. Returns its id.
    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> String {
        let id = self.fresh_id(&kind);
        trace!("Adding {} node '{}'", kind, id);
        self.nodes.push(Node::with_defaults(id.clone(), kind, position));
        self.reevaluate();
        id
    }

    /// Connect two nodes. Returns the new edge id, or `None` when an identical
    /// connection already exists.
    pub fn connect(&mut self, connection: Connection) -> Option<String> {
        if self.edges.iter().any(|e| connection.matches(e)) {
            trace!("Ignoring duplicate connection {}", connection.edge_id());
            return None;
        }
        let edge = connection.into_edge();
        let id = edge.id.clone();
        self.edges.push(edge);
        self.reevaluate();
        id
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<()> {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        if self.nodes.len() == before {
            return Err(GateflowError::node_not_found(id));
        }
        self.edges.retain(|e| e.source != id && e.target != id);
        self.reevaluate();
        Ok(())
    }

    /// Remove an edge by id. Returns whether it existed.
    pub fn remove_edge(&mut self, id: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id.as_deref() != Some(id));
        let removed = self.edges.len() != before;
        if removed {
            self.reevaluate();
        }
        removed
    }

    /// Toggle an input source to the given level.
    pub fn set_input(&mut self, id: &str, value: bool) -> Result<()> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| GateflowError::node_not_found(id))?;
        if node.kind != NodeKind::InputSource {
            return Err(GateflowError::NotAnInput {
                node: id.to_string(),
            });
        }
        node.data.set_value(value);
        self.reevaluate();
        Ok(())
    }

    /// Change the label of a node.
    pub fn set_label(&mut self, id: &str, label: impl Into<String>) -> Result<()> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| GateflowError::node_not_found(id))?;
        node.data.set_label(label);
        self.reevaluate();
        Ok(())
    }

    fn fresh_id(&mut self, kind: &NodeKind) -> String {
        loop {
            let id = format!("dndnode_{}_{}", kind, self.next_node);
            self.next_node += 1;
            if self.node(&id).is_none() {
                return id;
            }
        }
    }

    fn reevaluate(&mut self) {
        let evaluation = self.evaluator.run(&self.nodes, &self.edges);
        self.nodes = evaluation.nodes;
        self.last = EvaluationSummary {
            rounds: evaluation.rounds,
            settled: evaluation.settled,
        };
    }
}
