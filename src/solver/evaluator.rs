//! Main evaluator interface.

use log::{debug, trace};

use crate::circuit::{CircuitGraph, Edge, Node, NodeId, NodeKind};

use super::relax::{Relaxation, SignalCache};
use super::{DEFAULT_EXTRA_ROUNDS, DEFAULT_ROUNDS_PER_NODE};

/// Configuration for the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Rounds granted per node in the graph.
    pub rounds_per_node: usize,
    /// Rounds granted on top of the per-node budget.
    pub extra_rounds: usize,
    /// Fixed round budget, overriding the size-based one.
    pub max_rounds: Option<usize>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            rounds_per_node: DEFAULT_ROUNDS_PER_NODE,
            extra_rounds: DEFAULT_EXTRA_ROUNDS,
            max_rounds: None,
        }
    }
}

impl EvaluatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rounds granted per node.
    pub fn with_rounds_per_node(mut self, rounds_per_node: usize) -> Self {
        self.rounds_per_node = rounds_per_node;
        self
    }

    /// Set the rounds granted on top of the per-node budget.
    pub fn with_extra_rounds(mut self, extra_rounds: usize) -> Self {
        self.extra_rounds = extra_rounds;
        self
    }

    /// Use a fixed round budget regardless of graph size.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Round budget for a graph with `node_count` nodes.
    pub fn round_limit(&self, node_count: usize) -> usize {
        self.max_rounds.unwrap_or_else(|| {
            self.rounds_per_node
                .saturating_mul(node_count)
                .saturating_add(self.extra_rounds)
        })
    }
}

/// Result of one evaluator run.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The input nodes with derived fields rewritten
    pub nodes: Vec<Node>,
    /// Relaxation rounds executed
    pub rounds: usize,
    /// Whether the circuit reached a fixed point within the budget
    pub settled: bool,
}

/// Computes settled logic levels for a circuit.
///
/// The evaluator holds no state between runs; it only carries its
/// configuration. Every run seeds from the node payloads, relaxes gate outputs
/// to a fixed point (or until the round budget is spent) and writes the
/// results into a fresh copy of the nodes.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    /// Create an evaluator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator with a custom configuration.
    pub fn with_config(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate a circuit.
    ///
    /// Gates get `outputValue` from the relaxed signals, output sinks get
    /// `value` from the source of their first incoming edge (low if none).
    /// Input sources and unrecognized kinds are copied unchanged.
    pub fn run(&self, nodes: &[Node], edges: &[Edge]) -> Evaluation {
        let graph = CircuitGraph::new(nodes, edges);
        let mut cache = SignalCache::seed(&graph);

        let max_rounds = self.config.round_limit(graph.node_count());
        let outcome = Relaxation::new(max_rounds).run(&graph, &mut cache);

        if outcome.settled {
            trace!(
                "Circuit of {} nodes settled after {} round(s)",
                graph.node_count(),
                outcome.rounds
            );
        } else {
            debug!(
                "Circuit of {} nodes did not settle within {} round(s), keeping last levels",
                graph.node_count(),
                outcome.rounds
            );
        }

        let nodes = graph
            .iter()
            .map(|(id, node)| materialize(&graph, &cache, id, node))
            .collect();

        Evaluation {
            nodes,
            rounds: outcome.rounds,
            settled: outcome.settled,
        }
    }
}

fn materialize(graph: &CircuitGraph<'_>, cache: &SignalCache, id: NodeId, node: &Node) -> Node {
    let mut node = node.clone();
    match node.kind {
        NodeKind::AndGate | NodeKind::OrGate | NodeKind::NotGate => {
            node.data.set_output_value(cache.get(id));
        }
        NodeKind::OutputSink => {
            node.data.set_value(cache.read(graph.output_driver(id)));
        }
        NodeKind::InputSource | NodeKind::Other(_) | NodeKind::Untyped => {}
    }
    node
}

/// Evaluate a circuit with the default configuration.
///
/// Returns the nodes in input order with derived fields updated. Never fails:
/// open inputs, dangling edges and unknown kinds all read as low, and
/// feedback loops stop at the round budget.
pub fn evaluate(nodes: &[Node], edges: &[Edge]) -> Vec<Node> {
    Evaluator::new().run(nodes, edges).nodes
}
