//! Fixed-point relaxation of gate outputs.

use crate::circuit::{CircuitGraph, NodeId, NodeKind, Operand};

/// Current signal level of every node, indexed by [`NodeId`].
#[derive(Debug, Clone)]
pub struct SignalCache {
    signals: Vec<bool>,
}

impl SignalCache {
    /// Seed the cache from the node payloads.
    ///
    /// Input sources start at their user-set value and gates at their previous
    /// output; everything else (and every missing field) starts low.
    pub fn seed(graph: &CircuitGraph<'_>) -> Self {
        let signals = graph
            .iter()
            .map(|(_, node)| match node.kind {
                NodeKind::InputSource => node.data.value.unwrap_or(false),
                NodeKind::AndGate | NodeKind::OrGate | NodeKind::NotGate => {
                    node.data.output_value.unwrap_or(false)
                }
                _ => false,
            })
            .collect();
        Self { signals }
    }

    pub fn get(&self, id: NodeId) -> bool {
        self.signals[id.0]
    }

    fn set(&mut self, id: NodeId, level: bool) {
        self.signals[id.0] = level;
    }

    /// Read an operand. Open and dangling inputs read low.
    pub fn read(&self, operand: Operand) -> bool {
        match operand {
            Operand::Node(id) => self.get(id),
            Operand::Open | Operand::Dangling => false,
        }
    }
}

/// Outcome of a relaxation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelaxOutcome {
    /// Rounds executed
    pub rounds: usize,
    /// Whether the last round left every gate unchanged
    pub settled: bool,
}

/// Round-bounded relaxation of gate outputs.
///
/// Each round re-evaluates every gate in declaration order and writes the
/// result straight back into the cache, so later gates in the same round see
/// it. The run stops after the first round that changes nothing, or when the
/// round budget is spent.
#[derive(Debug, Clone, Copy)]
pub struct Relaxation {
    /// Maximum rounds
    pub max_rounds: usize,
}

impl Relaxation {
    pub fn new(max_rounds: usize) -> Self {
        Self { max_rounds }
    }

    pub fn run(&self, graph: &CircuitGraph<'_>, cache: &mut SignalCache) -> RelaxOutcome {
        let gates = graph.gates();
        let mut settled = gates.is_empty();
        let mut rounds = 0;

        while rounds < self.max_rounds {
            rounds += 1;
            let mut changed = false;

            for (id, wiring) in &gates {
                let level = wiring.gate.apply(cache.read(wiring.a), cache.read(wiring.b));
                if cache.get(*id) != level {
                    cache.set(*id, level);
                    changed = true;
                }
            }

            settled = !changed;
            if settled {
                break;
            }
        }

        RelaxOutcome { rounds, settled }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Edge, Node};

    #[test]
    fn test_seed_defaults_missing_fields_low() {
        let nodes = vec![
            Node::input("in", true),
            Node::new("bare_in", NodeKind::InputSource),
            Node::new("or", NodeKind::OrGate).with_output_value(true),
            Node::new("and", NodeKind::AndGate),
            Node::output("out").with_value(true),
        ];
        let graph = CircuitGraph::new(&nodes, &[]);
        let cache = SignalCache::seed(&graph);
        let levels: Vec<bool> = (0..nodes.len()).map(|i| cache.get(NodeId(i))).collect();
        assert_eq!(levels, vec![true, false, true, false, false]);
    }

    #[test]
    fn test_chain_settles_in_one_round_when_ordered() {
        let nodes = vec![
            Node::input("in", true),
            Node::new("n1", NodeKind::NotGate),
            Node::new("n2", NodeKind::NotGate),
        ];
        let edges = vec![Edge::new("in", "n1"), Edge::new("n1", "n2")];
        let graph = CircuitGraph::new(&nodes, &edges);
        let mut cache = SignalCache::seed(&graph);

        let outcome = Relaxation::new(20).run(&graph, &mut cache);
        // n2 flips in round one, round two confirms
        assert_eq!(outcome, RelaxOutcome { rounds: 2, settled: true });
        assert!(!cache.get(NodeId(1)));
        assert!(cache.get(NodeId(2)));
    }

    #[test]
    fn test_reverse_ordered_chain_needs_more_rounds() {
        let nodes = vec![
            Node::new("n2", NodeKind::NotGate),
            Node::new("n1", NodeKind::NotGate),
            Node::input("in", false),
        ];
        let edges = vec![Edge::new("in", "n1"), Edge::new("n1", "n2")];
        let graph = CircuitGraph::new(&nodes, &edges);
        let mut cache = SignalCache::seed(&graph);

        let outcome = Relaxation::new(20).run(&graph, &mut cache);
        assert!(outcome.settled);
        assert_eq!(outcome.rounds, 3);
        assert!(cache.get(NodeId(1)));
        assert!(!cache.get(NodeId(0)));
    }

    #[test]
    fn test_ring_oscillator_spends_budget() {
        let nodes = vec![Node::new("ring", NodeKind::NotGate)];
        let edges = vec![Edge::new("ring", "ring")];
        let graph = CircuitGraph::new(&nodes, &edges);
        let mut cache = SignalCache::seed(&graph);

        let outcome = Relaxation::new(7).run(&graph, &mut cache);
        assert_eq!(outcome, RelaxOutcome { rounds: 7, settled: false });
        // Seeded low, flipped seven times
        assert!(cache.get(NodeId(0)));
    }

    #[test]
    fn test_zero_budget() {
        let nodes = vec![Node::new("not", NodeKind::NotGate)];
        let graph = CircuitGraph::new(&nodes, &[]);
        let mut cache = SignalCache::seed(&graph);
        let outcome = Relaxation::new(0).run(&graph, &mut cache);
        assert_eq!(outcome, RelaxOutcome { rounds: 0, settled: false });
        assert!(!cache.get(NodeId(0)));
    }
}
