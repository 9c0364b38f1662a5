//! Circuit graph index.

use std::collections::HashMap;

use super::elements::{Edge, Node};
use super::types::{GateKind, NodeId, NodeKind, HANDLE_A, HANDLE_B, HANDLE_INPUT};

/// Where a gate operand or output sink reads its signal from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// No edge feeds this input
    Open,
    /// An edge feeds this input but its source is not in the graph
    Dangling,
    /// Driven by the node at this index
    Node(NodeId),
}

/// Resolved operand wiring of one gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateWiring {
    pub gate: GateKind,
    pub a: Operand,
    /// Always [`Operand::Open`] for NOT gates
    pub b: Operand,
}

/// A borrowed, indexed view over a node and edge list.
///
/// Lookups follow declaration order: when several edges could feed the same
/// input, the first one wins. Node ids are expected to be unique; if one is
/// repeated, edge sources resolve to its first occurrence.
#[derive(Debug)]
pub struct CircuitGraph<'a> {
    nodes: &'a [Node],
    edges: &'a [Edge],

    /// Mapping from node ids to node indices
    node_map: HashMap<&'a str, NodeId>,

    /// Incoming edge indices per target id, in declaration order
    incoming: HashMap<&'a str, Vec<usize>>,
}

impl<'a> CircuitGraph<'a> {
    /// Index a node and edge list.
    pub fn new(nodes: &'a [Node], edges: &'a [Edge]) -> Self {
        let mut node_map = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            node_map.entry(node.id.as_str()).or_insert(NodeId(idx));
        }

        let mut incoming: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (idx, edge) in edges.iter().enumerate() {
            incoming.entry(edge.target.as_str()).or_default().push(idx);
        }

        Self {
            nodes,
            edges,
            node_map,
            incoming,
        }
    }

    pub fn nodes(&self) -> &'a [Node] {
        self.nodes
    }

    pub fn edges(&self) -> &'a [Edge] {
        self.edges
    }

    /// Number of nodes (including duplicates and unrecognized kinds).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Find a node index by id.
    pub fn find_node(&self, id: &str) -> Option<NodeId> {
        self.node_map.get(id).copied()
    }

    pub fn node(&self, id: NodeId) -> &'a Node {
        &self.nodes[id.0]
    }

    /// Iterate node indices with their nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &'a Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (NodeId(idx), node))
    }

    /// Incoming edges of a node, in declaration order.
    pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = &'a Edge> + '_ {
        let edges = self.edges;
        self.incoming
            .get(self.node(id).id.as_str())
            .into_iter()
            .flatten()
            .map(move |&idx| &edges[idx])
    }

    /// First incoming edge on the given handle.
    pub fn first_on_handle(&self, id: NodeId, handle: &str) -> Option<&'a Edge> {
        self.incoming(id).find(|e| e.handle() == Some(handle))
    }

    /// The edge a NOT gate reads: the first one labeled `input`, else the
    /// first unlabeled one.
    pub fn not_input_edge(&self, id: NodeId) -> Option<&'a Edge> {
        self.first_on_handle(id, HANDLE_INPUT)
            .or_else(|| self.incoming(id).find(|e| e.handle().is_none()))
    }

    /// Resolve the signal source behind an optional edge.
    pub fn operand(&self, edge: Option<&Edge>) -> Operand {
        match edge {
            None => Operand::Open,
            Some(edge) => self
                .find_node(&edge.source)
                .map_or(Operand::Dangling, Operand::Node),
        }
    }

    /// Operand wiring of a gate node, `None` for every other kind.
    pub fn wiring(&self, id: NodeId) -> Option<GateWiring> {
        let gate = self.node(id).kind.gate()?;
        let wiring = match gate {
            GateKind::Not => GateWiring {
                gate,
                a: self.operand(self.not_input_edge(id)),
                b: Operand::Open,
            },
            GateKind::And | GateKind::Or => GateWiring {
                gate,
                a: self.operand(self.first_on_handle(id, HANDLE_A)),
                b: self.operand(self.first_on_handle(id, HANDLE_B)),
            },
        };
        Some(wiring)
    }

    /// All gates with their wiring, in declaration order.
    pub fn gates(&self) -> Vec<(NodeId, GateWiring)> {
        self.iter()
            .filter_map(|(id, _)| self.wiring(id).map(|w| (id, w)))
            .collect()
    }

    /// The signal an output sink displays: the source of its first incoming
    /// edge, whatever the handle.
    pub fn output_driver(&self, id: NodeId) -> Operand {
        self.operand(self.incoming(id).next())
    }

    /// Input sources in declaration order.
    pub fn inputs(&self) -> Vec<NodeId> {
        self.nodes_of_kind(&NodeKind::InputSource)
    }

    /// Output sinks in declaration order.
    pub fn outputs(&self) -> Vec<NodeId> {
        self.nodes_of_kind(&NodeKind::OutputSink)
    }

    fn nodes_of_kind(&self, kind: &NodeKind) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| &node.kind == kind)
            .map(|(id, _)| id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_adder_ish() -> (Vec<Node>, Vec<Edge>) {
        let nodes = vec![
            Node::input("in1", true),
            Node::input("in2", false),
            Node::new("and", NodeKind::AndGate),
            Node::new("not", NodeKind::NotGate),
            Node::output("out"),
        ];
        let edges = vec![
            Edge::to_handle("in1", "and", "a"),
            Edge::to_handle("in2", "and", "b"),
            Edge::new("and", "not"),
            Edge::new("not", "out"),
        ];
        (nodes, edges)
    }

    #[test]
    fn test_wiring_resolves_handles() {
        let (nodes, edges) = half_adder_ish();
        let graph = CircuitGraph::new(&nodes, &edges);

        let and = graph.find_node("and").unwrap();
        assert_eq!(
            graph.wiring(and),
            Some(GateWiring {
                gate: GateKind::And,
                a: Operand::Node(NodeId(0)),
                b: Operand::Node(NodeId(1)),
            })
        );

        let not = graph.find_node("not").unwrap();
        assert_eq!(graph.wiring(not).unwrap().a, Operand::Node(and));
        assert_eq!(graph.output_driver(NodeId(4)), Operand::Node(not));
        assert_eq!(graph.wiring(NodeId(0)), None);
    }

    #[test]
    fn test_not_prefers_labeled_input() {
        let nodes = vec![
            Node::input("x", false),
            Node::input("y", true),
            Node::new("not", NodeKind::NotGate),
        ];
        let edges = vec![Edge::new("x", "not"), Edge::to_handle("y", "not", "input")];
        let graph = CircuitGraph::new(&nodes, &edges);
        assert_eq!(graph.wiring(NodeId(2)).unwrap().a, Operand::Node(NodeId(1)));
    }

    #[test]
    fn test_first_match_wins_and_dangling() {
        let nodes = vec![Node::input("x", true), Node::new("or", NodeKind::OrGate)];
        let edges = vec![
            Edge::to_handle("ghost", "or", "a"),
            Edge::to_handle("x", "or", "a"),
        ];
        let graph = CircuitGraph::new(&nodes, &edges);
        let wiring = graph.wiring(NodeId(1)).unwrap();
        assert_eq!(wiring.a, Operand::Dangling);
        assert_eq!(wiring.b, Operand::Open);
    }

    #[test]
    fn test_inputs_and_outputs_in_order() {
        let (nodes, edges) = half_adder_ish();
        let graph = CircuitGraph::new(&nodes, &edges);
        assert_eq!(graph.inputs(), vec![NodeId(0), NodeId(1)]);
        assert_eq!(graph.outputs(), vec![NodeId(4)]);
        assert_eq!(graph.gates().len(), 2);
    }
}
