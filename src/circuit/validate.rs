//! Circuit validation.
//!
//! Validation never blocks evaluation. The evaluator absorbs every problem
//! reported here into a low signal; the diagnostics exist so an editor can
//! show the user why a circuit reads the way it does.

use std::collections::HashSet;
use std::fmt;

use super::elements::{Edge, Node};
use super::graph::{CircuitGraph, Operand};
use super::types::{NodeId, NodeKind, HANDLE_A, HANDLE_B, HANDLE_INPUT};

/// A problem found in a circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Two nodes share an id
    DuplicateNodeId { node: String },

    /// Node kind the evaluator does not know
    UnknownNodeKind { node: String, kind: String },

    /// Edge endpoint missing from the graph
    DanglingEdge { edge: String, missing: String },

    /// Edge into a handle the target does not have
    UnknownHandle { edge: String, node: String, handle: String },

    /// Edge the evaluator never reads
    IgnoredEdge { edge: String, node: String },

    /// More than one edge into a single input; the first one is used
    SharedInputHandle {
        node: String,
        handle: String,
        count: usize,
    },

    /// Unconnected input, reads as low
    OpenInput { node: String, handle: String },

    /// Feedback loop through gates
    CombinationalCycle { nodes: Vec<String> },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DuplicateNodeId { node } => {
                write!(f, "Node id '{}' is used more than once", node)
            }
            Diagnostic::UnknownNodeKind { node, kind } => {
                write!(f, "Node '{}' has unknown kind '{}' and is not simulated", node, kind)
            }
            Diagnostic::DanglingEdge { edge, missing } => {
                write!(f, "Edge {} refers to missing node '{}'", edge, missing)
            }
            Diagnostic::UnknownHandle { edge, node, handle } => {
                write!(f, "Edge {} targets unknown handle '{}' on node '{}'", edge, handle, node)
            }
            Diagnostic::IgnoredEdge { edge, node } => {
                write!(f, "Edge {} into node '{}' is never read", edge, node)
            }
            Diagnostic::SharedInputHandle {
                node,
                handle,
                count,
            } => write!(
                f,
                "Input '{}' of node '{}' has {} connections; only the first is used",
                handle, node, count
            ),
            Diagnostic::OpenInput { node, handle } => {
                write!(f, "Input '{}' of node '{}' is unconnected and reads low", handle, node)
            }
            Diagnostic::CombinationalCycle { nodes } => {
                write!(f, "Combinational cycle through {}", nodes.join(" -> "))
            }
        }
    }
}

/// Validate a circuit.
///
/// Checks:
/// - Node ids are unique and node kinds are known
/// - Edges connect existing nodes on existing handles
/// - Every gate and output input is driven exactly once
/// - No feedback loops through gates
pub fn validate_circuit(nodes: &[Node], edges: &[Edge]) -> Vec<Diagnostic> {
    let graph = CircuitGraph::new(nodes, edges);
    let mut diagnostics = Vec::new();

    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.id.as_str()) {
            diagnostics.push(Diagnostic::DuplicateNodeId {
                node: node.id.clone(),
            });
        }
        if !node.kind.is_recognized() {
            diagnostics.push(Diagnostic::UnknownNodeKind {
                node: node.id.clone(),
                kind: node.kind.to_string(),
            });
        }
    }

    for (idx, edge) in edges.iter().enumerate() {
        check_edge(&graph, idx, edge, &mut diagnostics);
    }

    for (id, node) in graph.iter() {
        check_inputs(&graph, id, node, &mut diagnostics);
    }

    for cycle in find_cycles(&graph) {
        diagnostics.push(Diagnostic::CombinationalCycle {
            nodes: cycle
                .into_iter()
                .map(|id| graph.node(id).id.clone())
                .collect(),
        });
    }

    diagnostics
}

fn edge_label(idx: usize, edge: &Edge) -> String {
    match &edge.id {
        Some(id) => format!("'{}'", id),
        None => format!("#{}", idx),
    }
}

fn check_edge(graph: &CircuitGraph<'_>, idx: usize, edge: &Edge, out: &mut Vec<Diagnostic>) {
    for endpoint in [&edge.source, &edge.target] {
        if graph.find_node(endpoint).is_none() {
            out.push(Diagnostic::DanglingEdge {
                edge: edge_label(idx, edge),
                missing: endpoint.clone(),
            });
        }
    }

    let Some(target) = graph.find_node(&edge.target) else {
        return;
    };
    let kind = &graph.node(target).kind;
    // Output sinks read their first incoming edge whatever its handle
    if !kind.is_recognized() || *kind == NodeKind::OutputSink {
        return;
    }

    match edge.handle() {
        Some(handle) if !kind.input_handles().iter().any(|h| *h == handle) => {
            out.push(Diagnostic::UnknownHandle {
                edge: edge_label(idx, edge),
                node: edge.target.clone(),
                handle: handle.to_string(),
            });
        }
        None if matches!(
            kind,
            NodeKind::AndGate | NodeKind::OrGate | NodeKind::InputSource
        ) || (*kind == NodeKind::NotGate && has_labelled_input(graph, target)) =>
        {
            out.push(Diagnostic::IgnoredEdge {
                edge: edge_label(idx, edge),
                node: edge.target.clone(),
            });
        }
        _ => {}
    }
}

/// Whether a NOT gate has an edge on its `input` handle, which shadows every
/// unlabelled edge into it.
fn has_labelled_input(graph: &CircuitGraph<'_>, id: NodeId) -> bool {
    graph.incoming(id).any(|e| e.handle() == Some(HANDLE_INPUT))
}

/// Report open and shared inputs of gates and output sinks.
fn check_inputs(graph: &CircuitGraph<'_>, id: NodeId, node: &Node, out: &mut Vec<Diagnostic>) {
    let ports: Vec<(&str, usize)> = match node.kind {
        NodeKind::AndGate | NodeKind::OrGate => [HANDLE_A, HANDLE_B]
            .into_iter()
            .map(|h| (h, graph.incoming(id).filter(|e| e.handle() == Some(h)).count()))
            .collect(),
        NodeKind::NotGate => {
            // Labelled edges win; unlabelled ones only count without them
            let labelled = graph
                .incoming(id)
                .filter(|e| e.handle() == Some(HANDLE_INPUT))
                .count();
            let count = if labelled > 0 {
                labelled
            } else {
                graph.incoming(id).filter(|e| e.handle().is_none()).count()
            };
            vec![(HANDLE_INPUT, count)]
        }
        NodeKind::OutputSink => vec![(HANDLE_INPUT, graph.incoming(id).count())],
        _ => return,
    };

    for (handle, count) in ports {
        match count {
            0 => out.push(Diagnostic::OpenInput {
                node: node.id.clone(),
                handle: handle.to_string(),
            }),
            1 => {}
            count => out.push(Diagnostic::SharedInputHandle {
                node: node.id.clone(),
                handle: handle.to_string(),
                count,
            }),
        }
    }
}

/// Strongly connected components of the gate dependency graph that contain
/// a feedback loop, each listed in declaration order.
fn find_cycles(graph: &CircuitGraph<'_>) -> Vec<Vec<NodeId>> {
    let n = graph.node_count();
    let mut feeds: Vec<Vec<NodeId>> = vec![Vec::new(); n];
    for (id, wiring) in graph.gates() {
        for operand in [wiring.a, wiring.b] {
            if let Operand::Node(src) = operand {
                if graph.node(src).kind.gate().is_some() {
                    feeds[src.0].push(id);
                }
            }
        }
    }

    let mut tarjan = Tarjan {
        feeds: &feeds,
        index: vec![None; n],
        lowlink: vec![0; n],
        on_stack: vec![false; n],
        stack: Vec::new(),
        next_index: 0,
        cycles: Vec::new(),
    };
    for v in 0..n {
        if tarjan.index[v].is_none() {
            tarjan.connect(v);
        }
    }

    let mut cycles = tarjan.cycles;
    for cycle in &mut cycles {
        cycle.sort();
    }
    cycles.sort();
    cycles
}

struct Tarjan<'f> {
    feeds: &'f [Vec<NodeId>],
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
    cycles: Vec<Vec<NodeId>>,
}

impl Tarjan<'_> {
    fn visit(&mut self, v: usize) {
        self.index[v] = Some(self.next_index);
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
    }

    /// Depth-first search from `root`. Frames live on an explicit stack of
    /// `(node, next successor)` pairs so chain depth never reaches the call
    /// stack.
    fn connect(&mut self, root: usize) {
        let feeds = self.feeds;
        let mut frames = vec![(root, 0usize)];
        self.visit(root);

        while let Some(frame) = frames.last_mut() {
            let (v, next) = *frame;
            if let Some(&NodeId(w)) = feeds[v].get(next) {
                frame.1 += 1;
                match self.index[w] {
                    None => {
                        self.visit(w);
                        frames.push((w, 0));
                    }
                    Some(w_index) if self.on_stack[w] => {
                        self.lowlink[v] = self.lowlink[v].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[v]);
            }

            if Some(self.lowlink[v]) == self.index[v] {
                let mut component = Vec::new();
                while let Some(w) = self.stack.pop() {
                    self.on_stack[w] = false;
                    component.push(NodeId(w));
                    if w == v {
                        break;
                    }
                }
                let self_loop = feeds[v].contains(&NodeId(v));
                if component.len() > 1 || self_loop {
                    self.cycles.push(component);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_circuit_has_no_diagnostics() {
        let nodes = vec![
            Node::input("in1", true),
            Node::input("in2", true),
            Node::new("and", NodeKind::AndGate),
            Node::output("out"),
        ];
        let edges = vec![
            Edge::to_handle("in1", "and", "a"),
            Edge::to_handle("in2", "and", "b"),
            Edge::to_handle("and", "out", "input"),
        ];
        assert!(validate_circuit(&nodes, &edges).is_empty());
    }

    #[test]
    fn test_open_and_shared_inputs() {
        let nodes = vec![
            Node::input("x", true),
            Node::input("y", false),
            Node::new("or", NodeKind::OrGate),
            Node::output("out"),
        ];
        let edges = vec![
            Edge::to_handle("x", "or", "a"),
            Edge::to_handle("y", "or", "a"),
            Edge::new("or", "out"),
        ];
        let diagnostics = validate_circuit(&nodes, &edges);
        assert_eq!(
            diagnostics,
            vec![
                Diagnostic::SharedInputHandle {
                    node: "or".to_string(),
                    handle: "a".to_string(),
                    count: 2,
                },
                Diagnostic::OpenInput {
                    node: "or".to_string(),
                    handle: "b".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_bad_references() {
        let nodes = vec![
            Node::input("x", true),
            Node::input("x", false),
            Node::new("not", NodeKind::NotGate),
            Node::new("blob", "blobNode"),
        ];
        let edges = vec![
            Edge::to_handle("x", "not", "c").with_id("e1"),
            Edge::new("ghost", "not"),
            Edge::new("not", "x"),
        ];
        let diagnostics = validate_circuit(&nodes, &edges);

        assert!(diagnostics.contains(&Diagnostic::DuplicateNodeId {
            node: "x".to_string()
        }));
        assert!(diagnostics.contains(&Diagnostic::UnknownNodeKind {
            node: "blob".to_string(),
            kind: "blobNode".to_string(),
        }));
        assert!(diagnostics.contains(&Diagnostic::UnknownHandle {
            edge: "'e1'".to_string(),
            node: "not".to_string(),
            handle: "c".to_string(),
        }));
        assert!(diagnostics.contains(&Diagnostic::DanglingEdge {
            edge: "#1".to_string(),
            missing: "ghost".to_string(),
        }));
        assert!(diagnostics.contains(&Diagnostic::IgnoredEdge {
            edge: "#2".to_string(),
            node: "x".to_string(),
        }));
    }

    #[test]
    fn test_detects_feedback_loop() {
        let nodes = vec![
            Node::input("en", true),
            Node::new("and", NodeKind::AndGate),
            Node::new("not", NodeKind::NotGate),
            Node::new("self", NodeKind::NotGate),
        ];
        let edges = vec![
            Edge::to_handle("not", "and", "a"),
            Edge::to_handle("en", "and", "b"),
            Edge::to_handle("and", "not", "input"),
            Edge::to_handle("self", "self", "input"),
        ];
        let cycles: Vec<Diagnostic> = validate_circuit(&nodes, &edges)
            .into_iter()
            .filter(|d| matches!(d, Diagnostic::CombinationalCycle { .. }))
            .collect();
        assert_eq!(
            cycles,
            vec![
                Diagnostic::CombinationalCycle {
                    nodes: vec!["and".to_string(), "not".to_string()],
                },
                Diagnostic::CombinationalCycle {
                    nodes: vec!["self".to_string()],
                },
            ]
        );
        assert_eq!(cycles[0].to_string(), "Combinational cycle through and -> not");
    }

    fn not_chain(len: usize) -> (Vec<Node>, Vec<Edge>) {
        let nodes: Vec<Node> = (0..len)
            .map(|i| Node::new(format!("n{}", i), NodeKind::NotGate))
            .collect();
        let edges = (1..len)
            .map(|i| Edge::to_handle(format!("n{}", i - 1), format!("n{}", i), "input"))
            .collect();
        (nodes, edges)
    }

    #[test]
    fn test_long_chain_does_not_exhaust_stack() {
        let (nodes, edges) = not_chain(50_000);
        assert_eq!(
            validate_circuit(&nodes, &edges),
            vec![Diagnostic::OpenInput {
                node: "n0".to_string(),
                handle: "input".to_string(),
            }]
        );
    }

    #[test]
    fn test_long_ring_is_one_cycle() {
        let (nodes, mut edges) = not_chain(20_000);
        edges.push(Edge::to_handle("n19999", "n0", "input"));
        let diagnostics = validate_circuit(&nodes, &edges);
        assert_eq!(diagnostics.len(), 1);
        match &diagnostics[0] {
            Diagnostic::CombinationalCycle { nodes: ring } => {
                assert_eq!(ring.len(), 20_000);
                assert_eq!(ring[0], "n0");
            }
            other => panic!("unexpected diagnostic {:?}", other),
        }
    }

    #[test]
    fn test_not_gate_prefers_labelled_input() {
        let nodes = vec![
            Node::input("x", true),
            Node::input("y", false),
            Node::new("not", NodeKind::NotGate),
        ];
        let edges = vec![
            Edge::new("x", "not").with_id("loose"),
            Edge::to_handle("y", "not", "input").with_id("wired"),
        ];
        assert_eq!(
            validate_circuit(&nodes, &edges),
            vec![Diagnostic::IgnoredEdge {
                edge: "'loose'".to_string(),
                node: "not".to_string(),
            }]
        );

        // Two unlabelled edges and nothing labelled: the first one is read
        let edges = vec![Edge::new("x", "not"), Edge::new("y", "not")];
        assert_eq!(
            validate_circuit(&nodes, &edges),
            vec![Diagnostic::SharedInputHandle {
                node: "not".to_string(),
                handle: "input".to_string(),
                count: 2,
            }]
        );
    }

    #[test]
    fn test_output_sink_accepts_any_handle() {
        let nodes = vec![Node::input("x", true), Node::output("out")];
        let edges = vec![Edge::to_handle("x", "out", "value").with_id("e1")];
        assert!(validate_circuit(&nodes, &edges).is_empty());
    }
}
