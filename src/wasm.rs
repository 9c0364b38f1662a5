//! WASM bindings for Gateflow Core.
//!
//! This module provides JavaScript-friendly bindings for the browser-based
//! circuit designer. Nodes and edges cross the boundary as JSON strings in
//! the same shape the designer saves.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { evaluate_json, WasmCircuitSession } from 'gateflow_core';
//!
//! await init();
//!
//! // Stateless: evaluate a node/edge snapshot
//! const evaluated = JSON.parse(evaluate_json(JSON.stringify(nodes), JSON.stringify(edges)));
//!
//! // Stateful: let the session own the circuit
//! const session = new WasmCircuitSession();
//! const input = session.add_node('inputSource', 0, 0);
//! const not = session.add_node('notGate', 150, 0);
//! session.connect(input, 'output', not, 'input');
//! session.set_input(input, true);
//! setNodes(JSON.parse(session.nodes_json()));
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::{Edge, Node, NodeKind, Position};
use crate::document::CircuitDocument;
use crate::error::GateflowError;
use crate::session::{CircuitSession, Connection};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| to_js(GateflowError::from(e)))
}

/// Evaluate a circuit snapshot.
///
/// # Arguments
/// * `nodes_json` - JSON array of nodes
/// * `edges_json` - JSON array of edges
///
/// # Returns
/// The evaluated node array as JSON, in the same order.
#[wasm_bindgen]
pub fn evaluate_json(nodes_json: &str, edges_json: &str) -> Result<String, JsValue> {
    let nodes: Vec<Node> =
        serde_json::from_str(nodes_json).map_err(|e| to_js(GateflowError::from(e)))?;
    let edges: Vec<Edge> =
        serde_json::from_str(edges_json).map_err(|e| to_js(GateflowError::from(e)))?;
    to_json(&crate::evaluate(&nodes, &edges))
}

/// Browser-side editing session.
///
/// Wraps the native [`CircuitSession`]; every mutating call re-evaluates the
/// circuit, so `nodes_json()` always reflects settled levels.
#[wasm_bindgen]
pub struct WasmCircuitSession {
    session: CircuitSession,
}

impl Default for WasmCircuitSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmCircuitSession {
    /// Create an empty session.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmCircuitSession {
        WasmCircuitSession {
            session: CircuitSession::new(),
        }
    }

    /// Restore a session from a saved document (`{ nodes, edges, viewport }`).
    #[wasm_bindgen]
    pub fn from_json(json: &str) -> Result<WasmCircuitSession, JsValue> {
        let document = CircuitDocument::from_json(json).map_err(to_js)?;
        Ok(WasmCircuitSession {
            session: CircuitSession::from_document(document),
        })
    }

    /// Drop a node from the palette. Returns its id.
    ///
    /// # Arguments
    /// * `kind` - Node type tag, e.g. `"andGate"`
    /// * `x`, `y` - Canvas position
    #[wasm_bindgen]
    pub fn add_node(&mut self, kind: &str, x: f64, y: f64) -> String {
        self.session
            .add_node(NodeKind::from(kind), Position::new(x, y))
    }

    /// Connect two nodes. Returns the edge id, or `undefined` for a duplicate.
    #[wasm_bindgen]
    pub fn connect(
        &mut self,
        source: &str,
        source_handle: Option<String>,
        target: &str,
        target_handle: Option<String>,
    ) -> Option<String> {
        let mut connection = Connection::new(source, target);
        connection.source_handle = source_handle;
        connection.target_handle = target_handle;
        self.session.connect(connection)
    }

    /// Remove a node and its edges.
    #[wasm_bindgen]
    pub fn remove_node(&mut self, id: &str) -> Result<(), JsValue> {
        self.session.remove_node(id).map_err(to_js)
    }

    /// Remove an edge. Returns whether it existed.
    #[wasm_bindgen]
    pub fn remove_edge(&mut self, id: &str) -> bool {
        self.session.remove_edge(id)
    }

    /// Toggle an input source.
    #[wasm_bindgen]
    pub fn set_input(&mut self, id: &str, value: bool) -> Result<(), JsValue> {
        self.session.set_input(id, value).map_err(to_js)
    }

    /// Rename a node.
    #[wasm_bindgen]
    pub fn set_label(&mut self, id: &str, label: &str) -> Result<(), JsValue> {
        self.session.set_label(id, label).map_err(to_js)
    }

    /// Current nodes as a JSON array.
    #[wasm_bindgen]
    pub fn nodes_json(&self) -> Result<String, JsValue> {
        to_json(self.session.nodes())
    }

    /// Current edges as a JSON array.
    #[wasm_bindgen]
    pub fn edges_json(&self) -> Result<String, JsValue> {
        to_json(self.session.edges())
    }

    /// The whole circuit as a saveable document.
    #[wasm_bindgen]
    pub fn to_json(&self) -> Result<String, JsValue> {
        self.session.to_document().to_json().map_err(to_js)
    }

    /// Whether the last evaluation reached a fixed point.
    #[wasm_bindgen(getter)]
    pub fn settled(&self) -> bool {
        self.session.last_evaluation().settled
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
