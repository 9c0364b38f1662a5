//! # Gateflow Core
//!
//! A fixed-point evaluator for combinational logic circuits drawn in a
//! node-graph editor.
//!
//! This library provides:
//! - The editor's node and edge records, readable from and writable to its JSON
//! - A total evaluator that settles gate outputs even in cyclic wiring
//! - Validation diagnostics and exhaustive truth tables
//! - An editing session that re-evaluates after every mutation
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`circuit`] - Node/edge records, graph indexing and validation
//! - [`solver`] - Relaxation, evaluation and truth tables
//! - [`document`] - Saved `{ nodes, edges, viewport }` documents
//! - [`session`] - Stateful editing with automatic re-evaluation
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! gateflow circuit.json --set dndnode_inputSource_1=true
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { evaluate_json } from 'gateflow_core';
//!
//! const evaluated = JSON.parse(evaluate_json(nodesJson, edgesJson));
//! ```
//!
//! ## Evaluation Method
//!
//! Each node gets a signal seeded from its payload. Gates are re-evaluated in
//! declaration order, each result visible to later gates in the same round,
//! until a round changes nothing or `5 * nodes + 5` rounds have run. Open
//! and dangling gate inputs read low.

pub mod circuit;
pub mod document;
pub mod error;
pub mod session;
pub mod solver;

// Re-export main types for convenience
pub use circuit::{Edge, Node, NodeKind};
pub use document::CircuitDocument;
pub use error::{GateflowError, Result};
pub use session::CircuitSession;
pub use solver::{evaluate, Evaluator, EvaluatorConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmCircuitSession;
