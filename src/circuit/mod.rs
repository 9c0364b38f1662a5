//! Circuit graph representation and validation.
//!
//! This module provides the data model the editor hands to the evaluator.
//! [`Node`] and [`Edge`] mirror the stored editor JSON; [`CircuitGraph`]
//! indexes them for operand lookups.

mod elements;
mod graph;
mod types;
mod validate;

pub use elements::{Edge, Node, NodeData};
pub use graph::{CircuitGraph, GateWiring, Operand};
pub use types::*;
pub use validate::{validate_circuit, Diagnostic};
