//! Saved circuit documents.
//!
//! A document is the record the designer persists: `{ nodes, edges, viewport }`
//! as JSON. Function-valued node fields (the input toggle callback) never
//! reach the document; the session supplies that capability after loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::circuit::{Edge, Node};
use crate::error::{GateflowError, Result};
use crate::solver::{Evaluation, Evaluator, EvaluatorConfig};

/// Pan and zoom of the editor canvas. Opaque to the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// A saved circuit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CircuitDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub edges: Vec<Edge>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
}

impl CircuitDocument {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            nodes,
            edges,
            viewport: None,
        }
    }

    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a document from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| GateflowError::file_read(path, e))?;
        let document = Self::from_json(&content)?;
        log::debug!(
            "Loaded circuit '{}' ({} nodes, {} edges)",
            path.display(),
            document.nodes.len(),
            document.edges.len()
        );
        Ok(document)
    }

    /// Write the document to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| GateflowError::file_write(path, e))
    }

    /// Re-run the evaluator over the document, as a loader does before
    /// displaying it. Returns the evaluated document and the run report.
    pub fn evaluated(&self, config: &EvaluatorConfig) -> (Self, Evaluation) {
        let evaluation = Evaluator::with_config(config.clone()).run(&self.nodes, &self.edges);
        let document = Self {
            nodes: evaluation.nodes.clone(),
            edges: self.edges.clone(),
            viewport: self.viewport,
        };
        (document, evaluation)
    }
}
