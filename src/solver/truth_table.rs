//! Exhaustive sweep over input source levels.

use std::fmt;

use crate::circuit::{CircuitGraph, Edge, Node};
use crate::error::{GateflowError, Result};

use super::{Evaluator, EvaluatorConfig, MAX_TRUTH_TABLE_INPUTS};

/// One column of a truth table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub id: String,
    pub label: String,
}

impl Column {
    fn of(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            label: node.display_label().to_string(),
        }
    }
}

/// One row: an input assignment and the output levels it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthRow {
    pub inputs: Vec<bool>,
    pub outputs: Vec<bool>,
    /// Whether the evaluator reached a fixed point for this row
    pub settled: bool,
}

/// Output levels for every combination of input levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    /// Input sources in declaration order; the first is the most significant bit
    pub inputs: Vec<Column>,
    /// Output sinks in declaration order
    pub outputs: Vec<Column>,
    pub rows: Vec<TruthRow>,
}

impl TruthTable {
    /// Whether every row reached a fixed point.
    pub fn is_stable(&self) -> bool {
        self.rows.iter().all(|row| row.settled)
    }
}

/// Evaluate the circuit for every combination of input source levels.
///
/// Each row starts from the given nodes with only the input levels replaced,
/// so rows never see each other's gate outputs.
pub fn truth_table(nodes: &[Node], edges: &[Edge], config: &EvaluatorConfig) -> Result<TruthTable> {
    let graph = CircuitGraph::new(nodes, edges);
    let input_ids = graph.inputs();
    let output_ids = graph.outputs();

    if input_ids.len() > MAX_TRUTH_TABLE_INPUTS {
        return Err(GateflowError::TooManyInputs {
            count: input_ids.len(),
            max: MAX_TRUTH_TABLE_INPUTS,
        });
    }

    let evaluator = Evaluator::with_config(config.clone());
    let width = input_ids.len();
    let mut working = nodes.to_vec();
    let mut rows = Vec::with_capacity(1 << width);

    for combination in 0..(1usize << width) {
        let levels: Vec<bool> = (0..width)
            .map(|bit| combination & (1 << (width - 1 - bit)) != 0)
            .collect();
        for (id, &level) in input_ids.iter().zip(&levels) {
            working[id.0].data.set_value(level);
        }

        let evaluation = evaluator.run(&working, edges);
        let outputs = output_ids
            .iter()
            .map(|id| evaluation.nodes[id.0].data.value.unwrap_or(false))
            .collect();

        rows.push(TruthRow {
            inputs: levels,
            outputs,
            settled: evaluation.settled,
        });
    }

    Ok(TruthTable {
        inputs: input_ids.iter().map(|&id| Column::of(graph.node(id))).collect(),
        outputs: output_ids.iter().map(|&id| Column::of(graph.node(id))).collect(),
        rows,
    })
}

fn column_widths(columns: &[Column]) -> Vec<usize> {
    columns.iter().map(|c| c.label.chars().count().max(1)).collect()
}

fn pad_labels(columns: &[Column], widths: &[usize]) -> String {
    columns
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{:<w$}", c.label, w = w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn pad_levels(levels: &[bool], widths: &[usize]) -> String {
    levels
        .iter()
        .zip(widths)
        .map(|(&level, w)| format!("{:<w$}", u8::from(level), w = w))
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let in_widths = column_widths(&self.inputs);
        let out_widths = column_widths(&self.outputs);

        writeln!(
            f,
            "{} | {}",
            pad_labels(&self.inputs, &in_widths),
            pad_labels(&self.outputs, &out_widths)
        )?;

        for row in &self.rows {
            write!(
                f,
                "{} | {}",
                pad_levels(&row.inputs, &in_widths),
                pad_levels(&row.outputs, &out_widths)
            )?;
            if !row.settled {
                write!(f, "  (unsettled)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
