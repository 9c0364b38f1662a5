//! Circuit evaluator.
//!
//! This module computes settled logic levels for a circuit whose wiring may
//! contain cycles, so a topological order is not available in general.
//! Instead the evaluator relaxes gate outputs towards a fixed point:
//!
//! 1. Seed a signal per node from its payload (input sources from their
//!    user-set value, gates from their previous output).
//! 2. Re-evaluate every gate in declaration order, writing each result back
//!    immediately, until a round changes nothing or the round budget is
//!    spent.
//! 3. Write gate outputs and output sink values into a copy of the nodes.
//!
//! A circuit that oscillates never reaches step 2's fixed point; its result
//! is whatever the signals were when the budget ran out.

mod evaluator;
mod relax;
mod truth_table;

pub use evaluator::{evaluate, Evaluation, Evaluator, EvaluatorConfig};
pub use relax::{RelaxOutcome, Relaxation, SignalCache};
pub use truth_table::{truth_table, Column, TruthRow, TruthTable};

/// Relaxation rounds granted per node.
pub const DEFAULT_ROUNDS_PER_NODE: usize = 5;

/// Relaxation rounds granted on top of the per-node budget.
pub const DEFAULT_EXTRA_ROUNDS: usize = 5;

/// Largest number of input sources a truth table sweeps.
pub const MAX_TRUTH_TABLE_INPUTS: usize = 16;
