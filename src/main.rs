//! Gateflow - Logic Circuit Evaluator
//!
//! Evaluates circuits saved by the browser designer.
//!
//! # Usage
//!
//! ```bash
//! gateflow half_adder.json --set a=true --set b=1 --output evaluated.json
//! gateflow half_adder.json --truth-table
//! RUST_LOG=debug gateflow latch.json --check --strict
//! ```

use std::path::PathBuf;

use clap::Parser;
use gateflow_core::{
    circuit::validate_circuit,
    error::{GateflowError, Result},
    solver::truth_table,
    CircuitDocument, CircuitSession, EvaluatorConfig,
};
use log::{info, warn};

/// Fixed-point logic circuit evaluator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the saved circuit document (.json)
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: PathBuf,

    /// Set an input source before evaluating (repeatable)
    #[arg(short, long = "set", value_name = "ID=BOOL")]
    set: Vec<String>,

    /// Override the relaxation round limit
    #[arg(long, value_name = "N")]
    max_rounds: Option<usize>,

    /// Print the truth table over all input sources instead of the document
    #[arg(short, long)]
    truth_table: bool,

    /// Report validation diagnostics on stderr
    #[arg(short, long)]
    check: bool,

    /// Fail when validation reports anything (implies --check)
    #[arg(long)]
    strict: bool,

    /// Write the evaluated document here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Parse an `ID=BOOL` assignment.
fn parse_assignment(assignment: &str) -> Result<(&str, bool)> {
    let (id, level) = assignment
        .split_once('=')
        .ok_or_else(|| GateflowError::invalid_assignment(assignment, "expected ID=BOOL"))?;

    let id = id.trim();
    if id.is_empty() {
        return Err(GateflowError::invalid_assignment(assignment, "missing node id"));
    }

    let level = match level.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "high" => true,
        "0" | "false" | "off" | "low" => false,
        other => {
            return Err(GateflowError::invalid_assignment(
                assignment,
                format!("'{}' is not a logic level", other),
            ))
        }
    };

    Ok((id, level))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    // Load the saved circuit
    let document = CircuitDocument::load(&args.circuit_file)?;

    if args.check || args.strict {
        let diagnostics = validate_circuit(&document.nodes, &document.edges);
        for diagnostic in &diagnostics {
            eprintln!("warning: {}", diagnostic);
        }
        if args.strict && !diagnostics.is_empty() {
            return Err(GateflowError::ValidationFailed {
                count: diagnostics.len(),
            });
        }
    }

    let mut config = EvaluatorConfig::default();
    if let Some(max_rounds) = args.max_rounds {
        config = config.with_max_rounds(max_rounds);
    }

    // Evaluate once on load, then once per override
    let mut session = CircuitSession::with_config(config);
    session.load(document);
    for assignment in &args.set {
        let (id, level) = parse_assignment(assignment)?;
        session.set_input(id, level)?;
    }

    if args.truth_table {
        let table = truth_table(session.nodes(), session.edges(), session.config())?;
        if !table.is_stable() {
            warn!("Some rows did not settle within the round limit");
        }
        print!("{}", table);
        return Ok(());
    }

    let summary = session.last_evaluation();
    if summary.settled {
        info!("Circuit settled after {} round(s)", summary.rounds);
    } else {
        warn!(
            "Circuit did not settle within {} round(s); reporting last levels",
            summary.rounds
        );
    }

    let document = session.to_document();
    match &args.output {
        Some(path) => document.save(path)?,
        None => println!("{}", document.to_json()?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("a=true").unwrap(), ("a", true));
        assert_eq!(parse_assignment(" b = 0 ").unwrap(), ("b", false));
        assert!(parse_assignment("dndnode_inputSource_1=HIGH").unwrap().1);
    }

    #[test]
    fn test_parse_assignment_rejects() {
        for bad in ["a", "=1", "a=maybe"] {
            assert!(matches!(
                parse_assignment(bad),
                Err(GateflowError::InvalidAssignment { .. })
            ));
        }
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "gateflow",
            "c.json",
            "--set",
            "a=1",
            "-s",
            "b=0",
            "--max-rounds",
            "3",
            "--strict",
        ]);
        assert_eq!(args.set, vec!["a=1", "b=0"]);
        assert_eq!(args.max_rounds, Some(3));
        assert!(args.strict);
        assert!(!args.truth_table);
    }
}
