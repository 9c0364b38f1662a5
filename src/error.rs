//! Error types for the Gateflow circuit tooling.
//!
//! The evaluator itself is total and never fails. [`GateflowError`] covers
//! the collaborators around it: document loading and saving, session
//! mutations, truth-table sweeps and the command-line frontend.

use std::path::Path;

use thiserror::Error;

/// Result type alias using [`GateflowError`].
pub type Result<T> = std::result::Result<T, GateflowError>;

/// Unified error type for all Gateflow operations.
#[derive(Error, Debug)]
pub enum GateflowError {
    // ============ Document Errors ============
    /// Circuit document is not valid JSON or has the wrong shape
    #[error("Invalid circuit document: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Error reading a circuit file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a circuit file
    #[error("Failed to write circuit file '{path}': {source}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ Session Errors ============
    /// Node not found in circuit
    #[error("Node '{node}' not found in circuit")]
    NodeNotFound { node: String },

    /// Node exists but is not an input source
    #[error("Node '{node}' is not an input source")]
    NotAnInput { node: String },

    // ============ Analysis Errors ============
    /// Malformed `ID=BOOL` input assignment
    #[error("Invalid input assignment '{assignment}': {message}")]
    InvalidAssignment { assignment: String, message: String },

    /// Truth table would be too large to enumerate
    #[error("Circuit has {count} inputs, truth tables are limited to {max}")]
    TooManyInputs { count: usize, max: usize },

    /// Validation produced diagnostics in strict mode
    #[error("Circuit validation reported {count} issue(s)")]
    ValidationFailed { count: usize },
}

impl GateflowError {
    /// Create a file read error
    pub fn file_read(path: &Path, source: std::io::Error) -> Self {
        Self::FileReadError {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create a file write error
    pub fn file_write(path: &Path, source: std::io::Error) -> Self {
        Self::FileWriteError {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create a node-not-found error
    pub fn node_not_found(node: impl Into<String>) -> Self {
        Self::NodeNotFound { node: node.into() }
    }

    /// Create an invalid assignment error
    pub fn invalid_assignment(assignment: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAssignment {
            assignment: assignment.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_node() {
        let err = GateflowError::node_not_found("n7");
        assert_eq!(err.to_string(), "Node 'n7' not found in circuit");

        let err = GateflowError::NotAnInput {
            node: "and_1".to_string(),
        };
        assert!(err.to_string().contains("and_1"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: GateflowError = parse.into();
        assert!(matches!(err, GateflowError::Json { .. }));
        assert!(err.to_string().starts_with("Invalid circuit document"));
    }

    #[test]
    fn test_file_errors_keep_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = GateflowError::file_read(Path::new("saves/adder.json"), io);
        assert!(err.to_string().contains("saves/adder.json"));
    }
}
