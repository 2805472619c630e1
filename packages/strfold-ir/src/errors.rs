//! Error types for strfold-ir
//!
//! Setup and run failures of the string folding analysis. Flow functions
//! never fail: unrecognized shapes fold to `Unknown` and a missing caller
//! context is a typed `ReturnLink` outcome.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for strfold-ir operations
#[derive(Debug, Error)]
pub enum StrFoldError {
    /// Entry class has no method with the requested name
    #[error("Entry method '{method}' not found in class '{class}'")]
    EntryMethodNotFound { class: String, method: String },

    /// Entry class has no `<clinit>` and one is required
    #[error("Static initializer not found in class '{class}'")]
    StaticInitializerNotFound { class: String },

    #[error("Class not found: {0}")]
    ClassNotFound(String),

    /// Entry method has no statements to seed
    #[error("Method has no body: {0}")]
    EmptyMethodBody(String),

    /// A solver limit stopped the run before the fixed point
    #[error("Solver stopped before the fixed point after {iterations} iterations ({path_edges} path edges)")]
    SolverIncomplete { iterations: usize, path_edges: usize },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for strfold-ir operations
pub type Result<T> = std::result::Result<T, StrFoldError>;
