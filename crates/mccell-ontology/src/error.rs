//! Error types for ontology loading and compilation.
//!
//! Covers the term graph (lookups, structure), the OBO loader, the label
//! encoder and the relation-matrix compiler.
//!
//! Unknown terms are usually NOT fatal during compilation: the compiler logs
//! a warning and skips them. They only surface as errors from direct graph
//! lookups, or indirectly as [`OntologyError::EmptyWorkingSet`] when nothing
//! usable is left.

use thiserror::Error;

/// Result type alias for ontology operations.
pub type OntologyResult<T> = Result<T, OntologyError>;

/// Error type for all ontology operations.
#[derive(Error, Debug)]
pub enum OntologyError {
    // ========== Term Graph Errors ==========
    /// Term identifier is not present in the ontology graph.
    #[error("Unknown ontology term: {0}")]
    UnknownTerm(String),

    /// Same identifier defined twice while building the graph.
    #[error("Duplicate ontology term: {0}")]
    DuplicateTerm(String),

    /// is-a relation forms a cycle through the given term.
    #[error("Cycle detected in is-a hierarchy at term: {0}")]
    CycleDetected(String),

    // ========== Loader Errors ==========
    /// Malformed OBO content.
    #[error("OBO parse error at line {line}: {message}")]
    OboParse { line: usize, message: String },

    // ========== Encoding Errors ==========
    /// Label index outside the encoded range.
    #[error("Unknown label index {index} (encoded labels: {len})")]
    UnknownIndex { index: usize, len: usize },

    /// No valid labels remain after filtering. Compilation cannot continue.
    #[error("Working label set is empty: {0}")]
    EmptyWorkingSet(String),

    // ========== Compiled Bundle Errors ==========
    /// Matrices and label map were built from different working sets.
    #[error("Stale label encoding: {0}")]
    StaleEncoding(String),

    /// Matrix shape does not match the label map / parent axis.
    #[error("Shape mismatch for {matrix}: expected {expected}, got {actual}")]
    ShapeMismatch {
        matrix: String,
        expected: String,
        actual: String,
    },

    // ========== Configuration Errors ==========
    /// Invalid configuration parameter.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========== Serialization Errors ==========
    /// JSON (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ========== I/O Errors ==========
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for OntologyError {
    fn from(err: serde_json::Error) -> Self {
        // serde_json errors include line/column info in to_string()
        OntologyError::Serialization(err.to_string())
    }
}

impl OntologyError {
    /// Create a ShapeMismatch error from two `(rows, cols)` pairs.
    pub fn shape_mismatch(
        matrix: impl Into<String>,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> Self {
        OntologyError::ShapeMismatch {
            matrix: matrix.into(),
            expected: format!("{}x{}", expected.0, expected.1),
            actual: format!("{}x{}", actual.0, actual.1),
        }
    }
}

static_assertions::assert_impl_all!(OntologyError: Send, Sync, std::error::Error);
