//! Error type for the hierarchical loss.
//!
//! | Category | Variants | Recovery Strategy |
//! |----------|----------|-------------------|
//! | Bundle | StaleEncoding | Recompile the bundle for this working set |
//! | Validation | ShapeMismatch, UnknownIndex | Fix batch tensors |
//! | Configuration | InvalidConfig | Fix configuration |
//! | Infrastructure | Tensor, Ontology | Inspect the wrapped message |
//!
//! Degenerate batches (no leaf-labeled samples, all weights masked) are NOT
//! errors: the affected component is zero.

use mccell_ontology::OntologyError;
use thiserror::Error;

/// Result type alias for loss operations.
pub type LossResult<T> = Result<T, LossError>;

#[derive(Error, Debug)]
pub enum LossError {
    /// Bundle matrices, axes or fingerprint do not agree.
    #[error("Stale label encoding: {0}")]
    StaleEncoding(String),

    /// Batch tensor has the wrong shape.
    #[error("Shape mismatch for {input}: expected {expected}, got {actual}")]
    ShapeMismatch {
        input: String,
        expected: String,
        actual: String,
    },

    /// Ground-truth index outside `[0, N)`.
    #[error("Label index {index} out of range (encoded labels: {len})")]
    UnknownIndex { index: usize, len: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Candle operation failed.
    #[error("Tensor error: {message}")]
    Tensor { message: String },

    #[error("Ontology error: {0}")]
    Ontology(OntologyError),
}

impl From<OntologyError> for LossError {
    fn from(err: OntologyError) -> Self {
        match err {
            OntologyError::StaleEncoding(reason) => LossError::StaleEncoding(reason),
            OntologyError::ShapeMismatch {
                matrix,
                expected,
                actual,
            } => LossError::StaleEncoding(format!(
                "{matrix} is {actual}, label map expects {expected}"
            )),
            other => LossError::Ontology(other),
        }
    }
}

static_assertions::assert_impl_all!(LossError: Send, Sync, std::error::Error);
