//! Compilation parameters for relation matrices.
//!
//! Every knob that changes the compiled matrices lives here, so a compiled
//! bundle can record exactly how it was built.

use serde::{Deserialize, Serialize};

use crate::error::{OntologyError, OntologyResult};

/// Root of the hematopoietic sub-DAG ("hematopoietic cell").
pub const HEMATOPOIETIC_CELL: &str = "CL:0000988";

/// Identifier prefix for Cell Ontology terms.
pub const CL_PREFIX: &str = "CL";

/// Which ontology nodes form the parent axis (rows of the ancestor and
/// marginalization matrices, columns of the exclusion mask).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParentAxis {
    /// Internal labels of the working set.
    #[default]
    WorkingInternal,
    /// Every ontology superclass of any working label.
    AncestorClosure,
}

/// Configuration for [`crate::compiler::OntologyCompiler`].
///
/// # Example
///
/// ```
/// use mccell_ontology::config::{CompileConfig, ParentAxis};
///
/// let config = CompileConfig::default();
/// assert_eq!(config.parent_axis, ParentAxis::WorkingInternal);
/// assert!(config.include_self);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompileConfig {
    /// Parent axis selection.
    pub parent_axis: ParentAxis,

    /// Drop parent nodes that are strict ancestors of this term.
    /// An unknown term disables the filter (with a warning).
    pub upper_limit: Option<String>,

    /// Keep only `CL:` terms on the parent axis.
    pub cl_only: bool,

    /// With [`ParentAxis::AncestorClosure`], include the working labels
    /// themselves (leaves included) on the parent axis.
    pub include_leafs: bool,

    /// Ancestor matrix counts a label as its own ancestor.
    /// Default: true, so an internal ground truth is its own target.
    pub include_self: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            parent_axis: ParentAxis::WorkingInternal,
            upper_limit: None,
            cl_only: false,
            include_leafs: false,
            include_self: true,
        }
    }
}

impl CompileConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for the hematopoietic sub-DAG: CL terms only, nothing above
    /// `CL:0000988`.
    pub fn hematopoietic() -> Self {
        Self {
            upper_limit: Some(HEMATOPOIETIC_CELL.to_string()),
            cl_only: true,
            ..Default::default()
        }
    }

    /// Builder: set the parent axis.
    #[must_use]
    pub fn parent_axis(mut self, axis: ParentAxis) -> Self {
        self.parent_axis = axis;
        self
    }

    /// Builder: set the upper traversal limit.
    #[must_use]
    pub fn upper_limit(mut self, term: impl Into<String>) -> Self {
        self.upper_limit = Some(term.into());
        self
    }

    /// Builder: restrict the parent axis to CL terms.
    #[must_use]
    pub fn cl_only(mut self, cl_only: bool) -> Self {
        self.cl_only = cl_only;
        self
    }

    /// Builder: include working labels on an ancestor-closure axis.
    #[must_use]
    pub fn include_leafs(mut self, include: bool) -> Self {
        self.include_leafs = include;
        self
    }

    /// Builder: set the include-self flag of the ancestor matrix.
    #[must_use]
    pub fn include_self(mut self, include: bool) -> Self {
        self.include_self = include;
        self
    }

    /// Validate configuration parameters.
    ///
    /// # Errors
    /// `OntologyError::InvalidConfig` when `upper_limit` is blank, or when
    /// `include_leafs` is set without the ancestor-closure axis (it would
    /// be silently ignored).
    pub fn validate(&self) -> OntologyResult<()> {
        if let Some(limit) = &self.upper_limit {
            if limit.trim().is_empty() {
                return Err(OntologyError::InvalidConfig(
                    "upper_limit cannot be blank".to_string(),
                ));
            }
        }

        if self.include_leafs && self.parent_axis != ParentAxis::AncestorClosure {
            return Err(OntologyError::InvalidConfig(
                "include_leafs requires parent_axis = ancestor_closure".to_string(),
            ));
        }

        Ok(())
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> OntologyResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}
