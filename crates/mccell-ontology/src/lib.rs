//! Cell Ontology term graph and relation-matrix compiler.
//!
//! This crate turns the Cell Ontology (an is-a DAG of cell types) into the
//! dense matrices a hierarchical classification loss needs, for one working
//! set of ground-truth labels.
//!
//! # Architecture
//!
//! - **error**: `OntologyError` and `OntologyResult`
//! - **config**: `CompileConfig` (parent axis, upper limit, CL-only filter)
//! - **graph**: immutable arena DAG with closure queries
//! - **loader**: OBO parser and JSON snapshots
//! - **working_set**: distinct labels, with count and sub-DAG filtering
//! - **encoder**: leaf-then-internal label encoding
//! - **matrix**: labelled 0/1 matrices
//! - **compiler**: partition, parent axis, ancestor / marginalization / exclusion
//! - **bundle**: compiled output with fingerprint validation
//! - **catalog**: signed-index metadata table
//!
//! # Example
//!
//! ```
//! use mccell_ontology::{compile, CompileConfig, OntologyGraphBuilder, WorkingLabelSet};
//! use mccell_ontology::error::OntologyResult;
//!
//! fn example() -> OntologyResult<()> {
//!     let mut builder = OntologyGraphBuilder::new();
//!     builder.add_term("CL:0000542", "lymphocyte")?;
//!     builder.add_term("CL:0000236", "B cell")?;
//!     builder.add_is_a("CL:0000236", "CL:0000542");
//!     let graph = builder.build()?;
//!
//!     let working = WorkingLabelSet::from_labels(["CL:0000236", "CL:0000542"]);
//!     let bundle = compile(&graph, &working, CompileConfig::default())?;
//!
//!     assert_eq!(bundle.labels().index_of("CL:0000236")?, 0);
//!     assert_eq!(bundle.labels().index_of("CL:0000542")?, 1);
//!     assert_eq!(bundle.marginalization().get(0, 0), 1);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod bundle;
pub mod catalog;
pub mod compiler;
pub mod config;
pub mod encoder;
pub mod error;
pub mod graph;
pub mod loader;
pub mod matrix;
pub mod working_set;

// Re-exports for convenience
pub use bundle::{CompileDiagnostics, CompiledBundle};
pub use catalog::{build_catalog, TermMetadata};
pub use compiler::{compile, OntologyCompiler};
pub use config::{CompileConfig, ParentAxis, CL_PREFIX, HEMATOPOIETIC_CELL};
pub use encoder::LabelIndexMap;
pub use error::{OntologyError, OntologyResult};
pub use graph::{ClosureCache, Direction, OntologyGraph, OntologyGraphBuilder, Term, TermIdx};
pub use loader::{load_obo_file, load_ontology, parse_obo, OntologySnapshot};
pub use matrix::RelationMatrix;
pub use working_set::WorkingLabelSet;
