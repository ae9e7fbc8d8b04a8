//! JSON snapshot of a parsed ontology.
//!
//! Parsing a full Cell Ontology release takes far longer than reading back
//! its term list, so a pipeline parses the OBO file once, writes a snapshot,
//! and loads the snapshot on every later run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OntologyError, OntologyResult};
use crate::graph::{OntologyGraph, OntologyGraphBuilder};

/// Current snapshot format version.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Serialized term record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotTerm {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_a: Vec<String>,
}

/// Serialized ontology graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OntologySnapshot {
    pub format_version: u32,
    pub terms: Vec<SnapshotTerm>,
}

impl OntologySnapshot {
    /// Capture a graph. Terms and edges come out in identifier order.
    pub fn from_graph(graph: &OntologyGraph) -> Self {
        let terms = graph
            .terms()
            .map(|term| SnapshotTerm {
                id: term.id().to_string(),
                name: term.name().to_string(),
                is_a: term
                    .superclasses
                    .iter()
                    .map(|&p| graph.id_at(p).to_string())
                    .collect(),
            })
            .collect();

        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            terms,
        }
    }

    /// Rebuild the graph.
    ///
    /// # Errors
    /// `Serialization` for an unsupported format version, plus graph
    /// construction errors.
    pub fn into_graph(self) -> OntologyResult<OntologyGraph> {
        if self.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(OntologyError::Serialization(format!(
                "unsupported snapshot format version {} (expected {})",
                self.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }

        let mut builder = OntologyGraphBuilder::new();
        for term in self.terms {
            builder.add_term(term.id.clone(), term.name)?;
            for parent in term.is_a {
                builder.add_is_a(term.id.clone(), parent);
            }
        }
        builder.build()
    }

    /// Write as JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> OntologyResult<()> {
        let file = std::fs::File::create(path.as_ref())?;
        serde_json::to_writer(std::io::BufWriter::new(file), self)?;
        Ok(())
    }

    /// Read from JSON.
    pub fn load_json(path: impl AsRef<Path>) -> OntologyResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let snapshot = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(snapshot)
    }
}
