//! Compiled bundle: label map, parent axis and relation matrices.
//!
//! A bundle is the only thing the loss evaluator reads. It carries a
//! content fingerprint over the encoding and matrices, so a bundle whose
//! pieces were mixed from different working sets, or edited on disk, is
//! rejected by [`CompiledBundle::validate`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::CompileConfig;
use crate::encoder::LabelIndexMap;
use crate::error::{OntologyError, OntologyResult};
use crate::matrix::RelationMatrix;

/// Non-fatal findings from one compile run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileDiagnostics {
    /// Working labels missing from the ontology.
    pub skipped_terms: Vec<String>,
    /// Parent nodes whose marginalization row is all zero.
    pub parents_without_leaves: Vec<String>,
    /// Configured upper limit that was not found (filter disabled).
    pub unknown_upper_limit: Option<String>,
}

impl CompileDiagnostics {
    /// Nothing was skipped or flagged.
    pub fn is_clean(&self) -> bool {
        self.skipped_terms.is_empty()
            && self.parents_without_leaves.is_empty()
            && self.unknown_upper_limit.is_none()
    }
}

/// Everything the hierarchical loss needs for one working set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledBundle {
    config: CompileConfig,
    labels: LabelIndexMap,
    parent_nodes: Vec<String>,
    /// P × N
    ancestor: RelationMatrix,
    /// P × L
    marginalization: RelationMatrix,
    /// N × P
    exclusion: RelationMatrix,
    diagnostics: CompileDiagnostics,
    fingerprint: String,
}

impl CompiledBundle {
    pub(crate) fn new(
        config: CompileConfig,
        labels: LabelIndexMap,
        parent_nodes: Vec<String>,
        ancestor: RelationMatrix,
        marginalization: RelationMatrix,
        exclusion: RelationMatrix,
        diagnostics: CompileDiagnostics,
    ) -> Self {
        let mut bundle = Self {
            config,
            labels,
            parent_nodes,
            ancestor,
            marginalization,
            exclusion,
            diagnostics,
            fingerprint: String::new(),
        };
        bundle.fingerprint = bundle.compute_fingerprint();
        bundle
    }

    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    pub fn labels(&self) -> &LabelIndexMap {
        &self.labels
    }

    /// Parent axis, identifier order.
    pub fn parent_nodes(&self) -> &[String] {
        &self.parent_nodes
    }

    /// Ancestor matrix, parents × labels.
    pub fn ancestor(&self) -> &RelationMatrix {
        &self.ancestor
    }

    /// Marginalization matrix, parents × leaves.
    pub fn marginalization(&self) -> &RelationMatrix {
        &self.marginalization
    }

    /// Exclusion mask, labels × parents.
    pub fn exclusion(&self) -> &RelationMatrix {
        &self.exclusion
    }

    pub fn diagnostics(&self) -> &CompileDiagnostics {
        &self.diagnostics
    }

    /// SHA-256 hex digest over encoding, parent axis, matrices and
    /// `include_self`.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// `L`.
    pub fn num_leaves(&self) -> usize {
        self.labels.num_leaves()
    }

    /// `N = L + I`.
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// `P`.
    pub fn num_parents(&self) -> usize {
        self.parent_nodes.len()
    }

    /// Parent nodes the label counts as ancestors (its ancestor column).
    ///
    /// # Errors
    /// `UnknownTerm` when the label is not encoded.
    pub fn ancestor_targets(&self, label: &str) -> OntologyResult<Vec<&str>> {
        let c = self.labels.index_of(label)?;
        Ok(self
            .parent_nodes
            .iter()
            .enumerate()
            .filter(|(p, _)| self.ancestor.get(*p, c) == 1)
            .map(|(_, id)| id.as_str())
            .collect())
    }

    /// Check axes against the label map and parent axis, then the
    /// fingerprint.
    ///
    /// # Errors
    /// `ShapeMismatch` or `StaleEncoding`.
    pub fn validate(&self) -> OntologyResult<()> {
        let labels = self.labels.labels();
        let leaves = self.labels.leaf_labels();
        let parents = &self.parent_nodes;

        self.ancestor.check_axes("ancestor", parents, labels)?;
        self.marginalization
            .check_axes("marginalization", parents, leaves)?;
        self.exclusion.check_axes("exclusion", labels, parents)?;

        let actual = self.compute_fingerprint();
        if actual != self.fingerprint {
            return Err(OntologyError::StaleEncoding(format!(
                "fingerprint mismatch (stored {}, computed {})",
                self.fingerprint, actual
            )));
        }
        Ok(())
    }

    /// Write as JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> OntologyResult<()> {
        let file = std::fs::File::create(path.as_ref())?;
        serde_json::to_writer(std::io::BufWriter::new(file), self)?;
        tracing::info!(
            path = %path.as_ref().display(),
            fingerprint = %self.fingerprint,
            "Saved compiled bundle"
        );
        Ok(())
    }

    /// Read from JSON and validate.
    pub fn load_json(path: impl AsRef<Path>) -> OntologyResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let bundle: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        bundle.validate()?;
        Ok(bundle)
    }

    fn compute_fingerprint(&self) -> String {
        let mut hasher = Sha256::new();

        hasher.update((self.labels.num_leaves() as u64).to_le_bytes());
        hash_ids(&mut hasher, self.labels.labels());
        hash_ids(&mut hasher, &self.parent_nodes);
        hasher.update([u8::from(self.config.include_self)]);

        for matrix in [&self.ancestor, &self.marginalization, &self.exclusion] {
            let (rows, cols) = matrix.shape();
            hasher.update((rows as u64).to_le_bytes());
            hasher.update((cols as u64).to_le_bytes());
            hasher.update(matrix.as_slice());
        }

        format!("{:x}", hasher.finalize())
    }
}

fn hash_ids(hasher: &mut Sha256, ids: &[String]) {
    hasher.update((ids.len() as u64).to_le_bytes());
    for id in ids {
        hasher.update(id.as_bytes());
        hasher.update([0u8]);
    }
}

static_assertions::assert_impl_all!(CompiledBundle: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::graph::{OntologyGraph, OntologyGraphBuilder};
    use crate::working_set::WorkingLabelSet;

    fn graph() -> OntologyGraph {
        let mut b = OntologyGraphBuilder::new();
        for id in ["CL:root", "CL:mid", "CL:a", "CL:b"] {
            b.add_term(id, "").unwrap();
        }
        b.add_is_a("CL:mid", "CL:root")
            .add_is_a("CL:a", "CL:mid")
            .add_is_a("CL:b", "CL:mid");
        b.build().unwrap()
    }

    fn bundle() -> CompiledBundle {
        let working = WorkingLabelSet::from_labels(["CL:a", "CL:b", "CL:mid"]);
        compile(&graph(), &working, CompileConfig::default()).unwrap()
    }

    #[test]
    fn test_fresh_bundle_validates() {
        let b = bundle();
        assert!(b.validate().is_ok());
        assert_eq!(b.fingerprint().len(), 64);
    }

    #[test]
    fn test_tampered_matrix_is_stale() {
        let mut b = bundle();
        b.ancestor.set(0, 0, 0);
        assert!(matches!(b.validate(), Err(OntologyError::StaleEncoding(_))));
    }

    #[test]
    fn test_swapped_labels_are_stale() {
        let mut b = bundle();
        let other = WorkingLabelSet::from_labels(["CL:a", "CL:mid"]);
        b.labels = compile(&graph(), &other, CompileConfig::default())
            .unwrap()
            .labels;
        assert!(b.validate().is_err());
    }

    #[test]
    fn test_ancestor_targets() {
        let b = bundle();
        assert_eq!(b.ancestor_targets("CL:a").unwrap(), vec!["CL:mid"]);
        assert_eq!(b.ancestor_targets("CL:mid").unwrap(), vec!["CL:mid"]);
    }

    #[test]
    fn test_json_round_trip_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        let b = bundle();
        b.save_json(&path).unwrap();

        let loaded = CompiledBundle::load_json(&path).unwrap();
        assert_eq!(loaded, b);
    }

    #[test]
    fn test_load_rejects_edited_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        bundle().save_json(&path).unwrap();

        let mut json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        json["fingerprint"] = serde_json::Value::String("0".repeat(64));
        std::fs::write(&path, json.to_string()).unwrap();

        assert!(matches!(
            CompiledBundle::load_json(&path),
            Err(OntologyError::StaleEncoding(_))
        ));
    }
}
