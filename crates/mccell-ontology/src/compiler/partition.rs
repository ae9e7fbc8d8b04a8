//! Leaf / internal partition of a working label set.

use std::collections::BTreeSet;

use super::OntologyCompiler;

impl OntologyCompiler<'_> {
    /// Split labels by the ontology leaf predicate.
    ///
    /// Labels missing from the ontology are skipped with a warning and
    /// recorded in [`diagnostics`](Self::diagnostics). Every known label lands
    /// in exactly one of the two returned sets.
    pub fn partition_leaves_internal(
        &mut self,
        labels: &BTreeSet<String>,
    ) -> (BTreeSet<String>, BTreeSet<String>) {
        let graph = self.cache.graph();
        let mut leaves = BTreeSet::new();
        let mut internal = BTreeSet::new();

        for label in labels {
            match graph.is_leaf(label) {
                Ok(true) => {
                    leaves.insert(label.clone());
                }
                Ok(false) => {
                    internal.insert(label.clone());
                }
                Err(err) => {
                    tracing::warn!(term = %label, error = %err, "Skipping label not found in ontology");
                    self.diagnostics.skipped_terms.push(label.clone());
                }
            }
        }

        tracing::debug!(
            leaves = leaves.len(),
            internal = internal.len(),
            skipped = self.diagnostics.skipped_terms.len(),
            "Partitioned working labels"
        );
        (leaves, internal)
    }
}
