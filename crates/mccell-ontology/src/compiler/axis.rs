//! Parent axis selection.

use std::collections::BTreeSet;

use super::{to_sorted_ids, OntologyCompiler};
use crate::config::{ParentAxis, CL_PREFIX};
use crate::encoder::LabelIndexMap;

impl OntologyCompiler<'_> {
    /// Nodes on the parent axis, in identifier order.
    ///
    /// Starts from the internal labels or from the ancestor closure of every
    /// label (see [`ParentAxis`]), then applies the `cl_only` and
    /// `upper_limit` filters. An `upper_limit` missing from the ontology
    /// disables that filter with a warning.
    pub fn parent_axis(&mut self, labels: &LabelIndexMap) -> Vec<String> {
        let graph = self.cache.graph();

        let mut nodes: BTreeSet<usize> = BTreeSet::new();
        let seeds: &[String] = match self.config.parent_axis {
            ParentAxis::WorkingInternal => labels.internal_labels(),
            ParentAxis::AncestorClosure => labels.labels(),
        };
        for label in seeds {
            let Ok(idx) = graph.idx_of(label) else {
                continue;
            };
            match self.config.parent_axis {
                ParentAxis::WorkingInternal => {
                    nodes.insert(idx);
                }
                ParentAxis::AncestorClosure => {
                    if self.config.include_leafs {
                        nodes.insert(idx);
                    }
                    nodes.extend(self.cache.ancestors(idx).iter().copied());
                }
            }
        }

        if self.config.cl_only {
            nodes.retain(|&i| graph.terms[i].namespace() == CL_PREFIX);
        }

        if let Some(limit) = self.config.upper_limit.as_deref() {
            match graph.idx_of(limit) {
                Ok(limit_idx) => {
                    let above = self.cache.ancestors(limit_idx);
                    nodes.retain(|i| above.binary_search(i).is_err());
                }
                Err(_) => {
                    tracing::warn!(term = %limit, "Upper limit not found in ontology; not filtering");
                    self.diagnostics.unknown_upper_limit = Some(limit.to_string());
                }
            }
        }

        let axis = to_sorted_ids(graph, nodes);
        tracing::debug!(
            mode = ?self.config.parent_axis,
            parents = axis.len(),
            "Selected parent axis"
        );
        axis
    }
}
