//! Signed-index term catalog.
//!
//! A metadata table over the whole ontology: each term gets a counter value
//! starting at 1 in identifier order, positive for leaves and negative for
//! internal terms, so the sign alone tells a consumer whether a term is a
//! leaf. Export only; the loss uses [`crate::encoder::LabelIndexMap`].

use serde::{Deserialize, Serialize};

use crate::config::CL_PREFIX;
use crate::graph::OntologyGraph;

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermMetadata {
    pub id: String,
    pub name: String,
    /// `+k` for a leaf, `-k` for an internal term, `k >= 1`.
    pub signed_index: i64,
}

impl TermMetadata {
    pub fn is_leaf(&self) -> bool {
        self.signed_index > 0
    }
}

/// Build the catalog, optionally restricted to `CL:` terms.
///
/// The counter only advances over terms that pass the filter.
pub fn build_catalog(graph: &OntologyGraph, cl_only: bool) -> Vec<TermMetadata> {
    let rows: Vec<TermMetadata> = graph
        .terms()
        .filter(|t| !cl_only || t.namespace() == CL_PREFIX)
        .zip(1i64..)
        .map(|(term, k)| TermMetadata {
            id: term.id().to_string(),
            name: term.name().to_string(),
            signed_index: if term.is_leaf() { k } else { -k },
        })
        .collect();

    tracing::debug!(terms = rows.len(), cl_only, "Built term catalog");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::OntologyGraphBuilder;

    fn graph() -> OntologyGraph {
        let mut b = OntologyGraphBuilder::new();
        b.add_term("CL:0000000", "cell").unwrap();
        b.add_term("CL:0000542", "lymphocyte").unwrap();
        b.add_term("GO:0005623", "cell part").unwrap();
        b.add_term("CL:0000236", "B cell").unwrap();
        b.add_is_a("CL:0000542", "CL:0000000")
            .add_is_a("CL:0000236", "CL:0000542");
        b.build().unwrap()
    }

    #[test]
    fn test_signed_indices_follow_identifier_order() {
        let catalog = build_catalog(&graph(), false);
        let pairs: Vec<(&str, i64)> = catalog
            .iter()
            .map(|m| (m.id.as_str(), m.signed_index))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("CL:0000000", -1),
                ("CL:0000236", 2),
                ("CL:0000542", -3),
                ("GO:0005623", 4),
            ]
        );
    }

    #[test]
    fn test_cl_only_skips_other_namespaces() {
        let catalog = build_catalog(&graph(), true);
        assert_eq!(catalog.len(), 3);
        assert!(catalog.iter().all(|m| m.id.starts_with("CL:")));
        assert!(catalog[1].is_leaf());
        assert_eq!(catalog[1].name, "B cell");
    }
}
