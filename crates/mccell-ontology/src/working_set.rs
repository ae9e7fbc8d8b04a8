//! Working label sets.
//!
//! The distinct ground-truth labels of a dataset. Built either from an
//! explicit list or from a raw per-cell label column, where rare labels are
//! dropped and the set may be restricted to one ontology sub-DAG.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::graph::OntologyGraph;

/// Distinct label identifiers, kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingLabelSet {
    labels: BTreeSet<String>,
}

impl WorkingLabelSet {
    /// Collect distinct labels. Duplicates collapse.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from one label per observation.
    ///
    /// Keeps labels observed strictly more than `min_count` times. With
    /// `root`, labels outside `graph.sub_dag(root)` are dropped as well.
    pub fn from_observations<'a, I>(
        observations: I,
        min_count: usize,
        root: Option<&str>,
        graph: &OntologyGraph,
    ) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let counts = count_labels(observations);
        let allowed = root.map(|r| graph.sub_dag(r));

        let mut dropped_rare = 0usize;
        let mut dropped_outside = 0usize;
        let mut labels = BTreeSet::new();

        for (label, count) in counts {
            if count <= min_count {
                dropped_rare += 1;
                continue;
            }
            if let Some(allowed) = &allowed {
                if !allowed.contains(label) {
                    dropped_outside += 1;
                    continue;
                }
            }
            labels.insert(label.to_string());
        }

        tracing::info!(
            kept = labels.len(),
            dropped_rare,
            dropped_outside,
            min_count,
            root = root.unwrap_or("-"),
            "Built working label set from observations"
        );

        Self { labels }
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// No labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether `label` is in the set.
    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Labels in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Underlying set.
    pub fn as_set(&self) -> &BTreeSet<String> {
        &self.labels
    }
}

impl<S: Into<String>> FromIterator<S> for WorkingLabelSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::from_labels(iter)
    }
}

fn count_labels<'a, I>(observations: I) -> BTreeMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = BTreeMap::new();
    for label in observations {
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::OntologyGraphBuilder;

    fn graph() -> OntologyGraph {
        let mut b = OntologyGraphBuilder::new();
        for id in ["CL:0000000", "CL:0000988", "CL:0000542", "CL:0000236", "CL:0000066"] {
            b.add_term(id, "").unwrap();
        }
        b.add_is_a("CL:0000988", "CL:0000000")
            .add_is_a("CL:0000066", "CL:0000000")
            .add_is_a("CL:0000542", "CL:0000988")
            .add_is_a("CL:0000236", "CL:0000542");
        b.build().unwrap()
    }

    #[test]
    fn test_from_labels_dedups_and_sorts() {
        let set = WorkingLabelSet::from_labels(["b", "a", "b"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_min_count_is_strict() {
        let g = graph();
        let obs = ["CL:0000236", "CL:0000236", "CL:0000236", "CL:0000542", "CL:0000542"];
        let set = WorkingLabelSet::from_observations(obs, 2, None, &g);
        assert!(set.contains("CL:0000236"));
        assert!(!set.contains("CL:0000542"), "count == min_count is dropped");
    }

    #[test]
    fn test_root_restriction() {
        let g = graph();
        let obs = ["CL:0000236", "CL:0000066", "CL:0000988"];
        let set = WorkingLabelSet::from_observations(obs, 0, Some("CL:0000988"), &g);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec!["CL:0000236", "CL:0000988"]
        );
    }

    #[test]
    fn test_blank_observations_ignored() {
        let g = graph();
        let set = WorkingLabelSet::from_observations(["", "  ", "CL:0000066"], 0, None, &g);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_missing_root_empties_set() {
        let g = graph();
        let set = WorkingLabelSet::from_observations(["CL:0000236"], 0, Some("CL:9999999"), &g);
        assert!(set.is_empty());
    }
}
