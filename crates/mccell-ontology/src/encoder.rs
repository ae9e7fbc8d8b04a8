//! Label encoding.
//!
//! Leaves take the contiguous low range `[0, L)`, internal labels
//! `[L, L + I)`, each block in lexicographic order. A sample is therefore
//! leaf-labeled iff its index is below [`LabelIndexMap::num_leaves`].

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{OntologyError, OntologyResult};

/// One-to-one label ↔ index map for a single working set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncodedLabels", into = "EncodedLabels")]
pub struct LabelIndexMap {
    labels: Vec<String>,
    num_leaves: usize,
    index: HashMap<String, usize>,
}

#[derive(Serialize, Deserialize)]
struct EncodedLabels {
    num_leaves: usize,
    labels: Vec<String>,
}

impl TryFrom<EncodedLabels> for LabelIndexMap {
    type Error = String;

    fn try_from(raw: EncodedLabels) -> Result<Self, Self::Error> {
        if raw.num_leaves > raw.labels.len() {
            return Err(format!(
                "num_leaves {} exceeds label count {}",
                raw.num_leaves,
                raw.labels.len()
            ));
        }
        let distinct: BTreeSet<&String> = raw.labels.iter().collect();
        if distinct.len() != raw.labels.len() {
            return Err("duplicate label in encoding".to_string());
        }
        Ok(Self::from_ordered(raw.labels, raw.num_leaves))
    }
}

impl From<LabelIndexMap> for EncodedLabels {
    fn from(map: LabelIndexMap) -> Self {
        Self {
            num_leaves: map.num_leaves,
            labels: map.labels,
        }
    }
}

impl LabelIndexMap {
    /// Encode a partitioned working set.
    ///
    /// # Errors
    /// - `InvalidConfig` if a label is both leaf and internal, or is not part
    ///   of `working_labels`
    /// - `EmptyWorkingSet` if both partitions are empty
    pub fn encode(
        working_labels: &BTreeSet<String>,
        leaf_labels: &BTreeSet<String>,
        internal_labels: &BTreeSet<String>,
    ) -> OntologyResult<Self> {
        if let Some(both) = leaf_labels.intersection(internal_labels).next() {
            return Err(OntologyError::InvalidConfig(format!(
                "label {both} is both leaf and internal"
            )));
        }
        if let Some(stray) = leaf_labels
            .iter()
            .chain(internal_labels)
            .find(|l| !working_labels.contains(*l))
        {
            return Err(OntologyError::InvalidConfig(format!(
                "label {stray} is not in the working set"
            )));
        }
        if leaf_labels.is_empty() && internal_labels.is_empty() {
            return Err(OntologyError::EmptyWorkingSet(
                "nothing to encode".to_string(),
            ));
        }

        // BTreeSet iteration is already lexicographic.
        let labels: Vec<String> = leaf_labels
            .iter()
            .chain(internal_labels.iter())
            .cloned()
            .collect();

        Ok(Self::from_ordered(labels, leaf_labels.len()))
    }

    fn from_ordered(labels: Vec<String>, num_leaves: usize) -> Self {
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();
        Self {
            labels,
            num_leaves,
            index,
        }
    }

    /// Index of `label`.
    ///
    /// # Errors
    /// `UnknownTerm` when the label was not encoded.
    pub fn index_of(&self, label: &str) -> OntologyResult<usize> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| OntologyError::UnknownTerm(label.to_string()))
    }

    /// Label at `index`.
    ///
    /// # Errors
    /// `UnknownIndex` when `index >= len()`.
    pub fn decode(&self, index: usize) -> OntologyResult<&str> {
        self.labels
            .get(index)
            .map(String::as_str)
            .ok_or(OntologyError::UnknownIndex {
                index,
                len: self.labels.len(),
            })
    }

    /// Encode a raw label column.
    pub fn encode_batch<'a, I>(&self, labels: I) -> OntologyResult<Vec<u32>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        labels
            .into_iter()
            .map(|label| {
                let idx = self.index_of(label)?;
                u32::try_from(idx).map_err(|_| OntologyError::UnknownIndex {
                    index: idx,
                    len: self.labels.len(),
                })
            })
            .collect()
    }

    /// `L`.
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// `I`.
    pub fn num_internal(&self) -> usize {
        self.labels.len() - self.num_leaves
    }

    /// `L + I`.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Index falls in the leaf range.
    pub fn is_leaf_index(&self, index: usize) -> bool {
        index < self.num_leaves
    }

    /// All labels in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Leaf labels, indices `[0, L)`.
    pub fn leaf_labels(&self) -> &[String] {
        &self.labels[..self.num_leaves]
    }

    /// Internal labels, indices `[L, L + I)`.
    pub fn internal_labels(&self) -> &[String] {
        &self.labels[self.num_leaves..]
    }
}
