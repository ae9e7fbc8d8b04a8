//! Immutable ontology term graph.
//!
//! An arena of [`Term`] records indexed by identifier. Edges are arena
//! indices, so parent/child links never form ownership cycles. The graph is
//! built once (see [`OntologyGraphBuilder`] and [`crate::loader`]) and then
//! only read; it is `Send + Sync` and can be shared freely.
//!
//! # Queries
//!
//! - lookup: [`OntologyGraph::get`], [`OntologyGraph::contains`]
//! - leaf predicate: [`OntologyGraph::is_leaf`]
//! - direct edges: [`OntologyGraph::direct_superclasses`], [`OntologyGraph::direct_subclasses`]
//! - transitive closure with a with-self toggle: [`OntologyGraph::superclasses`],
//!   [`OntologyGraph::subclasses`]
//! - sub-DAG extraction: [`OntologyGraph::sub_dag`], [`OntologyGraph::classify_within`]
//!
//! Unknown identifiers always produce [`OntologyError::UnknownTerm`].

mod builder;
mod term;
mod traversal;


use std::collections::{BTreeSet, HashMap};

use crate::error::{OntologyError, OntologyResult};

pub use builder::OntologyGraphBuilder;
pub use term::{Direction, Term, TermIdx};
pub use traversal::ClosureCache;

/// Frozen is-a DAG of ontology terms.
#[derive(Debug, Clone)]
pub struct OntologyGraph {
    pub(crate) terms: Vec<Term>,
    pub(crate) index: HashMap<String, TermIdx>,
}

impl OntologyGraph {
    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Graph has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether `id` is defined.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Look up a term.
    pub fn get(&self, id: &str) -> OntologyResult<&Term> {
        self.idx_of(id).map(|idx| &self.terms[idx])
    }

    /// Human-readable name of a term.
    pub fn name(&self, id: &str) -> OntologyResult<&str> {
        self.get(id).map(Term::name)
    }

    /// Leaf predicate: no term is a strict subclass of `id`.
    pub fn is_leaf(&self, id: &str) -> OntologyResult<bool> {
        self.get(id).map(Term::is_leaf)
    }

    /// All terms in identifier order.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter()
    }

    /// Terms without superclasses, in identifier order.
    pub fn roots(&self) -> Vec<&str> {
        self.terms
            .iter()
            .filter(|t| t.is_root())
            .map(Term::id)
            .collect()
    }

    /// Direct superclasses of `id`, sorted.
    pub fn direct_superclasses(&self, id: &str) -> OntologyResult<Vec<&str>> {
        let term = self.get(id)?;
        Ok(self.ids(&term.superclasses))
    }

    /// Direct subclasses of `id`, sorted.
    pub fn direct_subclasses(&self, id: &str) -> OntologyResult<Vec<&str>> {
        let term = self.get(id)?;
        Ok(self.ids(&term.subclasses))
    }

    /// Transitive superclasses of `id`, sorted, optionally including `id`.
    pub fn superclasses(&self, id: &str, with_self: bool) -> OntologyResult<Vec<&str>> {
        self.closure_ids(id, Direction::Up, with_self)
    }

    /// Transitive subclasses of `id`, sorted, optionally including `id`.
    pub fn subclasses(&self, id: &str, with_self: bool) -> OntologyResult<Vec<&str>> {
        self.closure_ids(id, Direction::Down, with_self)
    }

    /// Whether `ancestor` is a strict superclass of `descendant`.
    pub fn is_ancestor(&self, ancestor: &str, descendant: &str) -> OntologyResult<bool> {
        let a = self.idx_of(ancestor)?;
        let d = self.idx_of(descendant)?;
        if a == d {
            return Ok(false);
        }
        Ok(traversal::closure(self, d, Direction::Up)
            .binary_search(&a)
            .is_ok())
    }

    /// Descendants of `root` including itself.
    ///
    /// A missing root yields an empty set (with a warning), so a stale root
    /// identifier filters everything out instead of aborting the caller.
    pub fn sub_dag(&self, root: &str) -> BTreeSet<String> {
        match self.subclasses(root, true) {
            Ok(ids) => ids.into_iter().map(str::to_string).collect(),
            Err(_) => {
                tracing::warn!(root = %root, "Sub-DAG root not found in ontology");
                BTreeSet::new()
            }
        }
    }

    /// Split `nodes` into `(leaves, internal)` relative to the subset itself:
    /// a node is internal iff one of its strict descendants is in `nodes`.
    ///
    /// Unknown nodes are treated as leaves of the subset.
    pub fn classify_within(&self, nodes: &BTreeSet<String>) -> (BTreeSet<String>, BTreeSet<String>) {
        let mut leaves = BTreeSet::new();
        let mut internal = BTreeSet::new();

        for node in nodes {
            let has_child_in_subset = match self.idx_of(node) {
                Ok(idx) => traversal::closure(self, idx, Direction::Down)
                    .into_iter()
                    .any(|d| nodes.contains(&self.terms[d].id)),
                Err(_) => false,
            };
            if has_child_in_subset {
                internal.insert(node.clone());
            } else {
                leaves.insert(node.clone());
            }
        }

        (leaves, internal)
    }

    pub(crate) fn idx_of(&self, id: &str) -> OntologyResult<TermIdx> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| OntologyError::UnknownTerm(id.to_string()))
    }

    pub(crate) fn id_at(&self, idx: TermIdx) -> &str {
        &self.terms[idx].id
    }

    fn ids(&self, indices: &[TermIdx]) -> Vec<&str> {
        indices.iter().map(|&i| self.id_at(i)).collect()
    }

    fn closure_ids(
        &self,
        id: &str,
        direction: Direction,
        with_self: bool,
    ) -> OntologyResult<Vec<&str>> {
        let start = self.idx_of(id)?;
        let mut indices = traversal::closure(self, start, direction);
        if with_self {
            // Keep sorted: arena order is identifier order.
            let pos = indices.partition_point(|&i| i < start);
            indices.insert(pos, start);
        }
        Ok(self.ids(&indices))
    }
}

static_assertions::assert_impl_all!(OntologyGraph: Send, Sync);
