//! Ontology-to-matrix compiler.
//!
//! Turns a term graph plus a working label set into a [`CompiledBundle`]:
//! the leaf/internal partition, the label encoding, and three relation
//! matrices over the parent axis `P`:
//!
//! | matrix          | shape  | entry = 1 when                                   |
//! |-----------------|--------|--------------------------------------------------|
//! | ancestor        | P × N  | parent is an ancestor of the label (or itself)   |
//! | marginalization | P × L  | leaf is in the with-self descendant closure      |
//! | exclusion       | N × P  | parent is NOT a strict descendant of the label   |
//!
//! `N` is the number of encoded labels and `L` the number of leaves.
//! Closures are computed against the full ontology, so a leaf reached via
//! two parents of a multi-parent node is still counted once.
//!
//! Every builder iterates its axes in identifier order, so compiling the same
//! inputs twice gives bit-identical bundles.

mod axis;
mod matrices;
mod partition;

use std::collections::BTreeSet;

use crate::bundle::{CompileDiagnostics, CompiledBundle};
use crate::config::CompileConfig;
use crate::encoder::LabelIndexMap;
use crate::error::{OntologyError, OntologyResult};
use crate::graph::{ClosureCache, OntologyGraph, TermIdx};
use crate::working_set::WorkingLabelSet;

/// Compiles relation matrices for one graph and configuration.
///
/// Closure queries are memoized for the lifetime of the compiler, so
/// compiling several working sets against one graph reuses traversals.
#[derive(Debug)]
pub struct OntologyCompiler<'g> {
    cache: ClosureCache<'g>,
    config: CompileConfig,
    diagnostics: CompileDiagnostics,
}

impl<'g> OntologyCompiler<'g> {
    /// Create a compiler.
    ///
    /// # Errors
    /// `InvalidConfig` when `config.validate()` fails.
    pub fn new(graph: &'g OntologyGraph, config: CompileConfig) -> OntologyResult<Self> {
        config.validate()?;
        Ok(Self {
            cache: ClosureCache::new(graph),
            config,
            diagnostics: CompileDiagnostics::default(),
        })
    }

    /// Graph being compiled.
    pub fn graph(&self) -> &'g OntologyGraph {
        self.cache.graph()
    }

    /// Active configuration.
    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    /// Diagnostics collected since the last [`compile`](Self::compile).
    pub fn diagnostics(&self) -> &CompileDiagnostics {
        &self.diagnostics
    }

    /// Compile a working label set.
    ///
    /// # Errors
    /// - `EmptyWorkingSet` when no label survives the ontology lookup
    /// - `InvalidConfig` from encoding (should not happen for a partition
    ///   produced here)
    pub fn compile(&mut self, working: &WorkingLabelSet) -> OntologyResult<CompiledBundle> {
        self.diagnostics = CompileDiagnostics::default();

        let (leaves, internal) = self.partition_leaves_internal(working.as_set());
        if leaves.is_empty() && internal.is_empty() {
            return Err(OntologyError::EmptyWorkingSet(format!(
                "none of the {} working labels exist in the ontology",
                working.len()
            )));
        }

        let labels = LabelIndexMap::encode(working.as_set(), &leaves, &internal)?;
        let parent_nodes = self.parent_axis(&labels);
        if parent_nodes.is_empty() {
            tracing::warn!("Parent axis is empty; parent loss will be zero");
        }

        let include_self = self.config.include_self;
        let ancestor = self.build_ancestor_matrix(&parent_nodes, labels.labels(), include_self);
        let marginalization = self.build_marginalization_matrix(&parent_nodes, labels.leaf_labels());
        let exclusion = self.build_exclusion_mask(labels.labels(), &parent_nodes);

        for (p, parent) in parent_nodes.iter().enumerate() {
            if marginalization.row(p).iter().all(|&v| v == 0) {
                tracing::warn!(term = %parent, "Parent node has no descendant leaf in the working set");
                self.diagnostics.parents_without_leaves.push(parent.clone());
            }
        }

        let (hits, misses) = self.cache.stats();
        tracing::debug!(hits, misses, "Closure cache statistics");
        tracing::info!(
            labels = labels.len(),
            leaves = labels.num_leaves(),
            internal = labels.num_internal(),
            parents = parent_nodes.len(),
            skipped = self.diagnostics.skipped_terms.len(),
            "Compiled ontology matrices"
        );

        Ok(CompiledBundle::new(
            self.config.clone(),
            labels,
            parent_nodes,
            ancestor,
            marginalization,
            exclusion,
            self.diagnostics.clone(),
        ))
    }

    /// Known arena indices of `ids` mapped to their axis position.
    /// Unknown ids are logged and left as all-zero rows/columns.
    fn axis_positions(&self, ids: &[String]) -> Vec<(TermIdx, usize)> {
        let graph = self.cache.graph();
        ids.iter()
            .enumerate()
            .filter_map(|(pos, id)| match graph.idx_of(id) {
                Ok(idx) => Some((idx, pos)),
                Err(_) => {
                    tracing::warn!(term = %id, "Matrix axis term not found in ontology");
                    None
                }
            })
            .collect()
    }
}

/// One-shot compile of `working` against `graph`.
pub fn compile(
    graph: &OntologyGraph,
    working: &WorkingLabelSet,
    config: CompileConfig,
) -> OntologyResult<CompiledBundle> {
    OntologyCompiler::new(graph, config)?.compile(working)
}

fn to_sorted_ids(graph: &OntologyGraph, indices: BTreeSet<TermIdx>) -> Vec<String> {
    // Arena order is identifier order.
    indices
        .into_iter()
        .map(|i| graph.id_at(i).to_string())
        .collect()
}
