//! Construction of an immutable [`OntologyGraph`].

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::error::{OntologyError, OntologyResult};

use super::term::{Term, TermIdx};
use super::OntologyGraph;

/// Collects terms and is-a edges, then freezes them into an [`OntologyGraph`].
///
/// Edges may reference terms added later. Edges whose endpoints never get
/// defined are dropped with a warning at [`build`](Self::build) time, since
/// ontology releases routinely reference terms from imported ontologies.
///
/// # Example
///
/// ```
/// use mccell_ontology::graph::OntologyGraphBuilder;
///
/// let mut builder = OntologyGraphBuilder::new();
/// builder.add_term("CL:0000000", "cell")?;
/// builder.add_term("CL:0000988", "hematopoietic cell")?;
/// builder.add_is_a("CL:0000988", "CL:0000000");
///
/// let graph = builder.build()?;
/// assert!(graph.is_leaf("CL:0000988")?);
/// # Ok::<(), mccell_ontology::OntologyError>(())
/// ```
#[derive(Debug, Default)]
pub struct OntologyGraphBuilder {
    terms: Vec<(String, String)>,
    seen: HashMap<String, usize>,
    edges: Vec<(String, String)>,
}

impl OntologyGraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a term.
    ///
    /// # Errors
    /// `DuplicateTerm` if `id` was already added.
    pub fn add_term(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> OntologyResult<&mut Self> {
        let id = id.into();
        if self.seen.contains_key(&id) {
            return Err(OntologyError::DuplicateTerm(id));
        }
        self.seen.insert(id.clone(), self.terms.len());
        self.terms.push((id, name.into()));
        Ok(self)
    }

    /// Record `child` is-a `parent`.
    pub fn add_is_a(&mut self, child: impl Into<String>, parent: impl Into<String>) -> &mut Self {
        self.edges.push((child.into(), parent.into()));
        self
    }

    /// Number of terms added so far.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Freeze into an immutable graph.
    ///
    /// Terms are re-ordered lexicographically by identifier so arena order
    /// never depends on insertion order.
    ///
    /// # Errors
    /// `CycleDetected` if the is-a relation is not acyclic.
    pub fn build(self) -> OntologyResult<OntologyGraph> {
        let mut entries = self.terms;
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let index: HashMap<String, TermIdx> = entries
            .iter()
            .enumerate()
            .map(|(idx, (id, _))| (id.clone(), idx))
            .collect();

        let mut parent_sets: Vec<BTreeSet<TermIdx>> = vec![BTreeSet::new(); entries.len()];
        let mut child_sets: Vec<BTreeSet<TermIdx>> = vec![BTreeSet::new(); entries.len()];
        let mut dangling = 0usize;

        for (child, parent) in &self.edges {
            let (Some(&c), Some(&p)) = (index.get(child), index.get(parent)) else {
                tracing::warn!(child = %child, parent = %parent, "Dropping is-a edge to undefined term");
                dangling += 1;
                continue;
            };
            if c == p {
                return Err(OntologyError::CycleDetected(child.clone()));
            }
            parent_sets[c].insert(p);
            child_sets[p].insert(c);
        }

        let terms: Vec<Term> = entries
            .into_iter()
            .zip(parent_sets.into_iter().zip(child_sets))
            .map(|((id, name), (parents, children))| Term {
                id,
                name,
                superclasses: parents.into_iter().collect(),
                subclasses: children.into_iter().collect(),
            })
            .collect();

        check_acyclic(&terms)?;

        tracing::debug!(
            terms = terms.len(),
            edges = self.edges.len() - dangling,
            dangling,
            "Ontology graph built"
        );

        Ok(OntologyGraph { terms, index })
    }
}

/// Kahn's algorithm over superclass edges. Any term left unprocessed sits
/// on (or below) a cycle; the smallest such identifier is reported.
fn check_acyclic(terms: &[Term]) -> OntologyResult<()> {
    let mut in_degree: Vec<usize> = terms.iter().map(|t| t.superclasses.len()).collect();
    let mut queue: VecDeque<TermIdx> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, &d)| d == 0)
        .map(|(idx, _)| idx)
        .collect();
    let mut processed = 0usize;

    while let Some(idx) = queue.pop_front() {
        processed += 1;
        for &child in &terms[idx].subclasses {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                queue.push_back(child);
            }
        }
    }

    if processed == terms.len() {
        return Ok(());
    }

    let offender = in_degree
        .iter()
        .position(|&d| d > 0)
        .map(|idx| terms[idx].id.clone())
        .unwrap_or_default();
    tracing::error!(term = %offender, "is-a hierarchy contains a cycle");
    Err(OntologyError::CycleDetected(offender))
}
