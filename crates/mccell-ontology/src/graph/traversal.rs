//! Transitive closure traversal over is-a edges.
//!
//! Iterative BFS (no recursion, deep ontologies cannot blow the stack).
//! Every node is visited once, so multi-parent nodes in a DAG are never
//! reported twice.

use std::collections::{HashMap, VecDeque};

use super::term::{Direction, TermIdx};
use super::OntologyGraph;

/// Strict transitive closure of `start` (start excluded), sorted by index.
pub(crate) fn closure(graph: &OntologyGraph, start: TermIdx, direction: Direction) -> Vec<TermIdx> {
    let mut visited = vec![false; graph.terms.len()];
    let mut frontier: VecDeque<TermIdx> = VecDeque::new();
    let mut result: Vec<TermIdx> = Vec::new();

    visited[start] = true;
    frontier.push_back(start);

    while let Some(current) = frontier.pop_front() {
        for &next in graph.terms[current].neighbors(direction) {
            if visited[next] {
                continue;
            }
            visited[next] = true;
            result.push(next);
            frontier.push_back(next);
        }
    }

    result.sort_unstable();
    result
}

/// Memoized strict closures for repeated queries against one graph.
///
/// The compiler asks for the same ancestor/descendant sets many times
/// (once per matrix, once per label pair axis); each set is traversed once.
#[derive(Debug)]
pub struct ClosureCache<'g> {
    graph: &'g OntologyGraph,
    ancestors: HashMap<TermIdx, Vec<TermIdx>>,
    descendants: HashMap<TermIdx, Vec<TermIdx>>,
    hits: usize,
    misses: usize,
}

impl<'g> ClosureCache<'g> {
    /// Create an empty cache bound to `graph`.
    pub fn new(graph: &'g OntologyGraph) -> Self {
        Self {
            graph,
            ancestors: HashMap::new(),
            descendants: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// The graph this cache reads from.
    pub fn graph(&self) -> &'g OntologyGraph {
        self.graph
    }

    /// Strict ancestors of `idx`, sorted.
    pub fn ancestors(&mut self, idx: TermIdx) -> &[TermIdx] {
        self.lookup(idx, Direction::Up)
    }

    /// Strict descendants of `idx`, sorted.
    pub fn descendants(&mut self, idx: TermIdx) -> &[TermIdx] {
        self.lookup(idx, Direction::Down)
    }

    /// `(hits, misses)` since construction.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }

    fn lookup(&mut self, idx: TermIdx, direction: Direction) -> &[TermIdx] {
        let graph = self.graph;
        let map = match direction {
            Direction::Up => &mut self.ancestors,
            Direction::Down => &mut self.descendants,
        };
        if map.contains_key(&idx) {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        map.entry(idx)
            .or_insert_with(|| closure(graph, idx, direction))
            .as_slice()
    }
}
