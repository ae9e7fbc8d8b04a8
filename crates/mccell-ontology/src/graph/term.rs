//! Term records stored in the graph arena.

/// Position of a term in the graph arena.
///
/// Arena order is lexicographic by term identifier, so sorting indices
/// sorts identifiers.
pub type TermIdx = usize;

/// Direction of a closure traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Follow is-a edges upward (superclasses).
    Up,
    /// Follow is-a edges downward (subclasses).
    Down,
}

/// A node of the ontology graph.
///
/// Edges are stored as arena indices, never as references to other terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) superclasses: Vec<TermIdx>,
    pub(crate) subclasses: Vec<TermIdx>,
}

impl Term {
    /// Namespaced identifier, e.g. `CL:0000988`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name. Empty when the source had none.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// No term is a strict subclass of this one.
    pub fn is_leaf(&self) -> bool {
        self.subclasses.is_empty()
    }

    /// No superclass.
    pub fn is_root(&self) -> bool {
        self.superclasses.is_empty()
    }

    /// Identifier namespace (`CL` for `CL:0000988`).
    pub fn namespace(&self) -> &str {
        self.id.split_once(':').map(|(ns, _)| ns).unwrap_or(&self.id)
    }

    pub(crate) fn neighbors(&self, direction: Direction) -> &[TermIdx] {
        match direction {
            Direction::Up => &self.superclasses,
            Direction::Down => &self.subclasses,
        }
    }
}
