//! Relation matrix builders.

use std::collections::HashMap;

use super::OntologyCompiler;
use crate::graph::TermIdx;
use crate::matrix::RelationMatrix;

impl OntologyCompiler<'_> {
    /// `matrix[p, c] = 1` when row term `p` is an ancestor of column term `c`.
    ///
    /// With `include_self`, a term present on both axes is its own ancestor.
    /// A root column is therefore all-zero apart from its own entry.
    pub fn build_ancestor_matrix(
        &mut self,
        rows: &[String],
        cols: &[String],
        include_self: bool,
    ) -> RelationMatrix {
        let row_pos: HashMap<TermIdx, usize> = self.axis_positions(rows).into_iter().collect();
        let col_pos = self.axis_positions(cols);
        let mut matrix = RelationMatrix::zeros(rows.to_vec(), cols.to_vec());

        for (c_idx, c) in col_pos {
            if include_self {
                if let Some(&r) = row_pos.get(&c_idx) {
                    matrix.set(r, c, 1);
                }
            }
            for ancestor in self.cache.ancestors(c_idx) {
                if let Some(&r) = row_pos.get(ancestor) {
                    matrix.set(r, c, 1);
                }
            }
        }

        matrix
    }

    /// `matrix[p, l] = 1` when leaf `l` is in the with-self descendant
    /// closure of `p`.
    ///
    /// Each row comes straight from the closure of its own node, never from
    /// summing child rows, so shared descendants are counted once.
    pub fn build_marginalization_matrix(
        &mut self,
        parents: &[String],
        leaves: &[String],
    ) -> RelationMatrix {
        let row_pos = self.axis_positions(parents);
        let col_pos: HashMap<TermIdx, usize> = self.axis_positions(leaves).into_iter().collect();
        let mut matrix = RelationMatrix::zeros(parents.to_vec(), leaves.to_vec());

        for (p_idx, r) in row_pos {
            if let Some(&c) = col_pos.get(&p_idx) {
                matrix.set(r, c, 1);
            }
            for descendant in self.cache.descendants(p_idx) {
                if let Some(&c) = col_pos.get(descendant) {
                    matrix.set(r, c, 1);
                }
            }
        }

        matrix
    }

    /// Exclusion mask: 1 everywhere except `matrix[t, p] = 0` when `p` is a
    /// strict descendant of the ground-truth label `t`.
    pub fn build_exclusion_mask(&mut self, labels: &[String], parents: &[String]) -> RelationMatrix {
        let row_pos = self.axis_positions(labels);
        let col_pos: HashMap<TermIdx, usize> = self.axis_positions(parents).into_iter().collect();
        let mut matrix = RelationMatrix::ones(labels.to_vec(), parents.to_vec());

        for (t_idx, r) in row_pos {
            for descendant in self.cache.descendants(t_idx) {
                if let Some(&c) = col_pos.get(descendant) {
                    matrix.set(r, c, 0);
                }
            }
        }

        matrix
    }
}
