//! Dense 0/1 relation matrices with labelled axes.

use serde::{Deserialize, Serialize};

use crate::error::{OntologyError, OntologyResult};

/// Row-major 0/1 matrix whose rows and columns are named by term ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationMatrix {
    rows: Vec<String>,
    cols: Vec<String>,
    data: Vec<u8>,
}

impl RelationMatrix {
    /// All-zero matrix.
    pub fn zeros(rows: Vec<String>, cols: Vec<String>) -> Self {
        let data = vec![0; rows.len() * cols.len()];
        Self { rows, cols, data }
    }

    /// All-one matrix.
    pub fn ones(rows: Vec<String>, cols: Vec<String>) -> Self {
        let data = vec![1; rows.len() * cols.len()];
        Self { rows, cols, data }
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }

    /// Row axis labels.
    pub fn row_ids(&self) -> &[String] {
        &self.rows
    }

    /// Column axis labels.
    pub fn col_ids(&self) -> &[String] {
        &self.cols
    }

    /// Entry at `(r, c)`. Panics when out of bounds, like slice indexing.
    pub fn get(&self, r: usize, c: usize) -> u8 {
        self.data[self.offset(r, c)]
    }

    pub(crate) fn set(&mut self, r: usize, c: usize, value: u8) {
        let offset = self.offset(r, c);
        self.data[offset] = value;
    }

    /// Entry by axis ids.
    ///
    /// # Errors
    /// `UnknownTerm` when either id is not on its axis.
    pub fn get_by_id(&self, row: &str, col: &str) -> OntologyResult<u8> {
        let r = position(&self.rows, row)?;
        let c = position(&self.cols, col)?;
        Ok(self.get(r, c))
    }

    /// Row `r` as a slice.
    pub fn row(&self, r: usize) -> &[u8] {
        let width = self.cols.len();
        &self.data[r * width..(r + 1) * width]
    }

    /// Column `c`, copied.
    pub fn column(&self, c: usize) -> Vec<u8> {
        (0..self.rows.len()).map(|r| self.get(r, c)).collect()
    }

    /// Raw row-major data.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Row-major data as `f32`, ready for a tensor.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.data.iter().map(|&v| f32::from(v)).collect()
    }

    /// Swapped axes.
    pub fn transposed(&self) -> Self {
        let (n_rows, n_cols) = self.shape();
        let mut data = vec![0; self.data.len()];
        for r in 0..n_rows {
            for c in 0..n_cols {
                data[c * n_rows + r] = self.data[r * n_cols + c];
            }
        }
        Self {
            rows: self.cols.clone(),
            cols: self.rows.clone(),
            data,
        }
    }

    /// Number of ones.
    pub fn count_ones(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    /// Check shape and axis order.
    ///
    /// # Errors
    /// `ShapeMismatch` on a size difference or corrupt data length,
    /// `StaleEncoding` when the sizes agree but the axis ids differ.
    pub fn check_axes(&self, name: &str, rows: &[String], cols: &[String]) -> OntologyResult<()> {
        let expected = (rows.len(), cols.len());
        if self.shape() != expected || self.data.len() != expected.0 * expected.1 {
            return Err(OntologyError::shape_mismatch(name, expected, self.shape()));
        }
        if self.rows != rows || self.cols != cols {
            return Err(OntologyError::StaleEncoding(format!(
                "{name} axes do not match the label map"
            )));
        }
        if self.data.iter().any(|&v| v > 1) {
            return Err(OntologyError::StaleEncoding(format!(
                "{name} holds non-binary entries"
            )));
        }
        Ok(())
    }

    fn offset(&self, r: usize, c: usize) -> usize {
        assert!(r < self.rows.len() && c < self.cols.len(), "index out of bounds");
        r * self.cols.len() + c
    }
}

fn position(axis: &[String], id: &str) -> OntologyResult<usize> {
    axis.iter()
        .position(|a| a == id)
        .ok_or_else(|| OntologyError::UnknownTerm(id.to_string()))
}
