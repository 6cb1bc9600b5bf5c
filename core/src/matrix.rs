//! Dense square matrices

use crate::pbrt::*;
use std::ops::{Index, IndexMut};

/// A dense square matrix stored in row-major order. Entries not explicitly
/// written are zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    /// Number of rows (and columns).
    n: usize,

    /// Row-major entries, `m[i * n + j]`.
    m: Vec<Float>,
}

impl Matrix {
    /// Returns a new `n x n` zero matrix.
    ///
    /// * `n` - Number of rows and columns.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            m: vec![0.0; n * n],
        }
    }

    /// Returns the number of rows (and columns).
    pub fn size(&self) -> usize {
        self.n
    }

    /// Returns a row as a slice.
    ///
    /// * `i` - Row index.
    pub fn row(&self, i: usize) -> &[Float] {
        &self.m[i * self.n..(i + 1) * self.n]
    }

    /// Returns the sum of a row.
    ///
    /// * `i` - Row index.
    pub fn row_sum(&self, i: usize) -> Float {
        self.row(i).iter().sum()
    }

    /// Returns an iterator over all entries in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Float> {
        self.m.iter()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = Float;

    /// Returns the entry at row `i` and column `j`.
    ///
    /// * `(i, j)` - Row and column.
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        debug_assert!(i < self.n && j < self.n);
        &self.m[i * self.n + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    /// Returns the mutable entry at row `i` and column `j`.
    ///
    /// * `(i, j)` - Row and column.
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        debug_assert!(i < self.n && j < self.n);
        &mut self.m[i * self.n + j]
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
