//! Coordinate-list sparse binary matrix and its constructors

use crate::error::{Result, SbmError};
use crate::hilbert::{ceil_power2, d2xy, xy2d};
use rayon::prelude::*;

/// Largest supported row/column extent. Keeps every curve rank inside a `u64`.
pub const MAX_DIM: usize = i32::MAX as usize;

/// Narrow a decoded curve coordinate back to the stored index width.
#[inline]
pub(crate) fn u64_to_index(v: u64) -> u32 {
    debug_assert!(u32::try_from(v).is_ok(), "coordinate {v} exceeds u32");
    #[allow(clippy::cast_possible_truncation)]
    {
        v as u32
    }
}

/// A 0/1 matrix stored as parallel row/col index sequences.
///
/// Every stored position carries the value 1; repeated positions accumulate
/// under multiplication. All indices are checked against the declared
/// dimensions on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseBinaryMatrix {
    nrow: usize,
    ncol: usize,
    row: Vec<u32>, // length nnz
    col: Vec<u32>, // length nnz
}

impl SparseBinaryMatrix {
    /// Take ownership of `row`/`col` with explicit dimensions.
    pub fn from_parts(nrow: usize, ncol: usize, row: Vec<u32>, col: Vec<u32>) -> Result<Self> {
        if row.len() != col.len() {
            return Err(SbmError::LengthMismatch {
                rows: row.len(),
                cols: col.len(),
            });
        }
        for dim in [nrow, ncol] {
            if dim > MAX_DIM {
                return Err(SbmError::DimensionTooLarge { dim, max: MAX_DIM });
            }
        }
        for (k, (&i, &j)) in row.iter().zip(col.iter()).enumerate() {
            if i as usize >= nrow || j as usize >= ncol {
                return Err(SbmError::IndexOutOfBounds {
                    position: k,
                    row: i,
                    col: j,
                    nrows: nrow,
                    ncols: ncol,
                });
            }
        }
        Ok(Self {
            nrow,
            ncol,
            row,
            col,
        })
    }

    /// Entries already known to satisfy the bounds, e.g. gathered back from blocks.
    pub(crate) const fn from_validated(
        nrow: usize,
        ncol: usize,
        row: Vec<u32>,
        col: Vec<u32>,
    ) -> Self {
        Self {
            nrow,
            ncol,
            row,
            col,
        }
    }

    /// Build from coordinates alone; dimensions are the largest index + 1.
    pub fn from_coords(row: Vec<u32>, col: Vec<u32>) -> Result<Self> {
        let nrow = row.iter().max().map_or(0, |&m| m as usize + 1);
        let ncol = col.iter().max().map_or(0, |&m| m as usize + 1);
        Self::from_parts(nrow, ncol, row, col)
    }

    #[inline]
    #[must_use]
    pub const fn nrow(&self) -> usize {
        self.nrow
    }

    #[inline]
    #[must_use]
    pub const fn ncol(&self) -> usize {
        self.ncol
    }

    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.row.len()
    }

    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrow, self.ncol)
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[u32] {
        &self.row
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> &[u32] {
        &self.col
    }

    /// Stored positions in storage order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (u32, u32)> + '_ {
        self.row.iter().copied().zip(self.col.iter().copied())
    }

    /// Release the matrix into `(nrow, ncol, row, col)`.
    #[must_use]
    pub fn into_parts(self) -> (usize, usize, Vec<u32>, Vec<u32>) {
        (self.nrow, self.ncol, self.row, self.col)
    }

    /// Transpose in place by exchanging the roles of the two sequences.
    pub fn transpose(&mut self) {
        core::mem::swap(&mut self.row, &mut self.col);
        core::mem::swap(&mut self.nrow, &mut self.ncol);
    }

    /// Deep-copied transpose; `self` is left untouched.
    #[must_use]
    pub fn transposed(&self) -> Self {
        Self {
            nrow: self.ncol,
            ncol: self.nrow,
            row: self.col.clone(),
            col: self.row.clone(),
        }
    }

    /// Reorder storage along a Hilbert curve over the square of side
    /// `ceil_power2(max(nrow, ncol))`. The multiset of positions is unchanged.
    pub fn sort_by_hilbert(&mut self) {
        let n = ceil_power2(self.nrow.max(self.ncol) as u64);
        let mut ranks: Vec<u64> = self
            .row
            .par_iter()
            .zip(self.col.par_iter())
            .map(|(&i, &j)| xy2d(n, u64::from(i), u64::from(j)))
            .collect();
        ranks.par_sort_unstable();
        self.row
            .par_iter_mut()
            .zip(self.col.par_iter_mut())
            .zip(ranks.par_iter())
            .for_each(|((i, j), &d)| {
                let (x, y) = d2xy(n, d);
                *i = u64_to_index(x);
                *j = u64_to_index(y);
            });
        tracing::debug!(nnz = self.nnz(), order = n, "sorted matrix along Hilbert curve");
    }
}
