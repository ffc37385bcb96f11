//! Row-blocked partition of a sparse binary matrix.
//!
//! Each block covers a contiguous row range and owns a private copy of the
//! entries falling inside it, so blocks can be sorted and multiplied on
//! separate workers without sharing any mutable state.

use crate::error::{Result, SbmError};
use crate::hilbert::{ceil_power2, row_d2xy, row_xy2d};
use crate::matrix::{u64_to_index, SparseBinaryMatrix};
use core::ops::Range;
use rayon::prelude::*;
use std::cell::RefCell;
use thread_local::ThreadLocal;

/// Entries of one contiguous row range, with absolute row/col indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBlock {
    start_row: usize,
    end_row: usize,
    row: Vec<u32>,
    col: Vec<u32>,
}

impl RowBlock {
    #[inline]
    #[must_use]
    pub const fn row_range(&self) -> Range<usize> {
        self.start_row..self.end_row
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.end_row - self.start_row
    }

    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.row.len()
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

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (u32, u32)> + '_ {
        self.row.iter().copied().zip(self.col.iter().copied())
    }

    /// Rewrite storage in ascending order of `encode`, using `ranks` as scratch.
    fn sort_by_rank<E, D>(&mut self, ranks: &mut Vec<u64>, encode: E, decode: D)
    where
        E: Fn(u32, u32) -> u64,
        D: Fn(u64) -> (u32, u32),
    {
        ranks.clear();
        ranks.extend(self.iter().map(|(i, j)| encode(i, j)));
        ranks.sort_unstable();
        for ((i, j), &d) in self.row.iter_mut().zip(self.col.iter_mut()).zip(ranks.iter()) {
            (*i, *j) = decode(d);
        }
    }

    fn sort_hilbert(&mut self, ranks: &mut Vec<u64>) {
        let base = self.start_row as u64;
        let n = ceil_power2(self.height() as u64);
        self.sort_by_rank(
            ranks,
            |i, j| row_xy2d(n, u64::from(i) - base, u64::from(j)),
            |d| {
                let (x, y) = row_d2xy(n, d);
                (u64_to_index(x + base), u64_to_index(y))
            },
        );
    }

    fn sort_row_major(&mut self, ncol: usize, ranks: &mut Vec<u64>) {
        let ncol = ncol.max(1) as u64;
        self.sort_by_rank(
            ranks,
            |i, j| u64::from(i) * ncol + u64::from(j),
            |d| (u64_to_index(d / ncol), u64_to_index(d % ncol)),
        );
    }
}

/// A sparse binary matrix split into independent row blocks.
///
/// `start_row` has `nblocks + 1` strictly increasing entries, starting at 0
/// and ending at `nrow`; block `b` holds exactly the source entries whose row
/// lies in `start_row[b]..start_row[b + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedSparseBinaryMatrix {
    nrow: usize,
    ncol: usize,
    block_height: usize,
    start_row: Vec<usize>,
    blocks: Vec<RowBlock>,
}

impl BlockedSparseBinaryMatrix {
    /// Partition `a` into blocks of `block_height` rows (the last may be shorter).
    /// Relative storage order is kept inside each block.
    pub fn new(a: &SparseBinaryMatrix, block_height: usize) -> Result<Self> {
        if block_height == 0 {
            return Err(SbmError::InvalidBlockHeight);
        }
        let nrow = a.nrow();
        let nblocks = nrow.div_ceil(block_height);
        let mut start_row: Vec<usize> = (0..nblocks).map(|b| b * block_height).collect();
        start_row.push(nrow);

        // pass 1: sizes
        let mut counts = vec![0usize; nblocks];
        for &i in a.rows() {
            counts[i as usize / block_height] += 1;
        }

        // pass 2: scatter
        let mut blocks: Vec<RowBlock> = counts
            .iter()
            .enumerate()
            .map(|(b, &cnt)| RowBlock {
                start_row: start_row[b],
                end_row: start_row[b + 1],
                row: Vec::with_capacity(cnt),
                col: Vec::with_capacity(cnt),
            })
            .collect();
        for (i, j) in a.iter() {
            let block = &mut blocks[i as usize / block_height];
            block.row.push(i);
            block.col.push(j);
        }

        tracing::debug!(
            nrow,
            ncol = a.ncol(),
            nnz = a.nnz(),
            nblocks,
            block_height,
            "built blocked sparse binary matrix"
        );
        Ok(Self {
            nrow,
            ncol: a.ncol(),
            block_height,
            start_row,
            blocks,
        })
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
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrow, self.ncol)
    }

    #[must_use]
    pub fn nnz(&self) -> usize {
        self.blocks.iter().map(RowBlock::nnz).sum()
    }

    #[inline]
    #[must_use]
    pub fn nblocks(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    #[must_use]
    pub const fn block_height(&self) -> usize {
        self.block_height
    }

    /// Block boundaries, `nblocks + 1` entries.
    #[inline]
    #[must_use]
    pub fn start_rows(&self) -> &[usize] {
        &self.start_row
    }

    #[inline]
    #[must_use]
    pub fn blocks(&self) -> &[RowBlock] {
        &self.blocks
    }

    /// Reorder every block along ribbon Hilbert tiles of height
    /// `ceil_power2(block height)`, one block per worker.
    pub fn sort_blocks_hilbert(&mut self) {
        self.for_each_block(|block, ranks| block.sort_hilbert(ranks));
        tracing::debug!(nblocks = self.nblocks(), "sorted blocks along Hilbert ribbons");
    }

    /// Reorder every block by `row * ncol + col`.
    pub fn sort_blocks_row_major(&mut self) {
        let ncol = self.ncol;
        self.for_each_block(|block, ranks| block.sort_row_major(ncol, ranks));
        tracing::debug!(nblocks = self.nblocks(), "sorted blocks in row-major order");
    }

    fn for_each_block<F>(&mut self, f: F)
    where
        F: Fn(&mut RowBlock, &mut Vec<u64>) + Send + Sync,
    {
        let tls: ThreadLocal<RefCell<Vec<u64>>> = ThreadLocal::new();
        self.blocks.par_iter_mut().for_each(|block| {
            let cell = tls.get_or(|| RefCell::new(Vec::new()));
            let mut ranks = cell.borrow_mut();
            f(block, &mut *ranks);
            tracing::trace!(
                start_row = block.start_row,
                end_row = block.end_row,
                nnz = block.nnz(),
                "sorted block"
            );
        });
    }

    /// Reassemble a single matrix, blocks in row order, storage order inside each.
    #[must_use]
    pub fn to_sparse(&self) -> SparseBinaryMatrix {
        let nnz = self.nnz();
        let mut row = Vec::with_capacity(nnz);
        let mut col = Vec::with_capacity(nnz);
        for block in &self.blocks {
            row.extend_from_slice(&block.row);
            col.extend_from_slice(&block.col);
        }
        SparseBinaryMatrix::from_validated(self.nrow, self.ncol, row, col)
    }
}
