//! Shared length checks and the per-block parallel driver

use hilbsparse_core::{BlockedSparseBinaryMatrix, Result, RowBlock, SbmError};
use rayon::prelude::*;

/// Below this many stored entries blocks are walked on the calling thread.
pub const SMALL_NNZ_LIMIT: usize = 32 * 1024;

#[inline]
pub(crate) fn check_len(what: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(SbmError::DimensionMismatch {
            what,
            expected,
            actual,
        })
    }
}

/// Required `(x, y)` lengths for a `width`-column product against `b`.
pub(crate) fn dense_lens(b: &BlockedSparseBinaryMatrix, width: usize) -> Result<(usize, usize)> {
    if width == 0 {
        return Err(SbmError::InvalidWidth);
    }
    match (b.ncol().checked_mul(width), b.nrow().checked_mul(width)) {
        (Some(xlen), Some(ylen)) => Ok((xlen, ylen)),
        _ => Err(SbmError::InvalidWidth),
    }
}

/// Validate `x`/`y` for a `width`-column product against `b`.
pub(crate) fn check_dense(
    b: &BlockedSparseBinaryMatrix,
    x: &[f64],
    y: &[f64],
    width: usize,
) -> Result<()> {
    let (xlen, ylen) = dense_lens(b, width)?;
    check_len("x", x.len(), xlen)?;
    check_len("y", y.len(), ylen)
}

/// Split `y` along the block boundaries, `width` values per row.
/// `y.len()` must already equal `nrow * width`.
fn block_segments<'a>(
    b: &BlockedSparseBinaryMatrix,
    mut y: &'a mut [f64],
    width: usize,
) -> Vec<&'a mut [f64]> {
    let mut segs = Vec::with_capacity(b.nblocks());
    for block in b.blocks() {
        let (seg, rest) = core::mem::take(&mut y).split_at_mut(block.height() * width);
        segs.push(seg);
        y = rest;
    }
    segs
}

/// Hand each block the segment of `y` covering its rows (times `width`).
/// Every block is processed by exactly one worker; segments never overlap.
pub(crate) fn for_each_block_segment<F>(
    b: &BlockedSparseBinaryMatrix,
    y: &mut [f64],
    width: usize,
    f: F,
) where
    F: Fn(&RowBlock, &mut [f64]) + Send + Sync,
{
    let segs = block_segments(b, y, width);
    if b.nnz() <= SMALL_NNZ_LIMIT {
        segs.into_iter()
            .zip(b.blocks())
            .for_each(|(seg, block)| f(block, seg));
    } else {
        segs.into_par_iter()
            .zip(b.blocks().par_iter())
            .for_each(|(seg, block)| f(block, seg));
    }
}
