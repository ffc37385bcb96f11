#![allow(
    clippy::many_single_char_names,
    reason = "Math kernels conventionally use i/j/x/y for indices and operands"
)]
use crate::util::{check_dense, check_len, for_each_block_segment};
use hilbsparse_core::{BlockedSparseBinaryMatrix, Result, SparseBinaryMatrix};

/// y = A @ x
pub fn spmv_into(a: &SparseBinaryMatrix, x: &[f64], y: &mut [f64]) -> Result<()> {
    check_len("x", x.len(), a.ncol())?;
    check_len("y", y.len(), a.nrow())?;
    y.fill(0.0);
    for (i, j) in a.iter() {
        y[i as usize] += x[j as usize];
    }
    Ok(())
}

/// y = A^T @ x
pub fn spmv_t_into(a: &SparseBinaryMatrix, x: &[f64], y: &mut [f64]) -> Result<()> {
    check_len("x", x.len(), a.nrow())?;
    check_len("y", y.len(), a.ncol())?;
    y.fill(0.0);
    for (i, j) in a.iter() {
        y[j as usize] += x[i as usize];
    }
    Ok(())
}

/// y = A @ x, allocating y
pub fn spmv(a: &SparseBinaryMatrix, x: &[f64]) -> Result<Vec<f64>> {
    let mut y = vec![0.0f64; a.nrow()];
    spmv_into(a, x, &mut y)?;
    Ok(y)
}

/// y = A^T @ x, allocating y
pub fn spmv_t(a: &SparseBinaryMatrix, x: &[f64]) -> Result<Vec<f64>> {
    let mut y = vec![0.0f64; a.ncol()];
    spmv_t_into(a, x, &mut y)?;
    Ok(y)
}

/// y = A @ x over a blocked matrix, one block per worker
pub fn spmv_blocked_into(b: &BlockedSparseBinaryMatrix, x: &[f64], y: &mut [f64]) -> Result<()> {
    check_dense(b, x, y, 1)?;
    for_each_block_segment(b, y, 1, |block, seg| {
        seg.fill(0.0);
        let base = block.row_range().start;
        for (i, j) in block.iter() {
            seg[i as usize - base] += x[j as usize];
        }
    });
    Ok(())
}

/// y = A @ x over a blocked matrix, allocating y
pub fn spmv_blocked(b: &BlockedSparseBinaryMatrix, x: &[f64]) -> Result<Vec<f64>> {
    let mut y = vec![0.0f64; b.nrow()];
    spmv_blocked_into(b, x, &mut y)?;
    Ok(y)
}
