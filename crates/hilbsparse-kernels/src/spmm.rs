//! Y = A @ X for row-major X (ncol x width) and Y (nrow x width), blocked A.
#![allow(
    clippy::many_single_char_names,
    reason = "Math kernels conventionally use i/j/x/y for indices and operands"
)]
use crate::spmv::spmv_blocked_into;
use crate::util::{check_dense, check_len, dense_lens, for_each_block_segment};
use hilbsparse_core::{BlockedSparseBinaryMatrix, Result};
use wide::{f64x2, f64x4};

/// Y = A @ X with two interleaved columns
pub fn spmm_blocked_w2_into(
    b: &BlockedSparseBinaryMatrix,
    x: &[f64],
    y: &mut [f64],
) -> Result<()> {
    check_dense(b, x, y, 2)?;
    for_each_block_segment(b, y, 2, |block, seg| {
        seg.fill(0.0);
        let base = block.row_range().start;
        let xp = x.as_ptr();
        let yp = seg.as_mut_ptr();
        for (i, j) in block.iter() {
            let dst = (i as usize - base) * 2;
            let src = j as usize * 2;
            // in bounds: i in the block's rows, j < ncol, x.len() == ncol * 2
            unsafe {
                let vx = f64x2::new(core::ptr::read_unaligned(xp.add(src).cast::<[f64; 2]>()));
                let q = yp.add(dst).cast::<[f64; 2]>();
                let vy = f64x2::new(core::ptr::read_unaligned(q));
                core::ptr::write_unaligned(q, (vy + vx).to_array());
            }
        }
    });
    Ok(())
}

/// Y = A @ X with four interleaved columns
pub fn spmm_blocked_w4_into(
    b: &BlockedSparseBinaryMatrix,
    x: &[f64],
    y: &mut [f64],
) -> Result<()> {
    check_dense(b, x, y, 4)?;
    for_each_block_segment(b, y, 4, |block, seg| {
        seg.fill(0.0);
        let base = block.row_range().start;
        let xp = x.as_ptr();
        let yp = seg.as_mut_ptr();
        for (i, j) in block.iter() {
            let dst = (i as usize - base) * 4;
            let src = j as usize * 4;
            // in bounds: i in the block's rows, j < ncol, x.len() == ncol * 4
            unsafe {
                let vx = f64x4::new(core::ptr::read_unaligned(xp.add(src).cast::<[f64; 4]>()));
                let q = yp.add(dst).cast::<[f64; 4]>();
                let vy = f64x4::new(core::ptr::read_unaligned(q));
                core::ptr::write_unaligned(q, (vy + vx).to_array());
            }
        }
    });
    Ok(())
}

/// Y = A @ X for any `width >= 1`, one column at a time
pub fn spmm_blocked_wn_into(
    b: &BlockedSparseBinaryMatrix,
    x: &[f64],
    y: &mut [f64],
    width: usize,
) -> Result<()> {
    check_dense(b, x, y, width)?;
    for_each_block_segment(b, y, width, |block, seg| {
        seg.fill(0.0);
        let base = block.row_range().start;
        for (i, j) in block.iter() {
            let dst = (i as usize - base) * width;
            let src = j as usize * width;
            let yi = &mut seg[dst..dst + width];
            for (yv, &xv) in yi.iter_mut().zip(&x[src..src + width]) {
                *yv += xv;
            }
        }
    });
    Ok(())
}

/// Y = A @ X, choosing the unrolled kernel for widths 1, 2 and 4
pub fn spmm_blocked_into(
    b: &BlockedSparseBinaryMatrix,
    x: &[f64],
    y: &mut [f64],
    width: usize,
) -> Result<()> {
    match width {
        1 => spmv_blocked_into(b, x, y),
        2 => spmm_blocked_w2_into(b, x, y),
        4 => spmm_blocked_w4_into(b, x, y),
        _ => spmm_blocked_wn_into(b, x, y, width),
    }
}

/// Y = A @ X, allocating Y as (nrow x width) row-major
pub fn spmm_blocked(b: &BlockedSparseBinaryMatrix, x: &[f64], width: usize) -> Result<Vec<f64>> {
    let (xlen, ylen) = dense_lens(b, width)?;
    check_len("x", x.len(), xlen)?;
    let mut y = vec![0.0f64; ylen];
    spmm_blocked_into(b, x, &mut y, width)?;
    Ok(y)
}
