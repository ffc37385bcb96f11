//! Hilbert curve codec: (x, y) <-> rank along an order-log2(n) curve.
//!
//! `n` is always a power of two. The "ribbon" variants tile square curves
//! along an unbounded column axis for strips of fixed height `n`.

use crate::error::{Result, SbmError};

/// Largest supported curve side; the last rank `n * n - 1` still fits a `u64`.
pub const MAX_CURVE_ORDER: u64 = 1 << 32;

/// Largest ribbon height; the tile stride `n * n` must itself fit a `u64`.
pub const MAX_RIBBON_ORDER: u64 = 1 << 31;

/// Smallest power of two `>= x` (1 for `x == 0`).
#[inline]
#[must_use]
pub const fn ceil_power2(x: u64) -> u64 {
    x.next_power_of_two()
}

/// Rotate/flip a quadrant of side `n`. Coordinates must already be inside it.
#[inline]
fn rot(n: u64, x: &mut u64, y: &mut u64, rx: u64, ry: u64) {
    if ry == 0 {
        if rx == 1 {
            *x = n - 1 - *x;
            *y = n - 1 - *y;
        }
        core::mem::swap(x, y);
    }
}

/// Convert (x, y) in `[0, n)^2` to its rank in `[0, n^2)`.
#[inline]
#[must_use]
pub fn xy2d(n: u64, mut x: u64, mut y: u64) -> u64 {
    debug_assert!(n.is_power_of_two() && n <= MAX_CURVE_ORDER);
    debug_assert!(x < n && y < n, "({x}, {y}) outside curve of side {n}");
    let mut d = 0u64;
    let mut s = n / 2;
    while s > 0 {
        let rx = u64::from(x & s != 0);
        let ry = u64::from(y & s != 0);
        d += s * s * ((3 * rx) ^ ry);
        x &= s - 1;
        y &= s - 1;
        rot(s, &mut x, &mut y, rx, ry);
        s /= 2;
    }
    d
}

/// Convert a rank in `[0, n^2)` back to (x, y).
#[inline]
#[must_use]
pub fn d2xy(n: u64, d: u64) -> (u64, u64) {
    debug_assert!(n.is_power_of_two() && n <= MAX_CURVE_ORDER);
    let mut x = 0u64;
    let mut y = 0u64;
    let mut t = d;
    let mut s = 1u64;
    while s < n {
        let rx = 1 & (t / 2);
        let ry = 1 & (t ^ rx);
        rot(s, &mut x, &mut y, rx, ry);
        x += s * rx;
        y += s * ry;
        t /= 4;
        s *= 2;
    }
    (x, y)
}

/// Ribbon rank for a strip of height `n`: `x` is the strip-local row in `[0, n)`,
/// `y` the unbounded column. Each `n x n` tile is walked with the in-tile
/// axes swapped, `(y mod n, x)`, and tiles follow each other along `y`.
#[inline]
#[must_use]
pub fn row_xy2d(n: u64, x: u64, y: u64) -> u64 {
    debug_assert!(n <= MAX_RIBBON_ORDER);
    debug_assert!(x < n, "row {x} outside ribbon of height {n}");
    xy2d(n, y % n, x) + n * n * (y / n)
}

/// Inverse of [`row_xy2d`]; the returned row lies in `[0, n)`.
#[inline]
#[must_use]
pub fn row_d2xy(n: u64, d: u64) -> (u64, u64) {
    debug_assert!(n <= MAX_RIBBON_ORDER);
    let nsq = n * n;
    let (y, x) = d2xy(n, d % nsq);
    (x, y + (d / nsq) * n)
}

fn check_order(n: u64) -> Result<()> {
    if !n.is_power_of_two() || n > MAX_CURVE_ORDER {
        return Err(SbmError::CurvePrecondition {
            n,
            message: format!("side must be a power of two no larger than {MAX_CURVE_ORDER}"),
        });
    }
    Ok(())
}

/// [`xy2d`] with its preconditions reported instead of assumed.
pub fn checked_xy2d(n: u64, x: u64, y: u64) -> Result<u64> {
    check_order(n)?;
    if x >= n || y >= n {
        return Err(SbmError::CurvePrecondition {
            n,
            message: format!("coordinate ({x}, {y}) outside [0, {n})^2"),
        });
    }
    Ok(xy2d(n, x, y))
}

/// [`d2xy`] with its preconditions reported instead of assumed.
pub fn checked_d2xy(n: u64, d: u64) -> Result<(u64, u64)> {
    check_order(n)?;
    if u128::from(d) >= u128::from(n) * u128::from(n) {
        return Err(SbmError::CurvePrecondition {
            n,
            message: format!("rank {d} outside [0, n^2)"),
        });
    }
    Ok(d2xy(n, d))
}
