//! Exponential-gap subsequence sampling.
//!
//! Drawing geometric gaps instead of testing every index makes sampling a
//! Bernoulli(p) subset of `0..n` cost O(p * n) draws. The generator is always
//! supplied by the caller, so each worker can own an independently seeded one.

use hilbsparse_core::{Result, SbmError};
use rand::Rng;

/// One Exponential(1) draw by inverse-CDF transform of a uniform sample.
#[inline]
pub fn randexp<R: Rng>(rng: &mut R) -> f64 {
    -(1.0 - rng.random::<f64>()).ln()
}

/// Fill `out` with an ascending run of distinct indices from `0..n`, each
/// included with probability `p`, stopping after `max_samples`. Returns the
/// number of indices written.
pub fn randsubseq<R: Rng>(
    rng: &mut R,
    n: usize,
    max_samples: usize,
    p: f64,
    out: &mut [usize],
) -> Result<usize> {
    if !(0.0..=1.0).contains(&p) {
        return Err(SbmError::InvalidProbability(p));
    }
    if max_samples > out.len() {
        return Err(SbmError::SampleBufferTooSmall {
            requested: max_samples,
            available: out.len(),
        });
    }
    if p == 0.0 || max_samples == 0 {
        return Ok(0);
    }

    // mean gap scale; 0 when p == 1
    let scale = -1.0 / (-p).ln_1p();
    let last = n as f64 - 1.0;
    let mut i = -1.0f64;
    let mut count = 0usize;
    loop {
        let s = randexp(rng) * scale;
        if i + s >= last {
            return Ok(count);
        }
        i += s.ceil().max(1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let idx = i as usize;
        out[count] = idx;
        count += 1;
        if count >= max_samples {
            return Ok(count);
        }
    }
}

/// [`randsubseq`] into a freshly allocated vector.
pub fn randsubseq_vec<R: Rng>(
    rng: &mut R,
    n: usize,
    max_samples: usize,
    p: f64,
) -> Result<Vec<usize>> {
    let cap = max_samples.min(n);
    let mut out = vec![0usize; cap];
    let count = randsubseq(rng, n, cap, p, &mut out)?;
    out.truncate(count);
    Ok(out)
}
