//! Multiply kernels for hilbsparse (pure Rust, SIMD/parallel)

use hilbsparse_core::Result;

/// Configure the global rayon pool. With `None` rayon's defaults apply,
/// including `RAYON_NUM_THREADS`. Fails if the pool was already built.
pub fn init_parallel(num_threads: Option<usize>) -> Result<()> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = num_threads {
        builder = builder.num_threads(n);
    }
    builder.build_global()?;
    tracing::debug!(
        threads = rayon::current_num_threads(),
        "initialised global thread pool"
    );
    Ok(())
}

pub mod config;
pub mod sample;
pub mod spmm;
pub mod spmv;
pub mod util;

pub use config::{build_blocked, BlockConfig, BlockOrder};
pub use sample::{randexp, randsubseq, randsubseq_vec};
pub use spmm::{
    spmm_blocked, spmm_blocked_into, spmm_blocked_w2_into, spmm_blocked_w4_into,
    spmm_blocked_wn_into,
};
pub use spmv::{spmv, spmv_blocked, spmv_blocked_into, spmv_into, spmv_t, spmv_t_into};
