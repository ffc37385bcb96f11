//! Core data structures for hilbsparse: the Hilbert curve codec, sparse
//! binary matrices and their row-blocked partitions (pure Rust)

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod blocked;
pub mod error;
pub mod hilbert;
pub mod matrix;

pub use blocked::{BlockedSparseBinaryMatrix, RowBlock};
pub use error::{Result, SbmError};
pub use matrix::{SparseBinaryMatrix, MAX_DIM};
