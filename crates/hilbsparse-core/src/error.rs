//! Error types for hilbsparse

use thiserror::Error;

/// Errors raised while constructing, partitioning or multiplying sparse binary matrices.
#[derive(Debug, Error)]
pub enum SbmError {
    /// Row and column index sequences differ in length
    #[error("row/col must have equal length (got {rows} rows, {cols} cols)")]
    LengthMismatch { rows: usize, cols: usize },

    /// A stored position lies outside the declared dimensions
    #[error("entry {position} at ({row}, {col}) is out of bounds for a ({nrows}, {ncols}) matrix")]
    IndexOutOfBounds {
        position: usize,
        row: u32,
        col: u32,
        nrows: usize,
        ncols: usize,
    },

    /// Declared dimension exceeds the supported index space
    #[error("dimension {dim} exceeds the maximum of {max}")]
    DimensionTooLarge { dim: usize, max: usize },

    /// Dense buffer has the wrong length for the operation
    #[error("{what} must have length {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Block height of zero
    #[error("block height must be at least 1")]
    InvalidBlockHeight,

    /// Dense width of zero, or one whose operand lengths overflow `usize`
    #[error("dense width must be at least 1 and keep operand lengths within usize")]
    InvalidWidth,

    /// Curve order is not a power of two, or a coordinate/rank is outside its domain
    #[error("Hilbert curve precondition violated for n = {n}: {message}")]
    CurvePrecondition { n: u64, message: String },

    /// Sampling probability outside [0, 1]
    #[error("sampling probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),

    /// Caller-supplied sample buffer cannot hold the requested sample cap
    #[error("sample buffer holds {available} values but {requested} were requested")]
    SampleBufferTooSmall { requested: usize, available: usize },

    /// Malformed configuration value
    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },

    /// Global thread pool could not be configured
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for hilbsparse operations
pub type Result<T> = std::result::Result<T, SbmError>;
