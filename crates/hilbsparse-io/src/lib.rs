//! IO helpers for hilbsparse: the binary sparse binary matrix file format.
//!
//! Layout, native byte order: `nrow: i64`, `ncol: i64`, `nnz: i64`, then `nnz`
//! row indices as `i32`, then `nnz` column indices as `i32`. Indices are
//! 1-based on disk and 0-based in memory.

use hilbsparse_core::{SbmError, SparseBinaryMatrix};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[inline]
#[must_use]
pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Errors while loading or storing a matrix file.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("cannot create {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },

    /// Header field could not be read in full
    #[error("failed reading {what}: {source}")]
    Read {
        what: &'static str,
        source: io::Error,
    },

    /// Index array ended early
    #[error("{what} truncated: expected {expected} bytes, found {actual}")]
    Truncated {
        what: &'static str,
        expected: u64,
        actual: u64,
    },

    #[error("failed writing matrix: {0}")]
    Write(#[source] io::Error),

    #[error("header field {field} is negative ({value})")]
    NegativeHeader { field: &'static str, value: i64 },

    /// A stored index below 1
    #[error("{what} index {value} at position {position} is not 1-based")]
    InvalidIndex {
        what: &'static str,
        position: usize,
        value: i32,
    },

    #[error(transparent)]
    Matrix(#[from] SbmError),
}

pub type Result<T> = std::result::Result<T, IoError>;

fn read_header_field<R: Read>(reader: &mut R, field: &'static str) -> Result<usize> {
    let mut buf = [0u8; 8];
    reader
        .read_exact(&mut buf)
        .map_err(|source| IoError::Read { what: field, source })?;
    let value = i64::from_ne_bytes(buf);
    usize::try_from(value).map_err(|_| IoError::NegativeHeader { field, value })
}

fn read_indices<R: Read>(reader: &mut R, what: &'static str, nnz: usize) -> Result<Vec<u32>> {
    let expected = (nnz as u64).saturating_mul(4);
    // grows with the data actually present, so a corrupt nnz cannot force a huge allocation
    let mut bytes = Vec::new();
    reader
        .by_ref()
        .take(expected)
        .read_to_end(&mut bytes)
        .map_err(|source| IoError::Read { what, source })?;
    if bytes.len() as u64 != expected {
        return Err(IoError::Truncated {
            what,
            expected,
            actual: bytes.len() as u64,
        });
    }
    bytes
        .chunks_exact(4)
        .enumerate()
        .map(|(position, b)| {
            let value = i32::from_ne_bytes([b[0], b[1], b[2], b[3]]);
            u32::try_from(value)
                .ok()
                .and_then(|v| v.checked_sub(1))
                .ok_or(IoError::InvalidIndex {
                    what,
                    position,
                    value,
                })
        })
        .collect()
}

/// Load a matrix from any reader.
pub fn read_sbm_from<R: Read>(mut reader: R) -> Result<SparseBinaryMatrix> {
    let nrow = read_header_field(&mut reader, "nrow")?;
    let ncol = read_header_field(&mut reader, "ncol")?;
    let nnz = read_header_field(&mut reader, "nnz")?;
    let row = read_indices(&mut reader, "row", nnz)?;
    let col = read_indices(&mut reader, "col", nnz)?;
    Ok(SparseBinaryMatrix::from_parts(nrow, ncol, row, col)?)
}

/// Load a matrix file.
pub fn read_sbm<P: AsRef<Path>>(path: P) -> Result<SparseBinaryMatrix> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IoError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let m = read_sbm_from(BufReader::new(file))?;
    tracing::debug!(
        path = %path.display(),
        nrow = m.nrow(),
        ncol = m.ncol(),
        nnz = m.nnz(),
        "loaded sparse binary matrix"
    );
    Ok(m)
}

/// Store a matrix to any writer.
pub fn write_sbm_to<W: Write>(mut writer: W, m: &SparseBinaryMatrix) -> Result<()> {
    let mut put = |bytes: &[u8]| writer.write_all(bytes).map_err(IoError::Write);
    for v in [m.nrow(), m.ncol(), m.nnz()] {
        put(&(v as i64).to_ne_bytes())?;
    }
    for idx in [m.rows(), m.cols()] {
        for &i in idx {
            // i < MAX_DIM, so i + 1 fits an i32
            #[allow(clippy::cast_possible_wrap)]
            let one_based = (i + 1) as i32;
            put(&one_based.to_ne_bytes())?;
        }
    }
    writer.flush().map_err(IoError::Write)
}

/// Store a matrix file, replacing any existing one.
pub fn write_sbm<P: AsRef<Path>>(path: P, m: &SparseBinaryMatrix) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| IoError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    write_sbm_to(BufWriter::new(file), m)?;
    tracing::debug!(path = %path.display(), nnz = m.nnz(), "wrote sparse binary matrix");
    Ok(())
}
