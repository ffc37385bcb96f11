//! Blocking configuration and the load-once / multiply-many preparation pipeline

use core::fmt;
use core::str::FromStr;
use hilbsparse_core::{BlockedSparseBinaryMatrix, Result, SbmError, SparseBinaryMatrix};

pub const ENV_BLOCK_HEIGHT: &str = "HILBSPARSE_BLOCK_HEIGHT";
pub const ENV_BLOCK_ORDER: &str = "HILBSPARSE_BLOCK_ORDER";
pub const ENV_GLOBAL_SORT: &str = "HILBSPARSE_GLOBAL_SORT";

/// Storage order applied inside every block after partitioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockOrder {
    /// Ribbon Hilbert tiles over block-relative rows
    #[default]
    Hilbert,
    /// `row * ncol + col` ascending
    RowMajor,
    /// Leave entries in the order they were scattered from the source
    Storage,
}

impl FromStr for BlockOrder {
    type Err = SbmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hilbert" => Ok(Self::Hilbert),
            "row-major" | "row_major" | "rowmajor" => Ok(Self::RowMajor),
            "storage" | "none" => Ok(Self::Storage),
            _ => Err(SbmError::InvalidConfig {
                key: ENV_BLOCK_ORDER,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BlockOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hilbert => "hilbert",
            Self::RowMajor => "row-major",
            Self::Storage => "storage",
        })
    }
}

/// How a loaded matrix is turned into a blocked matrix for repeated multiplies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockConfig {
    /// Rows per block; the last block may be shorter
    pub block_height: usize,
    /// Hilbert-sort the source matrix before partitioning
    pub global_sort: bool,
    pub order: BlockOrder,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            block_height: Self::DEFAULT_BLOCK_HEIGHT,
            global_sort: true,
            order: BlockOrder::default(),
        }
    }
}

impl BlockConfig {
    pub const DEFAULT_BLOCK_HEIGHT: usize = 1024;

    #[must_use]
    pub const fn with_block_height(mut self, block_height: usize) -> Self {
        self.block_height = block_height;
        self
    }

    #[must_use]
    pub const fn with_global_sort(mut self, global_sort: bool) -> Self {
        self.global_sort = global_sort;
        self
    }

    #[must_use]
    pub const fn with_order(mut self, order: BlockOrder) -> Self {
        self.order = order;
        self
    }

    /// Defaults overlaid with `HILBSPARSE_BLOCK_HEIGHT`, `HILBSPARSE_BLOCK_ORDER`
    /// and `HILBSPARSE_GLOBAL_SORT` when set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = lookup(ENV_BLOCK_HEIGHT) {
            cfg.block_height = match v.trim().parse::<usize>() {
                Ok(h) if h > 0 => h,
                _ => {
                    return Err(SbmError::InvalidConfig {
                        key: ENV_BLOCK_HEIGHT,
                        value: v,
                    })
                }
            };
        }
        if let Some(v) = lookup(ENV_BLOCK_ORDER) {
            cfg.order = v.parse()?;
        }
        if let Some(v) = lookup(ENV_GLOBAL_SORT) {
            cfg.global_sort = match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(SbmError::InvalidConfig {
                        key: ENV_GLOBAL_SORT,
                        value: v,
                    })
                }
            };
        }
        Ok(cfg)
    }
}

/// Optionally curve-sort `a`, partition it and order every block per `cfg`.
pub fn build_blocked(
    a: &mut SparseBinaryMatrix,
    cfg: &BlockConfig,
) -> Result<BlockedSparseBinaryMatrix> {
    if cfg.global_sort {
        a.sort_by_hilbert();
    }
    let mut b = BlockedSparseBinaryMatrix::new(a, cfg.block_height)?;
    match cfg.order {
        BlockOrder::Hilbert => b.sort_blocks_hilbert(),
        BlockOrder::RowMajor => b.sort_blocks_row_major(),
        BlockOrder::Storage => {}
    }
    tracing::debug!(
        block_height = cfg.block_height,
        global_sort = cfg.global_sort,
        order = %cfg.order,
        nblocks = b.nblocks(),
        "prepared blocked matrix"
    );
    Ok(b)
}
