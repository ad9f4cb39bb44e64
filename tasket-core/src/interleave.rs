//! Interleave merger: splice fixed-size chunks of a secondary sequence into a
//! primary one at fixed-stride positions.
//!
//! Walking `primary` by index, immediately before every index that is a positive
//! multiple of `stride` the next chunk of up to `chunk_size` items is taken from
//! the front of `secondary`. Whatever is left of `secondary` once `primary` runs
//! out is appended in order. Relative order of both inputs is preserved; nothing
//! is re-sorted.
//!
//! `secondary` is taken by value: the caller gives it up, and the merge reads it
//! through a single forward cursor.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TasketError};

pub const DEFAULT_STRIDE: usize = 4;
pub const DEFAULT_CHUNK_SIZE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterleaveOptions {
    /// Primary items between insertion points.
    pub stride: usize,
    /// Maximum secondary items spliced at each insertion point.
    pub chunk_size: usize,
}

impl Default for InterleaveOptions {
    fn default() -> Self {
        Self {
            stride: DEFAULT_STRIDE,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl InterleaveOptions {
    pub fn new(stride: usize, chunk_size: usize) -> Result<Self> {
        let opts = Self { stride, chunk_size };
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> Result<()> {
        if self.stride == 0 {
            return Err(TasketError::Configuration(
                "interleave stride must be positive".into(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(TasketError::Configuration(
                "interleave chunk size must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Merge `secondary` into `primary` with the default stride (4) and chunk size (2).
pub fn interleave<T>(primary: Vec<T>, secondary: Vec<T>) -> Result<Vec<T>> {
    interleave_with(primary, secondary, InterleaveOptions::default())
}

pub fn interleave_with<T>(
    primary: Vec<T>,
    secondary: Vec<T>,
    opts: InterleaveOptions,
) -> Result<Vec<T>> {
    opts.validate()?;

    let mut out = Vec::with_capacity(primary.len() + secondary.len());
    let mut cursor = secondary.into_iter();

    for (i, item) in primary.into_iter().enumerate() {
        if i > 0 && i % opts.stride == 0 {
            out.extend(cursor.by_ref().take(opts.chunk_size));
        }
        out.push(item);
    }
    out.extend(cursor);

    Ok(out)
}
