//! Order-preserving partition of a folder's children into bounded runs.

use crate::error::{Result, SplitError};

/// A contiguous run of siblings taken from one folder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chunk<'a, T> {
    /// 0-based position of this run within its folder.
    pub index: usize,
    pub items: &'a [T],
}

/// Splits `items` into runs of `limit`; only the last run may be shorter.
///
/// An empty slice yields no chunks. A zero limit is rejected even for empty input.
pub fn chunk<T>(items: &[T], limit: usize) -> Result<Vec<Chunk<'_, T>>> {
    if limit == 0 {
        return Err(SplitError::InvalidLimit(0));
    }

    Ok(items
        .chunks(limit)
        .enumerate()
        .map(|(index, items)| Chunk { index, items })
        .collect())
}
