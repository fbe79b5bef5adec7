//! Blocks: the batches of units handed between pipeline stages.

use crate::unit::{ReadUnit, TrimmedUnit};

/// Consecutive input units tagged with their position in the stream.
///
/// A block with no units is the end-of-stream sentinel.
#[derive(Debug, Default)]
pub struct Block {
    pub index: u64,
    pub units: Vec<ReadUnit>,
}

impl Block {
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.units.is_empty()
    }
}

/// The trimmed counterpart of a [`Block`], units in their original order.
#[derive(Debug, Default)]
pub struct TrimmedBlock {
    pub index: u64,
    pub units: Vec<TrimmedUnit>,
}

impl TrimmedBlock {
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.units.is_empty()
    }
}
