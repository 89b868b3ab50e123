//! Caches of decoded blocks for repeated voxel queries.
//!
//! Both caches remember absent blocks too: an entry that is `cached` with no `data` means the block does not exist, and all
//! of its voxels read as zero.
//!
//!   - `DenseBlockCache`: one slot for every block coordinate of every level, for queries spread over a whole volume
//!   - `ScopedBlockCache`: a handful of slots at one level, matched by a `CacheKeyMatch` strategy, for sweeps along an axis

pub mod dense;
pub mod scoped;

pub use dense::*;
pub use scoped::*;

use crate::{BlockBuffer, BlockCoordinate, BlockKey, BlockRead, Result};

use tracing::trace;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CacheEntry {
    pub coord: BlockCoordinate,
    /// `None` when the block does not exist.
    pub data: Option<BlockBuffer>,
    pub cached: bool,
}

impl CacheEntry {
    pub fn empty(coord: BlockCoordinate) -> Self {
        Self {
            coord,
            data: None,
            cached: false,
        }
    }
}

/// Counters for cache effectiveness.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    /// Blocks actually read from storage. Misses on absent blocks do not read.
    pub reads: usize,
}

fn fetch_block(
    storage: &impl BlockRead,
    layer: &str,
    key: BlockKey,
    voxel_count: usize,
    stats: &mut CacheStats,
) -> Result<Option<BlockBuffer>> {
    stats.misses += 1;
    trace!(?key, "block cache miss");

    if !storage.has_block(layer, key)? {
        return Ok(None);
    }
    let mut buffer = BlockBuffer::zeroed(voxel_count);
    storage.read_block(layer, key, buffer.as_mut_slice())?;
    stats.reads += 1;

    Ok(Some(buffer))
}
