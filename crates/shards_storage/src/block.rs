use crate::{Result, StorageError};

use shards_core::prelude::*;

use core::ops::{Add, Deref};
use serde::{Deserialize, Serialize};

/// One density sample. Zero means empty.
pub type Density = u16;

/// The coordinate of a block in block space. Only unique when paired with a level, see `BlockKey`.
pub type BlockCoordinate = Point3i;

/// The rectangular range of block coordinates that may exist in a volume.
///
/// The same range is used at every level: each block spans the same world-space box at every level, because the voxel
/// size doubles exactly as fast as the block resolution halves.
pub type BlockIdRange = Extent3i;

/// Fails unless `range` holds at least one block, and its block count and upper bound both fit in an `i32`.
pub fn validate_block_id_range(range: &BlockIdRange) -> Result<()> {
    let min = range.minimum;
    let shape = range.shape;
    if shape.x() <= 0 || shape.y() <= 0 || shape.z() <= 0 {
        return Err(StorageError::InvalidBlockIdRange(*range));
    }

    let num_blocks = shape.x() as i64 * shape.y() as i64 * shape.z() as i64;
    let lub_fits = [
        (min.x(), shape.x()),
        (min.y(), shape.y()),
        (min.z(), shape.z()),
    ]
    .iter()
    .all(|(m, s)| *m as i64 + *s as i64 <= i32::MAX as i64);
    if num_blocks > i32::MAX as i64 || !lub_fits {
        return Err(StorageError::InvalidBlockIdRange(*range));
    }

    Ok(())
}

/// The key for a block at a particular mip level.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct BlockKey {
    /// The coordinate of the block in block space.
    pub coord: BlockCoordinate,
    /// From highest resolution at 0 to a single voxel per block at the last level.
    pub level: u8,
}

impl BlockKey {
    pub fn new(level: u8, coord: BlockCoordinate) -> Self {
        Self { coord, level }
    }
}

/// Block-local voxel coordinates, relative to the first non-border voxel.
///
/// Most of the time a voxel is addressed by a `Point3i` in level-local voxel space. `Local3i` only applies after that point
/// has been split into a block coordinate and an offset within the block.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Local3i(pub Point3i);

impl Deref for Local3i {
    type Target = Point3i;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// An index into a block's flat sample buffer.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Stride(pub usize);

impl Add for Stride {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Stride(self.0 + rhs.0)
    }
}

/// The decoded samples of one block, including its border.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlockBuffer {
    samples: Vec<Density>,
}

impl BlockBuffer {
    /// An all-empty buffer of `voxel_count` samples.
    pub fn zeroed(voxel_count: usize) -> Self {
        Self {
            samples: vec![0; voxel_count],
        }
    }

    #[inline]
    pub fn get(&self, stride: Stride) -> Density {
        self.samples[stride.0]
    }

    #[inline]
    pub fn as_slice(&self) -> &[Density] {
        &self.samples
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Density] {
        &mut self.samples
    }
}
