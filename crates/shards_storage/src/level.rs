//! Per-level geometry of a block-structured volume.
//!
//! Level 0 holds the finest voxels. Every level above it doubles the voxel size and halves the number of voxels along a
//! block edge, until a block is a single voxel. Blocks keep their border padding at every level, so the number of samples
//! per block shrinks more slowly than the resolution does.

use crate::{BlockCoordinate, Local3i, Result, StorageError, Stride};

use shards_core::prelude::*;

use serde::{Deserialize, Serialize};

/// The shape of the blocks in one layer of a volume.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LayerDescriptor {
    /// Voxels per block edge at level 0. Must be a power of two.
    pub block_resolution: i32,
    /// Ghost voxels on each side of a block, duplicating neighbor data.
    pub border_size: i32,
}

impl LayerDescriptor {
    pub fn new(block_resolution: i32, border_size: i32) -> Result<Self> {
        let descriptor = Self {
            block_resolution,
            border_size,
        };
        descriptor.validate()?;

        Ok(descriptor)
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_resolution <= 0 || !(self.block_resolution as u32).is_power_of_two() {
            return Err(StorageError::InvalidBlockResolution(self.block_resolution));
        }
        if self.border_size < 0 {
            return Err(StorageError::InvalidBorderSize(self.border_size));
        }

        Ok(())
    }
}

/// Maps a voxel inside a padded block to its index in the block buffer. X varies fastest, then Y, then Z.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PaddedLayout {
    padded_edge: i32,
    border_size: i32,
}

impl PaddedLayout {
    pub fn new(block_resolution: i32, border_size: i32) -> Self {
        Self {
            padded_edge: block_resolution + 2 * border_size,
            border_size,
        }
    }

    #[inline]
    pub fn voxel_count(&self) -> usize {
        let e = self.padded_edge as usize;

        e * e * e
    }

    /// `p` is in padded coordinates, where the first border voxel is at the origin.
    #[inline]
    pub fn stride_from_padded_point(&self, p: Point3i) -> Stride {
        let e = self.padded_edge;

        Stride((p.z() * e * e + p.y() * e + p.x()) as usize)
    }

    /// `p` is relative to the first interior voxel, so the border is added before indexing.
    #[inline]
    pub fn stride_from_local_point(&self, p: Local3i) -> Stride {
        self.stride_from_padded_point(p.0 + Point3i::fill(self.border_size))
    }
}

/// Geometry of a single mip level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LevelInfo {
    /// World units per voxel.
    pub voxel_size: i32,
    /// Interior voxels per block edge.
    pub block_resolution: i32,
    /// Samples per block, including the border.
    pub voxel_count: usize,
    pub layout: PaddedLayout,
}

impl LevelInfo {
    fn new(voxel_size: i32, block_resolution: i32, border_size: i32) -> Self {
        let layout = PaddedLayout::new(block_resolution, border_size);

        Self {
            voxel_size,
            block_resolution,
            voxel_count: layout.voxel_count(),
            layout,
        }
    }

    /// The voxel of this level that contains the world-space `position`.
    #[inline]
    pub fn voxel_containing_world_point(&self, position: Point3f) -> Point3i {
        (position / self.voxel_size as f32).in_voxel()
    }

    /// Splits a level-local voxel into the block that contains it and the offset within that block.
    #[inline]
    pub fn split_voxel(&self, voxel: Point3i) -> (BlockCoordinate, Local3i) {
        let res = self.block_resolution;

        (voxel / res, Local3i(voxel.scalar_mod_floor(res)))
    }

    /// The block-local interior voxels, excluding the border.
    #[inline]
    pub fn interior_extent(&self) -> Extent3i {
        Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(self.block_resolution))
    }
}

/// The ordered sequence of `LevelInfo`, computed once when a layer is opened.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LevelGeometry {
    levels: Vec<LevelInfo>,
}

impl LevelGeometry {
    pub fn new(descriptor: &LayerDescriptor) -> Result<Self> {
        descriptor.validate()?;

        let border_size = descriptor.border_size;
        let mut levels = vec![LevelInfo::new(1, descriptor.block_resolution, border_size)];
        loop {
            let prev = levels[levels.len() - 1];
            if prev.block_resolution <= 1 {
                break;
            }
            levels.push(LevelInfo::new(
                prev.voxel_size * 2,
                prev.block_resolution >> 1,
                border_size,
            ));
        }

        Ok(Self { levels })
    }

    #[inline]
    pub fn num_levels(&self) -> u8 {
        self.levels.len() as u8
    }

    #[inline]
    pub fn levels(&self) -> &[LevelInfo] {
        &self.levels
    }

    #[inline]
    pub fn level(&self, level: u8) -> Result<&LevelInfo> {
        self.levels
            .get(level as usize)
            .ok_or(StorageError::LevelOutOfRange {
                level,
                num_levels: self.num_levels(),
            })
    }

    /// Fails unless a buffer of `len` samples is exactly one block at `level`.
    pub fn check_buffer_len(&self, layer: &str, level: u8, len: usize) -> Result<()> {
        let expected = self.level(level)?.voxel_count;
        if len != expected {
            return Err(StorageError::BufferSizeMismatch {
                layer: layer.to_owned(),
                level,
                expected,
                actual: len,
            });
        }

        Ok(())
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
