use super::{fetch_block, CacheEntry, CacheStats};

use crate::{
    storage::level_geometry, validate_block_id_range, BlockBuffer, BlockCoordinate, BlockIdRange, BlockKey, BlockRead,
    Density, LevelGeometry, Result,
};

use shards_core::prelude::*;

use tracing::debug;

/// A cache with a slot for every block coordinate in the block id range, at every level.
///
/// Each slot is filled at most once, so no block is ever read from storage more than once for the lifetime of the cache.
/// Coordinates outside of the block id range are treated as absent without consulting storage.
pub struct DenseBlockCache<S> {
    storage: S,
    layer: String,
    geometry: LevelGeometry,
    block_id_range: BlockIdRange,
    num_blocks_per_level: usize,
    entries: Vec<CacheEntry>,
    stats: CacheStats,
}

impl<S> DenseBlockCache<S>
where
    S: BlockRead,
{
    pub fn new(storage: S, layer: &str) -> Result<Self> {
        let geometry = level_geometry(&storage, layer)?;
        let block_id_range = storage.block_id_range();
        validate_block_id_range(&block_id_range)?;
        let num_blocks_per_level = block_id_range.num_points();

        let entries: Vec<CacheEntry> = (0..geometry.num_levels())
            .flat_map(|_| block_id_range.iter_points().map(CacheEntry::empty))
            .collect();
        debug!(
            layer,
            slots = entries.len(),
            levels = geometry.num_levels(),
            "built dense block cache"
        );

        Ok(Self {
            storage,
            layer: layer.to_owned(),
            geometry,
            block_id_range,
            num_blocks_per_level,
            entries,
            stats: CacheStats::default(),
        })
    }

    /// The block at `(level, coord)`, or `None` if it does not exist.
    pub fn get_block(&mut self, level: u8, coord: BlockCoordinate) -> Result<Option<&BlockBuffer>> {
        let voxel_count = self.geometry.level(level)?.voxel_count;
        let index = match self.slot_index(level, coord) {
            Some(i) => i,
            None => return Ok(None),
        };

        let entry = &mut self.entries[index];
        if entry.cached {
            self.stats.hits += 1;
        } else {
            entry.data = fetch_block(
                &self.storage,
                &self.layer,
                BlockKey::new(level, coord),
                voxel_count,
                &mut self.stats,
            )?;
            entry.cached = true;
        }

        Ok(entry.data.as_ref())
    }

    /// The density of the `level` voxel containing the world-space `position`. Zero if the block is absent.
    pub fn get_voxel(&mut self, level: u8, position: Point3f) -> Result<Density> {
        let voxel = self
            .geometry
            .level(level)?
            .voxel_containing_world_point(position);

        self.get_voxel_at(level, voxel)
    }

    /// The density of a voxel in the level-local voxel space of `level`. Zero if the block is absent.
    pub fn get_voxel_at(&mut self, level: u8, voxel: Point3i) -> Result<Density> {
        let info = *self.geometry.level(level)?;
        let (coord, local) = info.split_voxel(voxel);

        Ok(self
            .get_block(level, coord)?
            .map(|b| b.get(info.layout.stride_from_local_point(local)))
            .unwrap_or(0))
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn geometry(&self) -> &LevelGeometry {
        &self.geometry
    }

    /// Forgets every cached block, so the next access of each block reads from storage again.
    pub fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.data = None;
            entry.cached = false;
        }
    }

    /// `x + y * size_x + z * size_x * size_y` within the level's slab.
    fn slot_index(&self, level: u8, coord: BlockCoordinate) -> Option<usize> {
        if !self.block_id_range.contains(coord) {
            return None;
        }
        let local = coord - self.block_id_range.minimum;
        let shape = self.block_id_range.shape;
        let in_level = local.x() + local.y() * shape.x() + local.z() * shape.x() * shape.y();

        Some(level as usize * self.num_blocks_per_level + in_level as usize)
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
