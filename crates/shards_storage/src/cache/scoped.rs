use super::{fetch_block, CacheEntry, CacheStats};

use crate::{
    storage::level_geometry, BlockBuffer, BlockCoordinate, BlockIdRange, BlockKey, BlockRead,
    Density, LevelInfo, Result,
};

use shards_core::prelude::*;

use tracing::debug;

/// Decides whether a cache slot holding `entry` may serve (or be overwritten by) a query for `query`.
pub trait CacheKeyMatch {
    fn matches(&self, entry: BlockCoordinate, query: BlockCoordinate) -> bool;
}

impl<F> CacheKeyMatch for F
where
    F: Fn(BlockCoordinate, BlockCoordinate) -> bool,
{
    #[inline]
    fn matches(&self, entry: BlockCoordinate, query: BlockCoordinate) -> bool {
        (self)(entry, query)
    }
}

/// Selects which axes distinguish cache slots. Components on unmasked axes are ignored when matching, so a sweep along an
/// unmasked axis keeps reusing the same slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AxisMask {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl AxisMask {
    pub const ALL: Self = Self {
        x: true,
        y: true,
        z: true,
    };

    /// Only the axes orthogonal to `axis` are unique.
    pub fn orthogonal_to(axis: Axis3) -> Self {
        Self {
            x: axis != Axis3::X,
            y: axis != Axis3::Y,
            z: axis != Axis3::Z,
        }
    }
}

impl CacheKeyMatch for AxisMask {
    #[inline]
    fn matches(&self, entry: BlockCoordinate, query: BlockCoordinate) -> bool {
        (!self.x || entry.x() == query.x())
            && (!self.y || entry.y() == query.y())
            && (!self.z || entry.z() == query.z())
    }
}

/// A small cache of blocks at a single level, for query sweeps that revisit nearby blocks.
///
/// Lookup is a linear search for the first slot that `matches` the query coordinate. If that slot holds exactly the query
/// coordinate, it's a hit. Otherwise the slot is refilled from storage. If no slot matches, a new slot is appended.
pub struct ScopedBlockCache<S, M = AxisMask> {
    storage: S,
    layer: String,
    level: u8,
    level_info: LevelInfo,
    block_id_range: BlockIdRange,
    matcher: M,
    entries: Vec<CacheEntry>,
    stats: CacheStats,
}

impl<S, M> ScopedBlockCache<S, M>
where
    S: BlockRead,
    M: CacheKeyMatch,
{
    pub fn new(storage: S, layer: &str, level: u8, matcher: M) -> Result<Self> {
        let geometry = level_geometry(&storage, layer)?;
        let level_info = *geometry.level(level)?;
        let block_id_range = storage.block_id_range();
        debug!(layer, level, "built scoped block cache");

        Ok(Self {
            storage,
            layer: layer.to_owned(),
            level,
            level_info,
            block_id_range,
            matcher,
            entries: Vec::new(),
            stats: CacheStats::default(),
        })
    }

    /// The block at `coord` of this cache's level, or `None` if it does not exist.
    pub fn get_block(&mut self, coord: BlockCoordinate) -> Result<Option<&BlockBuffer>> {
        if !self.block_id_range.contains(coord) {
            return Ok(None);
        }

        let Self {
            storage,
            layer,
            level,
            level_info,
            matcher,
            entries,
            stats,
            ..
        } = self;

        let slot = match entries.iter().position(|e| matcher.matches(e.coord, coord)) {
            Some(i) => i,
            None => {
                entries.push(CacheEntry::empty(coord));
                entries.len() - 1
            }
        };

        let entry = &mut entries[slot];
        if entry.cached && entry.coord == coord {
            stats.hits += 1;
        } else {
            entry.coord = coord;
            entry.data = fetch_block(
                &*storage,
                layer.as_str(),
                BlockKey::new(*level, coord),
                level_info.voxel_count,
                stats,
            )?;
            entry.cached = true;
        }

        Ok(entry.data.as_ref())
    }

    /// The density of a voxel in the level-local voxel space. Zero if the block is absent.
    pub fn get_voxel(&mut self, voxel: Point3i) -> Result<Density> {
        let layout = self.level_info.layout;
        let (coord, local) = self.level_info.split_voxel(voxel);

        Ok(self
            .get_block(coord)?
            .map(|b| b.get(layout.stride_from_local_point(local)))
            .unwrap_or(0))
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn level_info(&self) -> &LevelInfo {
        &self.level_info
    }

    pub fn num_slots(&self) -> usize {
        self.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
