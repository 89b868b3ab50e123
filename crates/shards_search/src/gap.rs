use shards_core::prelude::*;
use shards_storage::{AxisMask, BlockRead, CacheKeyMatch, Result, ScopedBlockCache};

use tracing::debug;

/// Returns `true` iff every voxel in `extent` has zero density. Stops at the first non-empty voxel.
pub fn extent_is_empty<S, M>(cache: &mut ScopedBlockCache<S, M>, extent: &Extent3i) -> Result<bool>
where
    S: BlockRead,
    M: CacheKeyMatch,
{
    for p in extent.iter_points() {
        if cache.get_voxel(p)? != 0 {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Slides the box `[min_corner, max_corner]` one voxel at a time along `direction`, and returns the number of steps `i`
/// at which the box first contains a non-empty voxel. Returns `max_distance` if the box stays empty.
///
/// The scan only revisits the blocks that the box covers, so the block cache is only unique on the axes orthogonal to
/// `direction`.
pub fn find_max_gap_along_axis<S>(
    storage: S,
    layer: &str,
    level: u8,
    min_corner: Point3i,
    max_corner: Point3i,
    direction: SignedAxis3,
    max_distance: i32,
) -> Result<i32>
where
    S: BlockRead,
{
    let mut cache = ScopedBlockCache::new(
        storage,
        layer,
        level,
        AxisMask::orthogonal_to(direction.axis()),
    )?;
    let extent = Extent3i::from_min_and_max(min_corner, max_corner);
    let step = direction.get_vector();

    for i in 0..max_distance {
        if !extent_is_empty(&mut cache, &(extent + step * i))? {
            debug!(distance = i, ?direction, stats = ?cache.stats(), "found axis gap");
            return Ok(i);
        }
    }

    Ok(max_distance)
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
