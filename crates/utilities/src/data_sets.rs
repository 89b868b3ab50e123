use shards_core::prelude::*;
use shards_storage::{prelude::*, SmallKeyHashMap};

use rand::{rngs::StdRng, Rng, SeedableRng};

// TODO: it would be nice if all crates could share this module, but it causes this issue:
// https://github.com/rust-lang/cargo/issues/6765

pub const DENSITY_LAYER: &str = "density";

/// An in-memory volume with a single, empty `DENSITY_LAYER`.
pub fn empty_volume(
    block_id_range: BlockIdRange,
    block_resolution: i32,
    border_size: i32,
) -> BlockHashMap {
    let mut map = BlockHashMap::new(block_id_range).unwrap();
    map.add_layer(
        DENSITY_LAYER,
        LayerDescriptor::new(block_resolution, border_size).unwrap(),
    )
    .unwrap();

    map
}

/// Writes level 0 voxels of `DENSITY_LAYER`, including their copies in the borders of neighboring blocks.
///
/// Voxels in blocks outside of the block id range are dropped.
pub fn write_voxels(map: &mut BlockHashMap, voxels: impl IntoIterator<Item = (Point3i, Density)>) {
    let shape = map.layer_shape(DENSITY_LAYER).unwrap().clone();
    let level = *shape.geometry.level(0).unwrap();
    let border = Point3i::fill(shape.descriptor.border_size);
    let res = level.block_resolution;
    let block_id_range = map.block_id_range();

    let mut blocks: SmallKeyHashMap<BlockCoordinate, Vec<Density>> = SmallKeyHashMap::default();
    for (voxel, density) in voxels {
        let touched_blocks =
            Extent3i::from_min_and_max((voxel - border) / res, (voxel + border) / res);
        for coord in touched_blocks.iter_points() {
            if !block_id_range.contains(coord) {
                continue;
            }
            let samples = blocks.entry(coord).or_insert_with(|| {
                let mut samples = vec![0; level.voxel_count];
                map.read_block(DENSITY_LAYER, BlockKey::new(0, coord), &mut samples)
                    .unwrap();
                samples
            });
            let padded = voxel - coord * res + border;
            samples[level.layout.stride_from_padded_point(padded).0] = density;
        }
    }

    for (coord, samples) in blocks.into_iter() {
        map.write_block(DENSITY_LAYER, BlockKey::new(0, coord), &samples)
            .unwrap();
    }
}

/// A solid ball of `density` centered at the origin, with just enough blocks to contain it.
pub fn sphere_volume(
    radius: i32,
    density: Density,
    block_resolution: i32,
    border_size: i32,
) -> BlockHashMap {
    let block_id_range = Extent3i::from_min_and_max(
        Point3i::fill(-radius) / block_resolution,
        Point3i::fill(radius) / block_resolution,
    );
    let mut map = empty_volume(block_id_range, block_resolution, border_size);

    let ball_extent = Extent3i::from_min_and_max(Point3i::fill(-radius), Point3i::fill(radius));
    write_voxels(
        &mut map,
        ball_extent
            .iter_points()
            .filter(|p| p.norm() < radius as f32)
            .map(|p| (p, density)),
    );

    map
}

/// Every level 0 voxel in the block id range is non-empty with probability `fill_probability`.
pub fn random_volume(
    block_id_range: BlockIdRange,
    block_resolution: i32,
    border_size: i32,
    fill_probability: f64,
    seed: u64,
) -> BlockHashMap {
    let mut map = empty_volume(block_id_range, block_resolution, border_size);
    let mut rng = StdRng::seed_from_u64(seed);

    let voxel_extent = Extent3i::from_min_and_shape(
        block_id_range.minimum * block_resolution,
        block_id_range.shape * block_resolution,
    );
    let voxels: Vec<(Point3i, Density)> = voxel_extent
        .iter_points()
        .filter_map(|p| {
            if rng.gen_bool(fill_probability) {
                Some((p, rng.gen_range(1..=Density::MAX)))
            } else {
                None
            }
        })
        .collect();
    write_voxels(&mut map, voxels);

    map
}
