use crate::extent_is_empty;

use shards_core::prelude::*;
use shards_storage::{AxisMask, BlockRead, Result, ScopedBlockCache};

use tracing::debug;

/// The XY offsets with Chebyshev norm exactly `radius`, i.e. the boundary of the square of side `2 * radius + 1`.
pub fn ring_offsets(radius: i32) -> impl Iterator<Item = Point2i> {
    Extent2i::from_min_and_max(Point2i::fill(-radius), Point2i::fill(radius))
        .iter_points()
        .filter(move |p| p.chebyshev_norm() == radius)
}

/// Searches for the nearest non-empty voxel column in the XY plane around `min_corner`, and returns its Euclidean distance.
///
/// A column at XY offset `d` holds the voxels `min_corner + (d.x, d.y, 0..z_height)`. Columns are visited in square rings
/// of increasing Chebyshev radius, up to `max_distance`. The search stops at the end of the first ring that holds any
/// non-empty column, returning the smallest distance in that ring. A column in the next ring can be closer in Euclidean
/// distance, so the result is at most `sqrt(2)` times the true nearest distance.
///
/// The result never exceeds `max_distance`: a hit in the corner of a ring can be farther than `max_distance`, and is
/// reported as `max_distance`, the same as if every column within the radius were empty.
pub fn find_max_gap<S>(
    storage: S,
    layer: &str,
    level: u8,
    min_corner: Point3i,
    z_height: i32,
    max_distance: i32,
) -> Result<f32>
where
    S: BlockRead,
{
    let mut cache = ScopedBlockCache::new(storage, layer, level, AxisMask::orthogonal_to(Axis3::Z))?;

    for radius in 0..=max_distance {
        let mut nearest: Option<f32> = None;
        for offset in ring_offsets(radius) {
            let column = Extent3i::from_min_and_shape(
                min_corner + PointN([offset.x(), offset.y(), 0]),
                PointN([1, 1, z_height]),
            );
            if !extent_is_empty(&mut cache, &column)? {
                let distance = offset.norm();
                nearest = Some(nearest.map_or(distance, |n| n.min(distance)));
            }
        }
        if let Some(distance) = nearest {
            debug!(radius, distance, stats = ?cache.stats(), "found ring gap");
            return Ok(distance.min(max_distance as f32));
        }
    }

    Ok(max_distance as f32)
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝

#[cfg(test)]
mod test {
    use super::*;

    use shards_storage::{generate_mipmaps, BlockHashMap, MaxDownsampler};
    use utilities::data_sets::{empty_volume, random_volume, write_voxels, DENSITY_LAYER};

    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn volume() -> BlockHashMap {
        empty_volume(
            Extent3i::from_min_and_shape(Point3i::fill(-2), Point3i::fill(4)),
            8,
            0,
        )
    }

    /// The exact nearest non-empty column, by checking every column in the square of radius `max_distance`.
    fn brute_force_nearest_column(
        map: &BlockHashMap,
        min_corner: Point3i,
        z_height: i32,
        max_distance: i32,
    ) -> Option<f32> {
        let mut cache = ScopedBlockCache::new(map, DENSITY_LAYER, 0, AxisMask::ALL).unwrap();
        let square = Extent2i::from_min_and_max(
            Point2i::fill(-max_distance),
            Point2i::fill(max_distance),
        );

        let mut nearest: Option<f32> = None;
        for offset in square.iter_points() {
            let column = Extent3i::from_min_and_shape(
                min_corner + PointN([offset.x(), offset.y(), 0]),
                PointN([1, 1, z_height]),
            );
            if !extent_is_empty(&mut cache, &column).unwrap() {
                let d = offset.norm();
                nearest = Some(nearest.map_or(d, |n: f32| n.min(d)));
            }
        }

        nearest
    }

    #[test]
    fn ring_offsets_are_the_square_boundary() {
        assert_eq!(ring_offsets(0).collect::<Vec<_>>(), vec![Point2i::ZERO]);

        for radius in 1..5 {
            let ring: HashSet<Point2i> = ring_offsets(radius).collect();
            assert_eq!(ring.len() as i32, 8 * radius);
            assert!(ring.iter().all(|p| p.x().abs() == radius || p.y().abs() == radius));
        }
    }

    #[test]
    fn empty_volume_returns_max_distance() {
        let map = volume();

        let gap = find_max_gap(&map, DENSITY_LAYER, 0, PointN([3, -4, 0]), 4, 6).unwrap();

        assert_eq!(gap, 6.0);
    }

    #[test]
    fn single_column_at_known_offset() {
        let mut map = volume();
        let min_corner = PointN([-2, 1, 5]);
        write_voxels(&mut map, vec![(min_corner + PointN([3, -4, 2]), 1)]);

        let gap = find_max_gap(&map, DENSITY_LAYER, 0, min_corner, 3, 10).unwrap();

        assert_eq!(gap, 5.0);
        assert_eq!(
            brute_force_nearest_column(&map, min_corner, 3, 10),
            Some(5.0)
        );
    }

    #[test]
    fn corner_hit_beyond_the_bound_is_capped() {
        let mut map = volume();
        write_voxels(&mut map, vec![(PointN([4, 4, 0]), 1)]);

        let empty_gap = find_max_gap(&volume(), DENSITY_LAYER, 0, Point3i::ZERO, 1, 4).unwrap();
        let gap = find_max_gap(&map, DENSITY_LAYER, 0, Point3i::ZERO, 1, 4).unwrap();

        assert_eq!(empty_gap, 4.0);
        assert_eq!(gap, 4.0);
        assert_eq!(
            find_max_gap(&map, DENSITY_LAYER, 0, Point3i::ZERO, 1, 6).unwrap(),
            (32.0f32).sqrt()
        );
    }

    #[test]
    fn density_above_the_column_is_ignored() {
        let mut map = volume();
        write_voxels(&mut map, vec![(PointN([1, 0, 3]), 1)]);

        assert_eq!(
            find_max_gap(&map, DENSITY_LAYER, 0, Point3i::ZERO, 3, 4).unwrap(),
            4.0
        );
        assert_eq!(
            find_max_gap(&map, DENSITY_LAYER, 0, Point3i::ZERO, 4, 4).unwrap(),
            1.0
        );
    }

    #[test]
    fn non_empty_reference_column_has_zero_gap() {
        let mut map = volume();
        write_voxels(&mut map, vec![(PointN([0, 0, 1]), 1), (PointN([1, 0, 0]), 1)]);

        assert_eq!(
            find_max_gap(&map, DENSITY_LAYER, 0, Point3i::ZERO, 2, 4).unwrap(),
            0.0
        );
    }

    #[test]
    fn stops_at_the_first_ring_with_a_hit() {
        let mut map = volume();
        // Chebyshev radius 4 but Euclidean distance 5.66, and Chebyshev radius 5 with Euclidean distance 5.
        write_voxels(&mut map, vec![(PointN([4, 4, 0]), 1), (PointN([-5, 0, 0]), 1)]);

        let gap = find_max_gap(&map, DENSITY_LAYER, 0, Point3i::ZERO, 1, 10).unwrap();

        assert_eq!(gap, (32.0f32).sqrt());
        assert_eq!(
            brute_force_nearest_column(&map, Point3i::ZERO, 1, 10),
            Some(5.0)
        );
    }

    #[test]
    fn ring_search_is_within_sqrt_2_of_brute_force() {
        for seed in 0..5 {
            let map = random_volume(
                Extent3i::from_min_and_shape(Point3i::fill(-1), Point3i::fill(2)),
                8,
                0,
                0.002,
                seed,
            );
            let min_corner = PointN([0, 0, -4]);

            let ring = find_max_gap(&map, DENSITY_LAYER, 0, min_corner, 8, 7).unwrap();
            match brute_force_nearest_column(&map, min_corner, 8, 7) {
                Some(exact) => {
                    assert!(ring <= 7.0);
                    assert!(ring >= exact.min(7.0));
                    assert!(ring <= exact * 2.0f32.sqrt() + 1e-4);
                }
                None => assert_eq!(ring, 7.0),
            }
        }
    }

    #[test]
    fn coarse_level_uses_level_local_voxels() {
        let mut map = volume();
        write_voxels(&mut map, vec![(PointN([6, 0, 0]), 1)]);
        generate_mipmaps(&mut map, DENSITY_LAYER, &MaxDownsampler).unwrap();

        // Level 1 voxel (3, 0, 0) covers level 0 voxels (6..8, 0..2, 0..2).
        assert_eq!(
            find_max_gap(&map, DENSITY_LAYER, 1, Point3i::ZERO, 1, 10).unwrap(),
            3.0
        );
    }
}
