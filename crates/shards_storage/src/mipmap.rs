//! Generation of coarse mip levels from level 0.
//!
//! Block coordinates are level-invariant: the block at `(level, coord)` covers the same world-space box as the block at
//! `(level - 1, coord)`, with half as many voxels per edge. So each mip block is the downsampled image of exactly one
//! block from the level below.
//!
//! Only the interior of a mip block is computed. Its border (ghost) voxels are left as zeros.

use crate::{
    storage::level_geometry, BlockKey, BlockWrite, Density, LevelGeometry, LevelInfo, Local3i,
    PaddedLayout, Result, StorageError, Stride,
};

use shards_core::prelude::*;

use core::ops::AddAssign;
use tracing::{debug, info, info_span};

/// Samples a block at level `L - 1` in order to write the interior of the corresponding block at level `L`.
pub trait BlockDownsampler {
    fn downsample(
        &self,
        src_block: &[Density],
        src_level: &LevelInfo,
        dst_block: &mut [Density],
        dst_level: &LevelInfo,
    );
}

/// The strides from a voxel to each of the 8 voxels of the 2x2x2 cube with that voxel at its minimum.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OctantKernel {
    pub strides: [Stride; 8],
}

impl OctantKernel {
    pub fn new(layout: &PaddedLayout) -> Self {
        let mut strides = [Stride(0); 8];
        for (stride, offset) in strides.iter_mut().zip(Point3i::corner_offsets().iter()) {
            *stride = layout.stride_from_padded_point(*offset);
        }

        Self { strides }
    }
}

/// Each destination voxel takes the maximum density of its 8 children, so any non-empty child keeps the parent non-empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxDownsampler;

impl BlockDownsampler for MaxDownsampler {
    fn downsample(
        &self,
        src_block: &[Density],
        src_level: &LevelInfo,
        dst_block: &mut [Density],
        dst_level: &LevelInfo,
    ) {
        let kernel = OctantKernel::new(&src_level.layout);

        for p in dst_level.interior_extent().iter_points() {
            let src_min = src_level.layout.stride_from_local_point(Local3i(p * 2));
            let max = kernel
                .strides
                .iter()
                .map(|s| src_block[(src_min + *s).0])
                .max()
                .unwrap_or(0);
            dst_block[dst_level.layout.stride_from_local_point(Local3i(p)).0] = max;
        }
    }
}

/// What happened to a single mip block.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MipOutcome {
    Written,
    /// The block already existed at the target level.
    SkippedExisting,
    /// The source block at the level below does not exist, so the mip block would be empty.
    SkippedAbsent,
}

/// Block counts from a run of `generate_mipmaps`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MipReport {
    pub written: usize,
    pub skipped_existing: usize,
    pub skipped_absent: usize,
}

impl MipReport {
    pub fn record(&mut self, outcome: MipOutcome) {
        match outcome {
            MipOutcome::Written => self.written += 1,
            MipOutcome::SkippedExisting => self.skipped_existing += 1,
            MipOutcome::SkippedAbsent => self.skipped_absent += 1,
        }
    }
}

impl AddAssign for MipReport {
    fn add_assign(&mut self, rhs: Self) {
        self.written += rhs.written;
        self.skipped_existing += rhs.skipped_existing;
        self.skipped_absent += rhs.skipped_absent;
    }
}

/// Fills in every missing mip block of `layer`, for levels `1..num_levels`, across the whole block id range.
///
/// Blocks that already exist at the target level are never overwritten, so running this twice is a no-op the second time.
pub fn generate_mipmaps<S, D>(storage: &mut S, layer: &str, sampler: &D) -> Result<MipReport>
where
    S: BlockWrite,
    D: BlockDownsampler,
{
    let geometry = level_geometry(&*storage, layer)?;
    let block_id_range = storage.block_id_range();

    let mut scratch = Scratch::default();
    let mut report = MipReport::default();
    for level in 1..geometry.num_levels() {
        let _span = info_span!("mip_level", layer, level).entered();

        let mut level_report = MipReport::default();
        for coord in block_id_range.iter_points() {
            let key = BlockKey::new(level, coord);
            level_report.record(downsample_with_scratch(
                storage,
                layer,
                &geometry,
                key,
                sampler,
                &mut scratch,
            )?);
        }
        info!(
            written = level_report.written,
            skipped_existing = level_report.skipped_existing,
            skipped_absent = level_report.skipped_absent,
            "generated mip level"
        );

        report += level_report;
    }

    Ok(report)
}

/// Generates the single mip block at `key` from the block at `key.level - 1`, unless it already exists.
///
/// Level 0 has no source level, so `key.level` must be at least 1.
pub fn downsample_block<S, D>(
    storage: &mut S,
    layer: &str,
    geometry: &LevelGeometry,
    key: BlockKey,
    sampler: &D,
) -> Result<MipOutcome>
where
    S: BlockWrite,
    D: BlockDownsampler,
{
    downsample_with_scratch(
        storage,
        layer,
        geometry,
        key,
        sampler,
        &mut Scratch::default(),
    )
}

#[derive(Default)]
struct Scratch {
    src: Vec<Density>,
    dst: Vec<Density>,
}

fn downsample_with_scratch<S, D>(
    storage: &mut S,
    layer: &str,
    geometry: &LevelGeometry,
    key: BlockKey,
    sampler: &D,
    scratch: &mut Scratch,
) -> Result<MipOutcome>
where
    S: BlockWrite,
    D: BlockDownsampler,
{
    if key.level == 0 {
        return Err(StorageError::LevelOutOfRange {
            level: 0,
            num_levels: geometry.num_levels(),
        });
    }
    let dst_level = geometry.level(key.level)?;
    let src_level = geometry.level(key.level - 1)?;
    let src_key = BlockKey::new(key.level - 1, key.coord);

    if storage.has_block(layer, key)? {
        return Ok(MipOutcome::SkippedExisting);
    }
    if !storage.has_block(layer, src_key)? {
        return Ok(MipOutcome::SkippedAbsent);
    }

    scratch.src.resize(src_level.voxel_count, 0);
    storage.read_block(layer, src_key, &mut scratch.src)?;

    scratch.dst.clear();
    scratch.dst.resize(dst_level.voxel_count, 0);
    sampler.downsample(&scratch.src, src_level, &mut scratch.dst, dst_level);

    debug!(?key, "writing mip block");
    storage.write_block(layer, key, &scratch.dst)?;

    Ok(MipOutcome::Written)
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{BlockHashMap, BlockRead, LayerDescriptor};

    use pretty_assertions::assert_eq;

    const LAYER: &str = "density";

    /// Two blocks along X; only the one at the origin has data at level 0.
    fn two_block_volume(border_size: i32) -> BlockHashMap {
        let range = Extent3i::from_min_and_shape(Point3i::ZERO, PointN([2, 1, 1]));
        let mut map = BlockHashMap::new(range).unwrap();
        map.add_layer(LAYER, LayerDescriptor::new(4, border_size).unwrap())
            .unwrap();

        let geometry = map.layer_shape(LAYER).unwrap().geometry.clone();
        let level0 = geometry.level(0).unwrap();
        let mut samples = vec![0; level0.voxel_count];
        for p in level0.interior_extent().iter_points() {
            samples[level0.layout.stride_from_local_point(Local3i(p)).0] = density_at(p);
        }
        map.write_block(LAYER, BlockKey::new(0, Point3i::ZERO), &samples)
            .unwrap();

        map
    }

    fn density_at(p: Point3i) -> Density {
        ((p.x() * 7 + p.y() * 13 + p.z() * 29) % 17) as Density
    }

    fn read(map: &BlockHashMap, key: BlockKey) -> Vec<Density> {
        let level = map
            .layer_shape(LAYER)
            .unwrap()
            .geometry
            .level(key.level)
            .unwrap()
            .voxel_count;
        let mut out = vec![0; level];
        map.read_block(LAYER, key, &mut out).unwrap();
        out
    }

    #[test]
    fn octant_kernel_strides() {
        let kernel = OctantKernel::new(&PaddedLayout::new(4, 1));

        let strides: Vec<usize> = kernel.strides.iter().map(|s| s.0).collect();
        assert_eq!(strides, vec![0, 1, 6, 7, 36, 37, 42, 43]);
    }

    #[test]
    fn mip_voxel_is_max_of_children() {
        let mut map = two_block_volume(0);

        let report = generate_mipmaps(&mut map, LAYER, &MaxDownsampler).unwrap();
        assert_eq!(
            report,
            MipReport {
                written: 2,
                skipped_existing: 0,
                skipped_absent: 2,
            }
        );

        let level1 = read(&map, BlockKey::new(1, Point3i::ZERO));
        let expected_level1: Vec<Density> = Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(2))
            .iter_points()
            .map(|p| {
                Point3i::corner_offsets()
                    .iter()
                    .map(|c| density_at(p * 2 + *c))
                    .max()
                    .unwrap()
            })
            .collect();
        assert_eq!(level1, expected_level1);

        let level2 = read(&map, BlockKey::new(2, Point3i::ZERO));
        assert_eq!(level2, vec![*expected_level1.iter().max().unwrap()]);

        assert!(!map
            .has_block(LAYER, BlockKey::new(1, PointN([1, 0, 0])))
            .unwrap());
    }

    #[test]
    fn generation_is_idempotent() {
        let mut map = two_block_volume(0);
        generate_mipmaps(&mut map, LAYER, &MaxDownsampler).unwrap();
        let before = read(&map, BlockKey::new(1, Point3i::ZERO));

        let report = generate_mipmaps(&mut map, LAYER, &MaxDownsampler).unwrap();

        assert_eq!(report.written, 0);
        assert_eq!(report.skipped_existing, 2);
        assert_eq!(read(&map, BlockKey::new(1, Point3i::ZERO)), before);
    }

    #[test]
    fn existing_mip_blocks_are_not_overwritten() {
        let mut map = two_block_volume(0);
        let key = BlockKey::new(1, Point3i::ZERO);
        map.write_block(LAYER, key, &[42; 8]).unwrap();

        generate_mipmaps(&mut map, LAYER, &MaxDownsampler).unwrap();

        assert_eq!(read(&map, key), vec![42; 8]);
        assert_eq!(read(&map, BlockKey::new(2, Point3i::ZERO)), vec![42]);
    }

    #[test]
    fn mip_borders_are_zero() {
        let mut map = two_block_volume(1);
        generate_mipmaps(&mut map, LAYER, &MaxDownsampler).unwrap();

        let geometry = map.layer_shape(LAYER).unwrap().geometry.clone();
        let level1 = geometry.level(1).unwrap();
        let block = read(&map, BlockKey::new(1, Point3i::ZERO));
        let interior = level1.interior_extent() + Point3i::ONES;
        for p in Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(4)).iter_points() {
            let value = block[level1.layout.stride_from_padded_point(p).0];
            if interior.contains(p) {
                let local = p - Point3i::ONES;
                let expected = Point3i::corner_offsets()
                    .iter()
                    .map(|c| density_at(local * 2 + *c))
                    .max()
                    .unwrap();
                assert_eq!(value, expected);
            } else {
                assert_eq!(value, 0);
            }
        }
    }

    #[test]
    fn level_zero_cannot_be_downsampled() {
        let mut map = two_block_volume(0);
        let geometry = map.layer_shape(LAYER).unwrap().geometry.clone();

        assert!(matches!(
            downsample_block(
                &mut map,
                LAYER,
                &geometry,
                BlockKey::new(0, Point3i::ZERO),
                &MaxDownsampler
            ),
            Err(StorageError::LevelOutOfRange { level: 0, .. })
        ));
        assert_eq!(
            downsample_block(
                &mut map,
                LAYER,
                &geometry,
                BlockKey::new(1, Point3i::ZERO),
                &MaxDownsampler
            )
            .unwrap(),
            MipOutcome::Written
        );
    }
}
