use shards_core::prelude::*;
use shards_storage::prelude::*;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use utilities::data_sets::{random_volume, DENSITY_LAYER};

fn generate_mipmaps_random_volume(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_mipmaps_random_volume");

    for blocks_per_edge in [1, 2, 4].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(blocks_per_edge),
            blocks_per_edge,
            |b, &blocks_per_edge| {
                let range =
                    Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(blocks_per_edge));
                let volume = random_volume(range, 16, 1, 0.3, 0);

                b.iter_with_setup(
                    || volume.clone(),
                    |mut volume| {
                        generate_mipmaps(&mut volume, DENSITY_LAYER, &MaxDownsampler).unwrap()
                    },
                );
            },
        );
    }
    group.finish();
}

fn dense_cache_get_voxel(c: &mut Criterion) {
    let range = Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(2));
    let volume = random_volume(range, 16, 1, 0.3, 0);
    let voxels = Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(32));

    c.bench_function("dense_cache_get_voxel", |b| {
        b.iter_with_setup(
            || DenseBlockCache::new(&volume, DENSITY_LAYER).unwrap(),
            |mut cache| {
                for p in voxels.iter_points() {
                    cache.get_voxel_at(0, p).unwrap();
                }
            },
        );
    });
}

criterion_group!(benches, generate_mipmaps_random_volume, dense_cache_get_voxel);
criterion_main!(benches);
