use shards_core::prelude::*;
use shards_search::{find_max_gap, find_max_gap_along_axis};
use shards_storage::{prelude::*, sled};

use utilities::data_sets::{sphere_volume, DENSITY_LAYER};

#[test]
fn persist_mipmap_and_query() {
    let sphere = sphere_volume(12, 1000, 8, 1);
    let descriptor = sphere.layer_descriptor(DENSITY_LAYER).unwrap();

    let db = sled::Config::default().temporary(true).open().unwrap();
    let mut block_db = BlockDb::create(db, sphere.block_id_range(), Lz4 { level: 10 }).unwrap();
    block_db.add_layer(DENSITY_LAYER, descriptor).unwrap();
    let voxel_count = block_db
        .layer_shape(DENSITY_LAYER)
        .unwrap()
        .geometry
        .level(0)
        .unwrap()
        .voxel_count;
    for key in sphere.block_keys(DENSITY_LAYER).unwrap() {
        let mut samples = vec![0; voxel_count];
        sphere.read_block(DENSITY_LAYER, *key, &mut samples).unwrap();
        block_db.write_block(DENSITY_LAYER, *key, &samples).unwrap();
    }

    let report = generate_mipmaps(&mut block_db, DENSITY_LAYER, &MaxDownsampler).unwrap();
    assert!(report.written > 0);
    assert_eq!(
        generate_mipmaps(&mut block_db, DENSITY_LAYER, &MaxDownsampler)
            .unwrap()
            .written,
        0
    );

    // The ball fills the origin at every level.
    let mut cache = DenseBlockCache::new(&block_db, DENSITY_LAYER).unwrap();
    for level in 0..cache.geometry().num_levels() {
        assert_eq!(cache.get_voxel(level, PointN([0.5, 0.5, 0.5])).unwrap(), 1000);
    }
    assert_eq!(cache.get_voxel(0, PointN([15.5, 15.5, 15.5])).unwrap(), 0);

    // Straight down from above the ball, the first density is at z = 11.
    let gap = find_max_gap_along_axis(
        &block_db,
        DENSITY_LAYER,
        0,
        PointN([0, 0, 15]),
        PointN([0, 0, 15]),
        SignedAxis3::negative(Axis3::Z),
        64,
    )
    .unwrap();
    assert_eq!(gap, 4);

    // The column through the center is full.
    let ring = find_max_gap(&block_db, DENSITY_LAYER, 0, PointN([0, 0, -4]), 8, 16).unwrap();
    assert_eq!(ring, 0.0);
}
