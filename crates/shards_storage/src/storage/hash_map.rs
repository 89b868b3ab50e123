use super::{unknown_layer, BlockRead, BlockWrite, LayerShape};

use crate::{
    validate_block_id_range, BlockIdRange, BlockKey, Density, LayerDescriptor, Result,
    SmallKeyHashMap, StorageError,
};

use tracing::debug;

/// An in-memory block store. One hash map of blocks per layer.
#[derive(Clone, Debug)]
pub struct BlockHashMap {
    block_id_range: BlockIdRange,
    layers: SmallKeyHashMap<String, HashMapLayer>,
}

#[derive(Clone, Debug)]
struct HashMapLayer {
    shape: LayerShape,
    blocks: SmallKeyHashMap<BlockKey, Vec<Density>>,
}

impl BlockHashMap {
    pub fn new(block_id_range: BlockIdRange) -> Result<Self> {
        validate_block_id_range(&block_id_range)?;

        Ok(Self {
            block_id_range,
            layers: Default::default(),
        })
    }

    pub fn add_layer(&mut self, name: &str, descriptor: LayerDescriptor) -> Result<()> {
        if self.layers.contains_key(name) {
            return Err(StorageError::DuplicateLayer(name.to_owned()));
        }
        let shape = LayerShape::new(descriptor)?;
        debug!(
            layer = name,
            levels = shape.geometry.num_levels(),
            "adding layer"
        );
        self.layers.insert(
            name.to_owned(),
            HashMapLayer {
                shape,
                blocks: Default::default(),
            },
        );

        Ok(())
    }

    pub fn layer_shape(&self, layer: &str) -> Result<&LayerShape> {
        self.get_layer(layer).map(|l| &l.shape)
    }

    pub fn num_blocks(&self, layer: &str) -> Result<usize> {
        self.get_layer(layer).map(|l| l.blocks.len())
    }

    pub fn block_keys<'a>(&'a self, layer: &str) -> Result<impl Iterator<Item = &'a BlockKey>> {
        self.get_layer(layer).map(|l| l.blocks.keys())
    }

    /// Borrows the samples of a stored block, if it exists.
    pub fn get_block(&self, layer: &str, key: BlockKey) -> Result<Option<&[Density]>> {
        self.get_layer(layer)
            .map(|l| l.blocks.get(&key).map(|b| b.as_slice()))
    }

    fn get_layer(&self, layer: &str) -> Result<&HashMapLayer> {
        self.layers.get(layer).ok_or_else(|| unknown_layer(layer))
    }
}

impl BlockRead for BlockHashMap {
    fn layer_descriptor(&self, layer: &str) -> Result<LayerDescriptor> {
        self.layer_shape(layer).map(|s| s.descriptor)
    }

    fn block_id_range(&self) -> BlockIdRange {
        self.block_id_range
    }

    fn has_block(&self, layer: &str, key: BlockKey) -> Result<bool> {
        let layer = self.get_layer(layer)?;
        layer.shape.geometry.level(key.level)?;

        Ok(layer.blocks.contains_key(&key))
    }

    fn read_block(&self, layer: &str, key: BlockKey, out: &mut [Density]) -> Result<()> {
        let hash_layer = self.get_layer(layer)?;
        hash_layer
            .shape
            .geometry
            .check_buffer_len(layer, key.level, out.len())?;

        match hash_layer.blocks.get(&key) {
            Some(samples) => out.copy_from_slice(samples),
            None => out.fill(0),
        }

        Ok(())
    }
}

impl BlockWrite for BlockHashMap {
    fn write_block(&mut self, layer: &str, key: BlockKey, samples: &[Density]) -> Result<()> {
        let hash_layer = self
            .layers
            .get_mut(layer)
            .ok_or_else(|| unknown_layer(layer))?;
        hash_layer
            .shape
            .geometry
            .check_buffer_len(layer, key.level, samples.len())?;

        hash_layer.blocks.insert(key, samples.to_vec());

        Ok(())
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    use shards_core::prelude::*;

    fn range() -> BlockIdRange {
        Extent3i::from_min_and_shape(Point3i::fill(-1), Point3i::fill(2))
    }

    #[test]
    fn absent_block_reads_as_zeros() {
        let mut map = BlockHashMap::new(range()).unwrap();
        map.add_layer("density", LayerDescriptor::new(4, 1).unwrap())
            .unwrap();

        let key = BlockKey::new(0, Point3i::ZERO);
        let mut out = vec![7; 6 * 6 * 6];
        map.read_block("density", key, &mut out).unwrap();

        assert!(!map.has_block("density", key).unwrap());
        assert!(out.iter().all(|s| *s == 0));
    }

    #[test]
    fn write_then_read() {
        let mut map = BlockHashMap::new(range()).unwrap();
        map.add_layer("density", LayerDescriptor::new(4, 0).unwrap())
            .unwrap();

        let key = BlockKey::new(1, PointN([-1, 0, 0]));
        let samples: Vec<Density> = (0..8).collect();
        map.write_block("density", key, &samples).unwrap();

        let mut out = vec![0; 8];
        map.read_block("density", key, &mut out).unwrap();

        assert!(map.has_block("density", key).unwrap());
        assert!(!map.has_block("density", BlockKey::new(0, key.coord)).unwrap());
        assert_eq!(out, samples);
        assert_eq!(map.num_blocks("density").unwrap(), 1);
        assert_eq!(map.block_keys("density").unwrap().next(), Some(&key));
    }

    #[test]
    fn wrong_buffer_size_is_rejected() {
        let mut map = BlockHashMap::new(range()).unwrap();
        map.add_layer("density", LayerDescriptor::new(4, 0).unwrap())
            .unwrap();

        let key = BlockKey::new(0, Point3i::ZERO);
        assert!(matches!(
            map.write_block("density", key, &[1; 8]),
            Err(StorageError::BufferSizeMismatch { .. })
        ));
        assert!(matches!(
            map.read_block("density", key, &mut [0; 65]),
            Err(StorageError::BufferSizeMismatch { .. })
        ));
    }

    #[test]
    fn unknown_and_duplicate_layers() {
        let mut map = BlockHashMap::new(range()).unwrap();
        let descriptor = LayerDescriptor::new(4, 0).unwrap();
        map.add_layer("density", descriptor).unwrap();

        assert!(matches!(
            map.add_layer("density", descriptor),
            Err(StorageError::DuplicateLayer(_))
        ));
        assert!(matches!(
            map.layer_descriptor("material"),
            Err(StorageError::UnknownLayer(_))
        ));
        assert!(matches!(
            map.has_block("density", BlockKey::new(9, Point3i::ZERO)),
            Err(StorageError::LevelOutOfRange { .. })
        ));
    }

    #[test]
    fn invalid_block_id_ranges_are_rejected() {
        let ranges = [
            Extent3i::from_min_and_shape(Point3i::ZERO, PointN([2, 0, 2])),
            Extent3i::from_min_and_shape(Point3i::ZERO, PointN([2, -3, 2])),
            Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(2048)),
            Extent3i::from_min_and_shape(PointN([i32::MAX, 0, 0]), Point3i::fill(1)),
        ];

        for range in ranges.iter() {
            assert!(
                matches!(
                    BlockHashMap::new(*range),
                    Err(StorageError::InvalidBlockIdRange(_))
                ),
                "range = {:?}",
                range
            );
        }
        assert!(BlockHashMap::new(Extent3i::from_min_and_shape(Point3i::fill(-1), Point3i::ONES)).is_ok());
    }

    #[test]
    fn reads_through_references() {
        let mut map = BlockHashMap::new(range()).unwrap();
        map.add_layer("density", LayerDescriptor::new(2, 0).unwrap())
            .unwrap();

        fn write_one(mut storage: impl BlockWrite) {
            storage
                .write_block("density", BlockKey::new(1, Point3i::ZERO), &[5])
                .unwrap();
        }
        fn read_one(storage: impl BlockRead) -> Density {
            let mut out = [0];
            storage
                .read_block("density", BlockKey::new(1, Point3i::ZERO), &mut out)
                .unwrap();
            out[0]
        }

        write_one(&mut map);
        assert_eq!(read_one(&map), 5);
    }
}
