pub mod hash_map;

pub use hash_map::*;

use crate::{
    BlockIdRange, BlockKey, Density, LayerDescriptor, LevelGeometry, Result, StorageError,
};

use auto_impl::auto_impl;

/// Read access to a backing store of bordered density blocks, addressed by layer name and `BlockKey`.
///
/// Absent blocks are not an error. They are simply empty space, and `read_block` fills the output with zeros.
#[auto_impl(&, &mut)]
pub trait BlockRead {
    fn layer_descriptor(&self, layer: &str) -> Result<LayerDescriptor>;

    /// The range of block coordinates that may hold data, at every level.
    fn block_id_range(&self) -> BlockIdRange;

    fn has_block(&self, layer: &str, key: BlockKey) -> Result<bool>;

    /// Copies the block at `key` into `out`, or zero-fills `out` if the block does not exist.
    ///
    /// `out` must hold exactly `LevelInfo::voxel_count` samples for `key.level`.
    fn read_block(&self, layer: &str, key: BlockKey, out: &mut [Density]) -> Result<()>;
}

/// Write access to a backing store of density blocks.
#[auto_impl(&mut)]
pub trait BlockWrite: BlockRead {
    /// Creates or overwrites the block at `key`. `samples` must hold exactly `LevelInfo::voxel_count` samples.
    fn write_block(&mut self, layer: &str, key: BlockKey, samples: &[Density]) -> Result<()>;
}

/// The descriptor of a layer along with its derived level geometry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LayerShape {
    pub descriptor: LayerDescriptor,
    pub geometry: LevelGeometry,
}

impl LayerShape {
    pub fn new(descriptor: LayerDescriptor) -> Result<Self> {
        let geometry = LevelGeometry::new(&descriptor)?;

        Ok(Self {
            descriptor,
            geometry,
        })
    }
}

/// Loads the `LevelGeometry` for `layer` of `storage`.
pub fn level_geometry(storage: &impl BlockRead, layer: &str) -> Result<LevelGeometry> {
    LevelGeometry::new(&storage.layer_descriptor(layer)?)
}

pub(crate) fn unknown_layer(layer: &str) -> StorageError {
    StorageError::UnknownLayer(layer.to_owned())
}
