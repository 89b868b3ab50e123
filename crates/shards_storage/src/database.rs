pub use sled;

use crate::{
    storage::{unknown_layer, LayerShape},
    validate_block_id_range, BlockIdRange, BlockKey, BlockRead, BlockWrite, BytesCompression, Density, LayerDescriptor,
    Result, SmallKeyHashMap, StorageError,
};

use shards_core::prelude::*;

use sled::{Db, IVec, Tree};
use tracing::{debug, info};

const META_TREE: &str = "meta";
const BLOCK_ID_RANGE_KEY: &str = "block_id_range";
const LAYER_KEY_PREFIX: &str = "layer/";
const BLOCK_TREE_PREFIX: &str = "blocks/";

/// 1 byte for the level and 12 for the Morton code.
pub type BlockKeyBytes = [u8; 1 + Morton3::NUM_BYTES];

/// A persistent, crash-consistent store of compressed density blocks, backed by the `sled` crate.
///
/// Each layer has its own tree. Keys are the level followed by the big-endian Morton code of the block coordinate, so all
/// blocks of one level are contiguous, and blocks that are close in space tend to be close in the key space.
///
/// The block id range and every layer descriptor live in a separate metadata tree, encoded with `bincode`.
///
/// Values are only portable across machines with the same endianness, since samples are stored as native-endian bytes.
pub struct BlockDb<Compr> {
    db: Db,
    meta: Tree,
    block_id_range: BlockIdRange,
    layers: SmallKeyHashMap<String, DbLayer>,
    compression: Compr,
}

struct DbLayer {
    shape: LayerShape,
    tree: Tree,
}

impl<Compr> BlockDb<Compr>
where
    Compr: BytesCompression,
{
    /// Initializes the metadata of a new block database. Any layers that already exist in `db` are kept.
    pub fn create(db: Db, block_id_range: BlockIdRange, compression: Compr) -> Result<Self> {
        validate_block_id_range(&block_id_range)?;
        let meta = db.open_tree(META_TREE)?;
        meta.insert(BLOCK_ID_RANGE_KEY, bincode::serialize(&block_id_range)?)?;

        Self::open(db, compression)
    }

    /// Opens a database that was previously initialized with `create`.
    pub fn open(db: Db, compression: Compr) -> Result<Self> {
        let meta = db.open_tree(META_TREE)?;
        let range_bytes = meta
            .get(BLOCK_ID_RANGE_KEY)?
            .ok_or(StorageError::MissingMetadata(BLOCK_ID_RANGE_KEY))?;
        let block_id_range: BlockIdRange = bincode::deserialize(&range_bytes)?;
        validate_block_id_range(&block_id_range)?;

        let mut layers = SmallKeyHashMap::default();
        for entry in meta.scan_prefix(LAYER_KEY_PREFIX) {
            let (key, value) = entry?;
            let name = String::from_utf8_lossy(&key[LAYER_KEY_PREFIX.len()..]).into_owned();
            let descriptor: LayerDescriptor = bincode::deserialize(&value)?;
            let tree = db.open_tree(block_tree_name(&name))?;
            layers.insert(
                name,
                DbLayer {
                    shape: LayerShape::new(descriptor)?,
                    tree,
                },
            );
        }

        info!(
            layers = layers.len(),
            ?block_id_range,
            "opened block database"
        );

        Ok(Self {
            db,
            meta,
            block_id_range,
            layers,
            compression,
        })
    }

    pub fn add_layer(&mut self, name: &str, descriptor: LayerDescriptor) -> Result<()> {
        if self.layers.contains_key(name) {
            return Err(StorageError::DuplicateLayer(name.to_owned()));
        }
        let shape = LayerShape::new(descriptor)?;

        self.meta.insert(
            format!("{}{}", LAYER_KEY_PREFIX, name),
            bincode::serialize(&descriptor)?,
        )?;
        let tree = self.db.open_tree(block_tree_name(name))?;
        debug!(
            layer = name,
            levels = shape.geometry.num_levels(),
            "adding layer"
        );
        self.layers.insert(name.to_owned(), DbLayer { shape, tree });

        Ok(())
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(|k| k.as_str())
    }

    pub fn layer_shape(&self, layer: &str) -> Result<&LayerShape> {
        self.get_layer(layer).map(|l| &l.shape)
    }

    /// The keys of every stored block of `layer` at `level`, in Morton order.
    pub fn block_keys(&self, layer: &str, level: u8) -> Result<Vec<BlockKey>> {
        let db_layer = self.get_layer(layer)?;
        db_layer.shape.geometry.level(level)?;

        db_layer
            .tree
            .scan_prefix([level])
            .keys()
            .map(|k| block_key_from_bytes(&k?))
            .collect()
    }

    pub fn num_blocks(&self, layer: &str) -> Result<usize> {
        Ok(self.get_layer(layer)?.tree.len())
    }

    /// Flushes all dirty IO buffers to disk, returning the number of bytes flushed.
    pub fn flush(&self) -> Result<usize> {
        Ok(self.db.flush()?)
    }

    fn get_layer(&self, layer: &str) -> Result<&DbLayer> {
        self.layers.get(layer).ok_or_else(|| unknown_layer(layer))
    }

    fn decompress_into(key: BlockKey, compressed: &IVec, out: &mut [Density]) -> Result<()> {
        let mut bytes = Vec::with_capacity(out.len() * std::mem::size_of::<Density>());
        Compr::decompress_bytes(compressed, &mut bytes)?;

        let out_bytes: &mut [u8] = bytemuck::cast_slice_mut(out);
        if bytes.len() != out_bytes.len() {
            return Err(StorageError::CorruptBlock(format!(
                "{:?} decompressed to {} bytes, expected {}",
                key,
                bytes.len(),
                out_bytes.len()
            )));
        }
        out_bytes.copy_from_slice(&bytes);

        Ok(())
    }
}

impl<Compr> BlockRead for BlockDb<Compr>
where
    Compr: BytesCompression,
{
    fn layer_descriptor(&self, layer: &str) -> Result<LayerDescriptor> {
        self.layer_shape(layer).map(|s| s.descriptor)
    }

    fn block_id_range(&self) -> BlockIdRange {
        self.block_id_range
    }

    fn has_block(&self, layer: &str, key: BlockKey) -> Result<bool> {
        let db_layer = self.get_layer(layer)?;
        db_layer.shape.geometry.level(key.level)?;

        Ok(db_layer.tree.contains_key(block_key_bytes(key))?)
    }

    fn read_block(&self, layer: &str, key: BlockKey, out: &mut [Density]) -> Result<()> {
        let db_layer = self.get_layer(layer)?;
        db_layer
            .shape
            .geometry
            .check_buffer_len(layer, key.level, out.len())?;

        match db_layer.tree.get(block_key_bytes(key))? {
            Some(compressed) => Self::decompress_into(key, &compressed, out),
            None => {
                out.fill(0);
                Ok(())
            }
        }
    }
}

impl<Compr> BlockWrite for BlockDb<Compr>
where
    Compr: BytesCompression,
{
    fn write_block(&mut self, layer: &str, key: BlockKey, samples: &[Density]) -> Result<()> {
        let db_layer = self.get_layer(layer)?;
        db_layer
            .shape
            .geometry
            .check_buffer_len(layer, key.level, samples.len())?;

        let mut compressed = Vec::new();
        self.compression
            .compress_bytes(bytemuck::cast_slice(samples), &mut compressed)?;
        debug!(
            layer,
            ?key,
            compressed_bytes = compressed.len(),
            "writing block"
        );
        db_layer.tree.insert(block_key_bytes(key), compressed)?;

        Ok(())
    }
}

fn block_tree_name(layer: &str) -> String {
    format!("{}{}", BLOCK_TREE_PREFIX, layer)
}

pub fn block_key_bytes(key: BlockKey) -> BlockKeyBytes {
    let mut bytes = [0; 1 + Morton3::NUM_BYTES];
    bytes[0] = key.level;
    bytes[1..].copy_from_slice(&Morton3::from(key.coord).to_be_bytes());

    bytes
}

pub fn block_key_from_bytes(bytes: &[u8]) -> Result<BlockKey> {
    if bytes.len() != 1 + Morton3::NUM_BYTES {
        return Err(StorageError::CorruptBlock(format!(
            "key has {} bytes, expected {}",
            bytes.len(),
            1 + Morton3::NUM_BYTES
        )));
    }
    let mut morton_bytes = [0; Morton3::NUM_BYTES];
    morton_bytes.copy_from_slice(&bytes[1..]);

    Ok(BlockKey::new(
        bytes[0],
        Point3i::from(Morton3::from_be_bytes(morton_bytes)),
    ))
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
