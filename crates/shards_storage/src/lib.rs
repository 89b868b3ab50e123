//! Sparse, block-structured storage of 3D density volumes, with coarser mip levels and block caches for queries.
//!
//! A volume is a set of named layers. Each layer is a sparse grid of fixed-size cubic blocks of `u16` density samples,
//! padded with a border of ghost voxels. Blocks are addressed by a `BlockKey`: a block coordinate and a mip level.
//!
//! The main pieces are:
//!   - `BlockRead` and `BlockWrite`: the storage traits, implemented by the in-memory `BlockHashMap` and the persistent
//!     `BlockDb` (with the `sled` feature)
//!   - `LevelGeometry`: the per-level voxel size, block resolution and buffer layout of a layer
//!   - `generate_mipmaps`: fills in missing mip blocks with a `BlockDownsampler`, like the `MaxDownsampler`
//!   - `DenseBlockCache` and `ScopedBlockCache`: decoded block caches that read each block at most once
//!
//! Absent blocks are never an error. They read as empty (all zero) space.

pub mod block;
pub mod cache;
pub mod compression;
pub mod error;
pub mod level;
pub mod mipmap;
pub mod storage;

#[cfg(feature = "sled")]
pub mod database;

pub use block::*;
pub use cache::*;
pub use compression::*;
pub use error::*;
pub use level::*;
pub use mipmap::*;
pub use storage::*;

#[cfg(feature = "sled")]
pub use database::{sled, BlockDb};

// Hash types to use for small keys like `BlockKey`.
pub type SmallKeyHashMap<K, V> = ahash::AHashMap<K, V>;
pub type SmallKeyBuildHasher = ahash::RandomState;

pub mod prelude {
    pub use super::{
        generate_mipmaps, AxisMask, BlockBuffer, BlockCoordinate, BlockDownsampler, BlockHashMap,
        BlockIdRange, BlockKey, BlockRead, BlockWrite, BytesCompression, CacheKeyMatch,
        CacheStats, DenseBlockCache, Density, LayerDescriptor, LevelGeometry, LevelInfo, Local3i,
        MaxDownsampler, MipReport, NoCompression, ScopedBlockCache, StorageError, Stride,
    };

    #[cfg(feature = "lz4")]
    pub use super::Lz4;
    #[cfg(feature = "sled")]
    pub use super::BlockDb;
}
