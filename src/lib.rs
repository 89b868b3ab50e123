//! Sparse, block-structured 3D density volumes with coarse mip levels and nearest-non-empty (gap) queries.
//!
//! This library is organized into several crates:
//! - **core**: integer points, extents, axes and Morton codes
//! - **storage**: block storage, level geometry, mip generation and block caches
//! - **search**: gap queries along an axis and in expanding rings
//!
//! A typical session opens a `BlockDb`, runs `generate_mipmaps` over a layer, and then answers queries through a
//! `DenseBlockCache` or the `search` functions, which keep their own `ScopedBlockCache`.

pub use shards_core as core;
pub use shards_storage as storage;

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::storage::prelude::*;

    #[cfg(feature = "search")]
    pub use super::search::{find_max_gap, find_max_gap_along_axis};
}

#[cfg(feature = "search")]
pub use shards_search as search;
