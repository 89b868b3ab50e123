#![allow(clippy::too_many_arguments)]

//! Queries for the distance to the nearest non-empty voxels of a density volume:
//!   - `find_max_gap_along_axis`: how far an axis-aligned box can move along a direction before it hits density
//!   - `find_max_gap`: the distance to the nearest non-empty column in the XY plane, found with an expanding ring search
//!
//! All coordinates are in the level-local voxel space of the queried level.

pub mod gap;
pub mod ring;

pub use gap::{extent_is_empty, find_max_gap_along_axis};
pub use ring::{find_max_gap, ring_offsets};
