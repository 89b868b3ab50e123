//! The core data types for addressing voxels and blocks in a 3D density volume:
//! - `PointN`: a 2D or 3D point, most importantly `Point3i` (voxels and block coordinates) and `Point2i` (ring offsets)
//! - `ExtentN`: an axis-aligned box of integer points, most importantly `Extent3i`
//! - `Axis3` and `SignedAxis3`: axis-aligned scan directions
//! - `Morton3`: Z-order keys for spatially clustered storage

pub mod axis;
pub mod extent;
pub mod morton;
pub mod point;
pub mod point2;
pub mod point3;

pub use axis::{Axis3, SignedAxis3};
pub use extent::{Extent2i, Extent3i, ExtentN};
pub use morton::Morton3;
pub use point::{IntegerPoint, Norm, PointN};
pub use point2::{Point2, Point2i};
pub use point3::{Point3, Point3f, Point3i};

pub mod prelude {
    pub use super::{
        Axis3, Extent2i, Extent3i, ExtentN, IntegerPoint, Morton3, Norm, Point2, Point2i, Point3,
        Point3f, Point3i, PointN, SignedAxis3,
    };
}
