use core::ops::Sub;
use serde::{Deserialize, Serialize};

/// A 2- or 3-dimensional point, which is just a primitive array of type `N`.
///
/// ```
/// use shards_core::PointN;
///
/// let p2 = PointN([1, 2]);
/// let p3 = PointN([1, 2, 3]);
///
/// assert_eq!(p3 + PointN([1, 1, 1]), PointN([2, 3, 4]));
/// assert_eq!(p2 * 2, PointN([2, 4]));
/// ```
///
/// Points are partially ordered: a point A is less than a point B if and only if every component of A is less than the
/// corresponding component of B. This is what makes `min <= p && p < lub` a containment check for boxes.
#[derive(Copy, Clone, Debug, Deserialize, Default, Eq, Hash, PartialEq, Serialize)]
pub struct PointN<N>(pub N);

/// Operations shared by the integer points that index voxels and blocks.
pub trait IntegerPoint:
    Copy
    + Eq
    + PartialOrd
    + core::ops::Add<Output = Self>
    + Sub<Output = Self>
    + core::ops::Mul<i32, Output = Self>
{
    const ZERO: Self;
    const ONES: Self;

    /// A point with every component equal to `value`.
    fn fill(value: i32) -> Self;

    /// Component-wise maximum.
    fn join(&self, other: &Self) -> Self;

    /// The product of all components.
    fn volume(&self) -> i32;
}

/// Euclidean length.
pub trait Norm {
    fn norm_squared(&self) -> f32;

    fn norm(&self) -> f32 {
        self.norm_squared().sqrt()
    }
}
