use crate::{IntegerPoint, Point2i, Point3i, PointN};

use core::ops::{Add, Range};
use itertools::{iproduct, ConsTuples, Product};
use serde::{Deserialize, Serialize};

/// A 2-dimensional extent with scalar type `i32`.
pub type Extent2i = ExtentN<[i32; 2]>;
/// A 3-dimensional extent with scalar type `i32`.
pub type Extent3i = ExtentN<[i32; 3]>;

/// An N-dimensional extent. This is mathematically the Cartesian product of a half-closed interval `[a, b)` in each
/// dimension. You can also just think of it as an axis-aligned box with some shape and a minimum point.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ExtentN<N> {
    /// The least point contained in the extent.
    pub minimum: PointN<N>,
    /// The length of each dimension.
    pub shape: PointN<N>,
}

impl<N> ExtentN<N> {
    /// The default representation of an extent as the minimum point and shape.
    #[inline]
    pub fn from_min_and_shape(minimum: PointN<N>, shape: PointN<N>) -> Self {
        Self { minimum, shape }
    }
}

impl<N> ExtentN<N>
where
    PointN<N>: IntegerPoint,
{
    /// The number of points contained in the extent.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.shape.volume() as usize
    }

    /// The least point `p` for which all points `q` in the extent satisfy `q < p`.
    #[inline]
    pub fn least_upper_bound(&self) -> PointN<N> {
        self.minimum + self.shape
    }

    /// An alternative representation of an extent as the minimum point and least upper bound.
    #[inline]
    pub fn from_min_and_lub(minimum: PointN<N>, least_upper_bound: PointN<N>) -> Self {
        // We want to avoid negative shape components.
        let shape = (least_upper_bound - minimum).join(&<PointN<N> as IntegerPoint>::ZERO);

        Self { minimum, shape }
    }

    /// An alternative representation of an integer extent as the minimum point and (inclusive) maximum point.
    #[inline]
    pub fn from_min_and_max(minimum: PointN<N>, max: PointN<N>) -> Self {
        Self::from_min_and_lub(minimum, max + <PointN<N> as IntegerPoint>::ONES)
    }

    /// Returns `true` iff the point `p` is contained in this extent.
    #[inline]
    pub fn contains(&self, p: PointN<N>) -> bool {
        self.minimum <= p && p < self.least_upper_bound()
    }
}

impl<N> Add<PointN<N>> for ExtentN<N>
where
    PointN<N>: IntegerPoint,
{
    type Output = Self;

    #[inline]
    fn add(self, rhs: PointN<N>) -> Self::Output {
        Self::from_min_and_shape(self.minimum + rhs, self.shape)
    }
}

type RangeProduct2 = Product<Range<i32>, Range<i32>>;
type RangeProduct3 = Product<RangeProduct2, Range<i32>>;

/// An iterator over all points in an `Extent2i`, X varying fastest.
pub struct Extent2PointIter {
    product_iter: RangeProduct2,
}

impl Iterator for Extent2PointIter {
    type Item = Point2i;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.product_iter.next().map(|(y, x)| PointN([x, y]))
    }
}

/// An iterator over all points in an `Extent3i`, X varying fastest.
pub struct Extent3PointIter {
    product_iter: ConsTuples<RangeProduct3, ((i32, i32), i32)>,
}

impl Iterator for Extent3PointIter {
    type Item = Point3i;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.product_iter.next().map(|(z, y, x)| PointN([x, y, z]))
    }
}

impl Extent2i {
    #[inline]
    pub fn iter_points(&self) -> Extent2PointIter {
        let lub = self.least_upper_bound();

        Extent2PointIter {
            product_iter: iproduct!(self.minimum.y()..lub.y(), self.minimum.x()..lub.x()),
        }
    }
}

impl Extent3i {
    /// Iterate over all points in the extent in row-major order.
    ///
    /// ```
    /// # use shards_core::prelude::*;
    /// #
    /// let extent = Extent3i::from_min_and_shape(PointN([0, 0, 0]), PointN([2, 2, 1]));
    /// let points = extent.iter_points().collect::<Vec<_>>();
    /// assert_eq!(points, vec![
    ///     PointN([0, 0, 0]), PointN([1, 0, 0]), PointN([0, 1, 0]), PointN([1, 1, 0])
    /// ]);
    /// ```
    #[inline]
    pub fn iter_points(&self) -> Extent3PointIter {
        let lub = self.least_upper_bound();

        Extent3PointIter {
            // iproduct is opposite of row-major order.
            product_iter: iproduct!(
                self.minimum.z()..lub.z(),
                self.minimum.y()..lub.y(),
                self.minimum.x()..lub.x()
            ),
        }
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
