use crate::{IntegerPoint, Norm, PointN};

use core::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::cmp::{max, Ordering};

/// A 2-dimensional point with scalar type `T`.
pub type Point2<T> = PointN<[T; 2]>;
/// A 2-dimensional point with scalar type `i32`.
pub type Point2i = PointN<[i32; 2]>;

impl<T> Point2<T>
where
    T: Copy,
{
    pub fn x(&self) -> T {
        self.0[0]
    }

    pub fn y(&self) -> T {
        self.0[1]
    }
}

impl Point2i {
    /// The Chebyshev (L-infinity) length.
    #[inline]
    pub fn chebyshev_norm(&self) -> i32 {
        max(self.x().abs(), self.y().abs())
    }
}

impl IntegerPoint for Point2i {
    const ZERO: Self = PointN([0; 2]);
    const ONES: Self = PointN([1; 2]);

    #[inline]
    fn fill(value: i32) -> Self {
        PointN([value; 2])
    }

    #[inline]
    fn join(&self, other: &Self) -> Self {
        PointN([max(self.x(), other.x()), max(self.y(), other.y())])
    }

    #[inline]
    fn volume(&self) -> i32 {
        self.x() * self.y()
    }
}

impl Norm for Point2i {
    fn norm_squared(&self) -> f32 {
        (self.x() * self.x() + self.y() * self.y()) as f32
    }
}

impl<T> Add for Point2<T>
where
    T: AddAssign + Copy,
{
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        let mut sum = self;
        sum.0[0] += rhs.x();
        sum.0[1] += rhs.y();

        sum
    }
}

impl<T> Sub for Point2<T>
where
    T: SubAssign + Copy,
{
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        let mut diff = self;
        diff.0[0] -= rhs.x();
        diff.0[1] -= rhs.y();

        diff
    }
}

impl<T> Mul<T> for Point2<T>
where
    T: Copy + Mul<Output = T>,
{
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        PointN([rhs * self.x(), rhs * self.y()])
    }
}

impl<T> PartialOrd for Point2<T>
where
    T: Copy + PartialOrd,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self < other {
            Some(Ordering::Less)
        } else if self > other {
            Some(Ordering::Greater)
        } else if self.x() == other.x() && self.y() == other.y() {
            Some(Ordering::Equal)
        } else {
            None
        }
    }

    fn lt(&self, other: &Self) -> bool {
        self.x() < other.x() && self.y() < other.y()
    }

    fn gt(&self, other: &Self) -> bool {
        self.x() > other.x() && self.y() > other.y()
    }

    fn le(&self, other: &Self) -> bool {
        self.x() <= other.x() && self.y() <= other.y()
    }

    fn ge(&self, other: &Self) -> bool {
        self.x() >= other.x() && self.y() >= other.y()
    }
}
