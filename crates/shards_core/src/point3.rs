use crate::{IntegerPoint, Norm, Point2, PointN};

use core::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use num::Integer;
use std::cmp::{max, Ordering};

/// A 3-dimensional point with scalar type `T`.
pub type Point3<T> = PointN<[T; 3]>;
/// A 3-dimensional point with scalar type `i32`.
pub type Point3i = PointN<[i32; 3]>;
/// A 3-dimensional point with scalar type `f32`.
pub type Point3f = PointN<[f32; 3]>;

impl<T> Point3<T>
where
    T: Copy,
{
    pub fn x(&self) -> T {
        self.0[0]
    }

    pub fn y(&self) -> T {
        self.0[1]
    }

    pub fn z(&self) -> T {
        self.0[2]
    }

    pub fn xy(&self) -> Point2<T> {
        PointN([self.x(), self.y()])
    }

    #[inline]
    pub fn map_components(&self, f: impl Fn(T) -> T) -> Self {
        PointN([f(self.x()), f(self.y()), f(self.z())])
    }
}

impl Point3i {
    /// Component-wise division, rounding towards negative infinity.
    #[inline]
    pub fn scalar_div_floor(&self, rhs: i32) -> Self {
        self.map_components(|c| Integer::div_floor(&c, &rhs))
    }

    /// Component-wise modulus with the sign of the divisor, so the result is always in `[0, rhs)` for a positive `rhs`.
    #[inline]
    pub fn scalar_mod_floor(&self, rhs: i32) -> Self {
        self.map_components(|c| Integer::mod_floor(&c, &rhs))
    }

    /// The 8 corners of the unit cube, X varying fastest.
    pub fn corner_offsets() -> [Self; 8] {
        [
            PointN([0, 0, 0]),
            PointN([1, 0, 0]),
            PointN([0, 1, 0]),
            PointN([1, 1, 0]),
            PointN([0, 0, 1]),
            PointN([1, 0, 1]),
            PointN([0, 1, 1]),
            PointN([1, 1, 1]),
        ]
    }
}

impl Point3f {
    pub fn floor(&self) -> Self {
        self.map_components(|c| c.floor())
    }

    pub fn as_3i(&self) -> Point3i {
        PointN([self.x() as i32, self.y() as i32, self.z() as i32])
    }

    /// The voxel that contains this point, assuming voxels have unit edge length.
    pub fn in_voxel(&self) -> Point3i {
        self.floor().as_3i()
    }
}

impl IntegerPoint for Point3i {
    const ZERO: Self = PointN([0; 3]);
    const ONES: Self = PointN([1; 3]);

    #[inline]
    fn fill(value: i32) -> Self {
        PointN([value; 3])
    }

    #[inline]
    fn join(&self, other: &Self) -> Self {
        PointN([
            max(self.x(), other.x()),
            max(self.y(), other.y()),
            max(self.z(), other.z()),
        ])
    }

    #[inline]
    fn volume(&self) -> i32 {
        self.x() * self.y() * self.z()
    }
}

impl Norm for Point3i {
    fn norm_squared(&self) -> f32 {
        (self.x() * self.x() + self.y() * self.y() + self.z() * self.z()) as f32
    }
}

impl Norm for Point3f {
    fn norm_squared(&self) -> f32 {
        self.x() * self.x() + self.y() * self.y() + self.z() * self.z()
    }
}

impl<T> Add for Point3<T>
where
    T: AddAssign + Copy,
{
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        let mut sum = self;
        sum.0[0] += rhs.x();
        sum.0[1] += rhs.y();
        sum.0[2] += rhs.z();

        sum
    }
}

impl<T> Sub for Point3<T>
where
    T: SubAssign + Copy,
{
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        let mut diff = self;
        diff.0[0] -= rhs.x();
        diff.0[1] -= rhs.y();
        diff.0[2] -= rhs.z();

        diff
    }
}

impl<T> Mul<T> for Point3<T>
where
    T: Copy + Mul<Output = T>,
{
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        PointN([rhs * self.x(), rhs * self.y(), rhs * self.z()])
    }
}

// Integer division must round towards negative infinity so that negative voxels land in the right block.
impl Div<i32> for Point3i {
    type Output = Self;

    #[inline]
    fn div(self, rhs: i32) -> Self {
        self.scalar_div_floor(rhs)
    }
}

impl Div<f32> for Point3f {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f32) -> Self {
        PointN([self.x() / rhs, self.y() / rhs, self.z() / rhs])
    }
}

// This particular partial order allows us to say that an `Extent3i` e contains a `Point3i` p iff p
// is GEQ the minimum of e and p is LEQ the maximum of e.
impl<T> PartialOrd for Point3<T>
where
    T: Copy + PartialOrd,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self < other {
            Some(Ordering::Less)
        } else if self > other {
            Some(Ordering::Greater)
        } else if self.x() == other.x() && self.y() == other.y() && self.z() == other.z() {
            Some(Ordering::Equal)
        } else {
            None
        }
    }

    fn lt(&self, other: &Self) -> bool {
        self.x() < other.x() && self.y() < other.y() && self.z() < other.z()
    }

    fn gt(&self, other: &Self) -> bool {
        self.x() > other.x() && self.y() > other.y() && self.z() > other.z()
    }

    fn le(&self, other: &Self) -> bool {
        self.x() <= other.x() && self.y() <= other.y() && self.z() <= other.z()
    }

    fn ge(&self, other: &Self) -> bool {
        self.x() >= other.x() && self.y() >= other.y() && self.z() >= other.z()
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
