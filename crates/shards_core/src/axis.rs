use crate::{Point3i, PointN};

/// Either the X, Y, or Z axis.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Axis3 {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis3 {
    pub const ALL: [Axis3; 3] = [Axis3::X, Axis3::Y, Axis3::Z];

    pub fn get_unit_vector(&self) -> Point3i {
        match self {
            Axis3::X => PointN([1, 0, 0]),
            Axis3::Y => PointN([0, 1, 0]),
            Axis3::Z => PointN([0, 0, 1]),
        }
    }
}

/// An axis with a direction, e.g. -Z. The sign is always `1` or `-1`, so `get_vector` is a unit step.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SignedAxis3 {
    sign: i32,
    axis: Axis3,
}

impl SignedAxis3 {
    /// A negative `sign` points down `axis`. Anything else points up.
    pub fn new(sign: i32, axis: Axis3) -> Self {
        let sign = if sign < 0 { -1 } else { 1 };

        Self { sign, axis }
    }

    pub fn positive(axis: Axis3) -> Self {
        Self::new(1, axis)
    }

    pub fn negative(axis: Axis3) -> Self {
        Self::new(-1, axis)
    }

    #[inline]
    pub fn sign(&self) -> i32 {
        self.sign
    }

    #[inline]
    pub fn axis(&self) -> Axis3 {
        self.axis
    }

    pub fn get_vector(&self) -> Point3i {
        self.axis.get_unit_vector() * self.sign
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
