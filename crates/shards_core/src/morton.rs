use crate::{Point3i, PointN};

use morton_encoding::{morton_decode, morton_encode};
use std::fmt;

/// A Morton-encoded `Point3i`. Uses a `u128` to support the full set of `Point3i`s, but only the least significant 96
/// bits are ever set.
///
/// <https://en.wikipedia.org/wiki/Z-order_curve>
#[derive(Clone, Copy, Eq, Ord, PartialEq, PartialOrd)]
pub struct Morton3(pub u128);

impl Morton3 {
    /// Number of meaningful bytes in the big-endian encoding.
    pub const NUM_BYTES: usize = 12;

    /// The 12 least significant bytes, big-endian. Byte-wise order matches the numeric order.
    #[inline]
    pub fn to_be_bytes(self) -> [u8; Self::NUM_BYTES] {
        let mut bytes = [0; Self::NUM_BYTES];
        bytes.copy_from_slice(&self.0.to_be_bytes()[4..]);

        bytes
    }

    #[inline]
    pub fn from_be_bytes(bytes: [u8; Self::NUM_BYTES]) -> Self {
        let mut full = [0; 16];
        full[4..].copy_from_slice(&bytes);

        Self(u128::from_be_bytes(full))
    }
}

impl fmt::Debug for Morton3 {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} = {:b}", self.0, self.0)
    }
}

impl From<Point3i> for Morton3 {
    #[inline]
    fn from(p: Point3i) -> Self {
        Self(morton_encode([
            translate(p.z()) as u32,
            translate(p.y()) as u32,
            translate(p.x()) as u32,
        ]))
    }
}

impl From<Morton3> for Point3i {
    #[inline]
    fn from(m: Morton3) -> Self {
        let zyx: [u32; 3] = morton_decode(m.0);
        PointN([
            untranslate(zyx[2] as i32),
            untranslate(zyx[1] as i32),
            untranslate(zyx[0] as i32),
        ])
    }
}

/// Send the supported range of i32 into u32 while preserving the total order.
#[inline]
fn translate(x: i32) -> i32 {
    x.wrapping_sub(i32::MIN)
}

/// The inverse of `translate`.
#[inline]
fn untranslate(x: i32) -> i32 {
    x.wrapping_add(i32::MIN)
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
