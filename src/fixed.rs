//! Fixed-point math for the lighting path
//!
//! All light math runs in 4.12 fixed-point (4096 = 1.0), the native format
//! of the hardware this demo imitates:
//! - multiplication goes through a 64-bit intermediate, then shifts back down
//! - division pre-shifts the dividend, so `ONE / ONE == ONE` exactly
//! - square root is an integer shift-subtract root of the pre-shifted value
//!
//! Additions wrap rather than panic. Over-bright light sums are allowed to
//! wrap the accumulator; the quantize step at the end of the lighting path
//! clamps whatever comes out.

use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// 12 fractional bits (4096 = 1.0)
const FRAC_BITS: i32 = 12;
const ONE_RAW: i32 = 1 << FRAC_BITS;

/// Fixed-point number in 4.12 format, stored in 32 bits.
/// Serializes as the raw integer, so config files carry 4096 = 1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fixed32(pub i32);

impl Fixed32 {
    pub const ZERO: Fixed32 = Fixed32(0);
    pub const ONE: Fixed32 = Fixed32(ONE_RAW);

    /// Create from integer units
    #[inline]
    pub fn from_int(n: i32) -> Self {
        Fixed32(n << FRAC_BITS)
    }

    /// Create from f32
    #[inline]
    pub fn from_f32(f: f32) -> Self {
        Fixed32((f * ONE_RAW as f32) as i32)
    }

    /// Convert to f32
    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / ONE_RAW as f32
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Fixed32(self.0.min(other.0))
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        Fixed32(self.0.max(other.0))
    }

    /// Fixed-point square root: sqrt(1.0) == 1.0
    ///
    /// The operand is widened and pre-shifted so the result keeps the 4.12
    /// format. Negative operands (a wrapped accumulator) come out as zero.
    #[inline]
    pub fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Fixed32::ZERO;
        }
        Fixed32(isqrt64((self.0 as u64) << FRAC_BITS) as i32)
    }
}

/// Integer square root (floor) of a 64-bit value, shift-subtract method
fn isqrt64(v: u64) -> u64 {
    let mut rem = v;
    let mut root = 0u64;
    // Highest power-of-four at or below the operand
    let mut bit = 1u64 << 62;
    while bit > v {
        bit >>= 2;
    }
    while bit != 0 {
        if rem >= root + bit {
            rem -= root + bit;
            root = (root >> 1) + bit;
        } else {
            root >>= 1;
        }
        bit >>= 2;
    }
    root
}

impl Add for Fixed32 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Fixed32(self.0.wrapping_add(other.0))
    }
}

impl Sub for Fixed32 {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Fixed32(self.0.wrapping_sub(other.0))
    }
}

impl Mul for Fixed32 {
    type Output = Self;
    /// 4.12 * 4.12 -> 4.12 through a 64-bit intermediate
    #[inline]
    fn mul(self, other: Self) -> Self {
        Fixed32(((self.0 as i64 * other.0 as i64) >> FRAC_BITS) as i32)
    }
}

impl Div for Fixed32 {
    type Output = Self;
    /// 4.12 / 4.12 -> 4.12, exact up to truncation toward zero
    ///
    /// A zero divisor yields zero. The hardware this imitates raises a
    /// division-by-zero flag and returns garbage; going dark for the
    /// offending term is the one deviation.
    #[inline]
    fn div(self, divisor: Self) -> Self {
        if divisor.0 == 0 {
            return Fixed32::ZERO;
        }
        Fixed32((((self.0 as i64) << FRAC_BITS) / divisor.0 as i64) as i32)
    }
}

impl Neg for Fixed32 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Fixed32(self.0.wrapping_neg())
    }
}

// =============================================================================
// 3D vector in fixed-point
// =============================================================================

/// 3D vector with 4.12 fixed-point components
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedVec3 {
    pub x: Fixed32,
    pub y: Fixed32,
    pub z: Fixed32,
}

impl FixedVec3 {
    pub const ZERO: FixedVec3 = FixedVec3 {
        x: Fixed32::ZERO,
        y: Fixed32::ZERO,
        z: Fixed32::ZERO,
    };

    #[inline]
    pub fn new(x: Fixed32, y: Fixed32, z: Fixed32) -> Self {
        Self { x, y, z }
    }

    /// Create from raw 4.12 component values (4096 = 1.0)
    #[inline]
    pub const fn from_raw(x: i32, y: i32, z: i32) -> Self {
        Self {
            x: Fixed32(x),
            y: Fixed32(y),
            z: Fixed32(z),
        }
    }

    /// Dot product in fixed-point, component sums wrap like the scalar ops
    #[inline]
    pub fn dot(self, other: Self) -> Fixed32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl Add for FixedVec3 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for FixedVec3 {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
