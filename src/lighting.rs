//! Per-vertex point lighting in 4.12 fixed-point
//!
//! Every floor vertex is lit once per pass against the pass's basis
//! direction. The math mirrors the hardware-era original step for step:
//! quadratic distance falloff folded into a squared-distance divide, a
//! square root as the gamma curve, then quantization to 5-bit channels.
//!
//! Accumulation wraps and division by zero goes dark instead of faulting,
//! so a light dragged onto a vertex dims that vertex rather than crashing
//! the viewer.

use serde::{Deserialize, Serialize};

use crate::fixed::{Fixed32, FixedVec3};
use crate::rasterizer::Rgb5;

/// A point light with position and color in raw 4.12 units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointLight {
    pub pos: FixedVec3,
    pub color: FixedVec3,
}

/// The set of lights the viewer drives.
///
/// The default rig matches the demo scene: a white key light behind the
/// camera and a red fill on the opposite side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightRig {
    pub lights: Vec<PointLight>,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            lights: vec![
                PointLight {
                    pos: FixedVec3::from_raw(-4096, 3172, -4096),
                    color: FixedVec3::from_raw(8192, 8192, 8192),
                },
                PointLight {
                    pos: FixedVec3::from_raw(4096, 4096, 4096),
                    color: FixedVec3::from_raw(8192, 0, 0),
                },
            ],
        }
    }
}

/// Light a vertex against one basis direction.
///
/// `pos` is the vertex position and `basis` the direction the current
/// pass's texels were encoded for, both in raw 4.12 units. The basis
/// lives in the floor's texture space, where z points up; the world has
/// y up, so the light direction swaps those two components before the
/// dot product.
pub fn vertex_color(pos: FixedVec3, basis: FixedVec3, lights: &[PointLight]) -> Rgb5 {
    let mut col = FixedVec3::ZERO;

    for light in lights {
        let dir = light.pos - pos;
        let dist = dir.dot(dir);

        // Scaled toward unit length by the squared distance; the surplus
        // magnitude cancels in the falloff divide below
        let dir = FixedVec3::new(dir.x / dist, dir.y / dist, dir.z / dist);

        // World y-up to texture z-up
        let dir = FixedVec3::new(dir.x, dir.z, dir.y);

        let mut intensity = basis.dot(dir);
        if intensity < Fixed32::ZERO {
            intensity = Fixed32::ZERO;
        }
        intensity = intensity / (dist * dist);

        col = col
            + FixedVec3::new(
                light.color.x * intensity,
                light.color.y * intensity,
                light.color.z * intensity,
            );
    }

    Rgb5::new(
        quantize_channel(col.x.sqrt()),
        quantize_channel(col.y.sqrt()),
        quantize_channel(col.z.sqrt()),
    )
}

/// Flat color for a light's marker cube: the raw light color scaled to
/// 5 bits, skipping falloff and gamma entirely
pub fn marker_color(color: FixedVec3) -> Rgb5 {
    Rgb5::new(
        marker_channel(color.x),
        marker_channel(color.y),
        marker_channel(color.z),
    )
}

#[inline]
fn marker_channel(c: Fixed32) -> u8 {
    (c.0 >> 7).clamp(0, 31) as u8
}

/// 4.12 channel to 5 bits, rounding to nearest and saturating at 31
#[inline]
fn quantize_channel(c: Fixed32) -> u8 {
    ((c.0 + 64) >> 7).clamp(0, 31) as u8
}
