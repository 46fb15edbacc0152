//! Basis-direction encoding of the normal map
//!
//! Per texel: project the tangent-space normal onto the three basis
//! directions, turn the clamped, squared dot products into blend weights
//! that sum to 1, then express weights 1 and 2 as 3-bit alpha factors:
//!
//! ```text
//! a2 = round(7 * w1 / (w0 + w1))        a3 = round(7 * w2 / (w0 + w1 + w2))
//! ```
//!
//! Blending pass 2 over pass 1 with a2, then pass 3 over the result with
//! a3, reproduces the weighted sum w0*c0 + w1*c1 + w2*c2 without additive
//! blending. Each alpha shares its byte with the palette index.

use crate::basis::BasisSet;

/// The two packed output planes, one byte per texel each
#[derive(Debug, Clone)]
pub struct EncodedPlanes {
    /// (a2 << 5) | paletteIndex
    pub plane0: Vec<u8>,
    /// (a3 << 5) | paletteIndex
    pub plane1: Vec<u8>,
}

#[inline]
fn dot3(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Decode a normal-map pixel to a unit tangent-space vector.
///
/// Channels map through `2*(c/255) - 1`, then the vector is renormalized
/// (8-bit quantization shortens it slightly; it can never be zero since
/// `c/255*2-1` has no root at integer c). The y axis is negated to go
/// from the normal map's convention to the engine's.
pub fn decode_normal(pixel: [u8; 3]) -> [f32; 3] {
    let mut n = [
        pixel[0] as f32 / 255.0 * 2.0 - 1.0,
        pixel[1] as f32 / 255.0 * 2.0 - 1.0,
        pixel[2] as f32 / 255.0 * 2.0 - 1.0,
    ];

    let len = dot3(n, n).sqrt();
    n[0] /= len;
    n[1] /= len;
    n[2] /= len;

    n[1] = -n[1];
    n
}

/// Blend weights of a unit normal over the three basis directions.
///
/// Dot products are clamped to [0,1] and squared (sharpens the
/// directional response), then normalized to sum to 1. A normal facing
/// away from all three directions keeps all-zero weights; nothing
/// divides by the zero sum.
pub fn blend_weights(basis: &BasisSet, normal: [f32; 3]) -> [f32; 3] {
    let mut weights = [0.0f32; 3];
    for (w, dir) in weights.iter_mut().zip(basis.float_dirs) {
        let dp = dot3(dir, normal).clamp(0.0, 1.0);
        *w = dp * dp;
    }

    let sum = weights[0] + weights[1] + weights[2];
    if sum > 0.0 {
        for w in &mut weights {
            *w /= sum;
        }
    }
    weights
}

/// Quantize the second and third blend weights to 3-bit alpha factors.
pub fn alpha_factors(weights: [f32; 3]) -> (u8, u8) {
    let mut a2 = 0.0;
    if weights[1] > 0.0 {
        a2 = weights[1] / (weights[0] + weights[1]);
    }

    let mut a3 = 0.0;
    if weights[2] > 0.0 {
        a3 = weights[2] / (weights[0] + weights[1] + weights[2]);
    }

    ((a2 * 7.0).round() as u8, (a3 * 7.0).round() as u8)
}

/// Pack a 3-bit alpha factor and a 5-bit palette index into one byte
#[inline]
pub fn pack_texel(alpha: u8, index: u8) -> u8 {
    debug_assert!(alpha <= 7 && index <= 31);
    (alpha << 5) | index
}

/// Split a packed texel byte back into (alpha, index)
#[inline]
pub fn unpack_texel(byte: u8) -> (u8, u8) {
    (byte >> 5, byte & 0x1f)
}

/// Encode both output planes from the quantized diffuse indices and the
/// normal-map pixels.
///
/// Pure per-texel map; texel i of each plane depends only on index i and
/// normal-map pixel i.
pub fn encode_planes(
    basis: &BasisSet,
    indices: &[u8],
    normal_rgba: &[u8],
) -> EncodedPlanes {
    debug_assert_eq!(indices.len() * 4, normal_rgba.len());

    let mut plane0 = Vec::with_capacity(indices.len());
    let mut plane1 = Vec::with_capacity(indices.len());

    for (&index, pixel) in indices.iter().zip(normal_rgba.chunks_exact(4)) {
        let normal = decode_normal([pixel[0], pixel[1], pixel[2]]);
        let weights = blend_weights(basis, normal);
        let (a2, a3) = alpha_factors(weights);

        plane0.push(pack_texel(a2, index));
        plane1.push(pack_texel(a3, index));
    }

    EncodedPlanes { plane0, plane1 }
}
