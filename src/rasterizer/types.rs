//! Core types for the rasterizer

use super::math::{Vec2, Vec3};

// =============================================================================
// DS BGR555 Color Type
// =============================================================================

/// DS-authentic 15-bit color with the displayed bit set.
///
/// Format: `ABBBBBGG GGGRRRRR`
/// - Bit 15 (a): Displayed flag (set on every palette entry we emit)
/// - Bits 14-10: Blue (0-31)
/// - Bits 9-5: Green (0-31)
/// - Bits 4-0: Red (0-31)
///
/// Note the channel order: red sits in the LOW bits, the reverse of the
/// usual RGB555 layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color15(pub u16);

impl Color15 {
    /// Black with the displayed bit set
    pub const BLACK: Color15 = Color15(0x8000);

    /// Opaque white
    pub const WHITE: Color15 = Color15(0xFFFF);

    /// Create from 5-bit RGB values (0-31 each)
    #[inline]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        let b = (b.min(31) as u16) << 10;
        let g = (g.min(31) as u16) << 5;
        let r = r.min(31) as u16;
        Color15(0x8000 | b | g | r)
    }

    /// Create from 8-bit RGB values, rounding each channel to 5 bits
    #[inline]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(round_to_5bit(r), round_to_5bit(g), round_to_5bit(b))
    }

    /// Get red channel as 5-bit value (0-31)
    #[inline]
    pub fn r5(self) -> u8 {
        (self.0 & 0x1F) as u8
    }

    /// Get green channel as 5-bit value (0-31)
    #[inline]
    pub fn g5(self) -> u8 {
        ((self.0 >> 5) & 0x1F) as u8
    }

    /// Get blue channel as 5-bit value (0-31)
    #[inline]
    pub fn b5(self) -> u8 {
        ((self.0 >> 10) & 0x1F) as u8
    }

    /// Get red channel expanded to 8 bits (0-255)
    #[inline]
    pub fn r8(self) -> u8 {
        expand_5bit(self.r5())
    }

    /// Get green channel expanded to 8 bits (0-255)
    #[inline]
    pub fn g8(self) -> u8 {
        expand_5bit(self.g5())
    }

    /// Get blue channel expanded to 8 bits (0-255)
    #[inline]
    pub fn b8(self) -> u8 {
        expand_5bit(self.b5())
    }

    /// Convert to [u8; 4] RGBA for framebuffer display
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r8(), self.g8(), self.b8(), 255]
    }
}

/// Round an 8-bit channel to 5 bits (0-31)
#[inline]
pub fn round_to_5bit(c: u8) -> u8 {
    ((c as u16 * 31 + 127) / 255) as u8
}

/// Expand a 5-bit channel to 8 bits so 31 maps to 255.
/// The framebuffer relies on `expand_5bit(c) >> 3 == c` to read channels
/// back losslessly when blending.
#[inline]
pub fn expand_5bit(c: u8) -> u8 {
    (c << 3) | (c >> 2)
}

// =============================================================================
// Palette and Indexed Texture Types
// =============================================================================

/// Color look-up table for indexed textures.
///
/// Holds 256 Color15 entries. Both palette views resolve through the same
/// table: the 32-color view only ever touches the first 32 entries, which
/// the asset format repeats through the rest of the table.
#[derive(Debug, Clone)]
pub struct Clut {
    pub colors: Vec<Color15>,
}

impl Clut {
    /// Look up color by palette index
    /// Returns black for out-of-bounds indices
    #[inline]
    pub fn lookup(&self, index: u8) -> Color15 {
        self.colors
            .get(index as usize)
            .copied()
            .unwrap_or(Color15::BLACK)
    }
}

/// An indexed texture plane.
///
/// Each texel is a raw byte; whether it is a plain palette index or an
/// alpha/index pack is decided per draw by the bound [`PaletteView`].
#[derive(Debug, Clone)]
pub struct IndexedTexture {
    pub width: usize,
    pub height: usize,
    pub texels: Vec<u8>,
}

impl IndexedTexture {
    pub fn new(width: usize, height: usize, texels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            texels,
        }
    }

    /// Sample the raw texel byte at UV coordinates (nearest, no filtering)
    /// Handles negative UVs correctly using euclidean modulo for proper tiling
    #[inline]
    pub fn sample_texel(&self, u: f32, v: f32) -> u8 {
        let u_wrapped = u.rem_euclid(1.0);
        let v_wrapped = v.rem_euclid(1.0);
        let tx = ((u_wrapped * self.width as f32) as usize).min(self.width.saturating_sub(1));
        let ty = ((v_wrapped * self.height as f32) as usize).min(self.height.saturating_sub(1));
        self.texels.get(ty * self.width + tx).copied().unwrap_or(0)
    }
}

/// How texel bytes are interpreted against the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteView {
    /// The whole byte is a palette index; fragments are opaque
    Rgb256,
    /// Low 5 bits index the palette, high 3 bits are fragment alpha (0-7)
    Rgb32A3,
}

/// A texture plane bound for drawing, with its palette and view
#[derive(Debug, Clone, Copy)]
pub struct TextureBinding<'a> {
    pub texture: &'a IndexedTexture,
    pub clut: &'a Clut,
    pub view: PaletteView,
}

// =============================================================================
// Vertex and Draw State
// =============================================================================

/// 5-bit vertex color (0-31 per channel), as produced by the lighting pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb5 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb5 {
    pub const WHITE: Rgb5 = Rgb5 { r: 31, g: 31, b: 31 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r.min(31),
            g: g.min(31),
            b: b.min(31),
        }
    }
}

/// A vertex with position, texture coordinate and color
#[derive(Debug, Clone, Copy, Default)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv: Vec2,
    /// Per-vertex color, modulated with the texel at raster time
    pub color: Rgb5,
}

impl Vertex {
    pub fn new(pos: Vec3, uv: Vec2, color: Rgb5) -> Self {
        Self { pos, uv, color }
    }
}

/// Depth test applied when drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthTest {
    /// Draw where the fragment is nearer than the stored depth
    Less,
    /// Draw only where the fragment depth equals the stored depth exactly.
    /// Decal passes re-rasterize the same geometry with the same camera, so
    /// interpolated depths reproduce bit for bit and the test selects
    /// precisely the pixels the base pass filled.
    Equal,
}
