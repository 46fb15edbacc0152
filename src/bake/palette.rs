//! Exact-match palette quantization
//!
//! The target texture format holds at most 32 colors, and the hardware
//! look this demo goes for depends on artists authoring inside that limit.
//! So there is no median-cut or nearest-color merging here: every pixel
//! must match an existing palette entry exactly, and the 33rd distinct
//! color is an error, not a degradation.

use crate::bake::BakeError;

/// Hard palette limit of the texture format
pub const MAX_COLORS: usize = 32;

/// A diffuse texture rewritten as palette indices
#[derive(Debug, Clone)]
pub struct QuantizedImage {
    /// One palette index per pixel, row-major
    pub indices: Vec<u8>,
    /// Palette entries as RGB8, in first-seen order
    pub palette: Vec<[u8; 3]>,
}

/// Quantize an RGBA8 image to palette indices by exact RGB match.
///
/// The palette is built in scan order: the first pixel of a new color
/// appends an entry, later pixels reuse it. Alpha is ignored; the format
/// carries opacity elsewhere. Fails once a 33rd distinct color shows up.
pub fn quantize_exact(
    rgba: &[u8],
    width: usize,
    height: usize,
) -> Result<QuantizedImage, BakeError> {
    debug_assert_eq!(rgba.len(), width * height * 4);

    let mut palette: Vec<[u8; 3]> = Vec::new();
    let mut indices = Vec::with_capacity(width * height);

    for pixel in rgba.chunks_exact(4).take(width * height) {
        let rgb = [pixel[0], pixel[1], pixel[2]];

        let index = match palette.iter().position(|&entry| entry == rgb) {
            Some(index) => index,
            None => {
                if palette.len() == MAX_COLORS {
                    return Err(BakeError::PaletteOverflow { limit: MAX_COLORS });
                }
                palette.push(rgb);
                palette.len() - 1
            }
        };

        indices.push(index as u8);
    }

    Ok(QuantizedImage { indices, palette })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_of(colors: &[[u8; 3]]) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(colors.len() * 4);
        for c in colors {
            rgba.extend_from_slice(&[c[0], c[1], c[2], 255]);
        }
        rgba
    }

    #[test]
    fn test_two_color_image() {
        let red = [200, 30, 30];
        let gray = [128, 128, 128];
        let rgba = image_of(&[red, gray, gray, red]);

        let q = quantize_exact(&rgba, 2, 2).unwrap();
        assert_eq!(q.palette, vec![red, gray]);
        assert_eq!(q.indices, vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_first_seen_order() {
        let rgba = image_of(&[[0, 0, 255], [255, 0, 0], [0, 0, 255], [0, 255, 0]]);
        let q = quantize_exact(&rgba, 2, 2).unwrap();
        assert_eq!(q.palette, vec![[0, 0, 255], [255, 0, 0], [0, 255, 0]]);
    }

    #[test]
    fn test_no_duplicate_entries() {
        let colors: Vec<[u8; 3]> = (0u8..64).map(|i| [(i % 8) * 30, 40, 50]).collect();
        let q = quantize_exact(&image_of(&colors), 8, 8).unwrap();
        for (i, a) in q.palette.iter().enumerate() {
            for b in &q.palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_indices_resolve_to_original_colors() {
        let colors: Vec<[u8; 3]> = (0u8..16).map(|i| [i * 16, 255 - i * 16, i]).collect();
        let rgba = image_of(&colors);
        let q = quantize_exact(&rgba, 4, 4).unwrap();
        for (pixel, &index) in colors.iter().zip(&q.indices) {
            assert_eq!(q.palette[index as usize], *pixel);
        }
    }

    #[test]
    fn test_alpha_is_ignored() {
        let mut rgba = image_of(&[[10, 20, 30], [10, 20, 30]]);
        rgba[3] = 0;
        rgba[7] = 255;
        let q = quantize_exact(&rgba, 2, 1).unwrap();
        assert_eq!(q.palette.len(), 1);
    }

    #[test]
    fn test_exactly_32_colors_is_fine() {
        let colors: Vec<[u8; 3]> = (0..32).map(|i| [i as u8, 0, 0]).collect();
        let q = quantize_exact(&image_of(&colors), 32, 1).unwrap();
        assert_eq!(q.palette.len(), 32);
    }

    #[test]
    fn test_33rd_color_overflows() {
        let colors: Vec<[u8; 3]> = (0..33).map(|i| [i as u8, 0, 0]).collect();
        let err = quantize_exact(&image_of(&colors), 33, 1).unwrap_err();
        assert!(matches!(err, BakeError::PaletteOverflow { .. }));
    }
}
