//! The baked texture asset format
//!
//! One binary blob is the whole contract between the offline bake and the
//! viewer (all integers little-endian):
//!
//! | offset    | size | contents                                   |
//! |-----------|------|--------------------------------------------|
//! | 0         | 1    | size code of width (dimension = 8 << code) |
//! | 1         | 1    | size code of height                        |
//! | 2         | w*h  | plane0: (a2 << 5 \| index) per texel       |
//! | 2 + w*h   | w*h  | plane1: (a3 << 5 \| index) per texel       |
//! | 2 + 2*w*h | 512  | palette: 32 colors * 8 repeats * 2 bytes   |
//!
//! Palette entries are `0x8000 | b5<<10 | g5<<5 | r5`. The table is
//! written eight times in a row so the very same bytes can be read as a
//! 256-entry palette (the full packed byte indexes it, alpha bits and
//! all) or as a 32-entry palette with the top three bits split off as
//! alpha - both readings resolve to identical colors.

use std::fs;
use std::io;
use std::path::Path;

use log::info;
use thiserror::Error;

use crate::rasterizer::{Clut, Color15, IndexedTexture};

/// Bytes of header before the texel planes
pub const HEADER_BYTES: usize = 2;

/// Distinct palette entries the format can address
pub const PALETTE_ENTRIES: usize = 32;

/// Times the palette is repeated in the file
pub const PALETTE_REPEATS: usize = 8;

/// Total size of the palette block
pub const PALETTE_BYTES: usize = PALETTE_ENTRIES * PALETTE_REPEATS * 2;

/// Map a texture dimension to its header size code.
///
/// Only powers of two from 8 to 1024 exist in the format.
pub fn size_code(dimension: u32) -> Option<u8> {
    match dimension {
        8 => Some(0),
        16 => Some(1),
        32 => Some(2),
        64 => Some(3),
        128 => Some(4),
        256 => Some(5),
        512 => Some(6),
        1024 => Some(7),
        _ => None,
    }
}

/// Map a header size code back to its dimension
pub fn size_from_code(code: u8) -> Option<u32> {
    (code <= 7).then(|| 8u32 << code)
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("can't read asset {path}: {source}")]
    Missing {
        path: String,
        source: io::Error,
    },
    #[error("asset truncated: need {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("bad size code {code} in asset header (valid codes are 0-7)")]
    BadSizeCode { code: u8 },
}

/// A fully baked asset, ready to serialize
///
/// Size codes are stored instead of raw dimensions so an `Asset` can only
/// exist for supported sizes; validation happens where it is built.
#[derive(Debug, Clone)]
pub struct Asset {
    pub size_code_w: u8,
    pub size_code_h: u8,
    pub plane0: Vec<u8>,
    pub plane1: Vec<u8>,
    /// Up to 32 RGB8 entries; missing entries pack as black
    pub palette: Vec<[u8; 3]>,
}

impl Asset {
    pub fn width(&self) -> u32 {
        8 << self.size_code_w
    }

    pub fn height(&self) -> u32 {
        8 << self.size_code_h
    }

    /// Serialize to the on-disk layout
    pub fn pack(&self) -> Vec<u8> {
        let texels = self.plane0.len();
        let mut out = Vec::with_capacity(HEADER_BYTES + texels * 2 + PALETTE_BYTES);

        out.push(self.size_code_w);
        out.push(self.size_code_h);
        out.extend_from_slice(&self.plane0);
        out.extend_from_slice(&self.plane1);

        for _ in 0..PALETTE_REPEATS {
            for i in 0..PALETTE_ENTRIES {
                let [r, g, b] = self.palette.get(i).copied().unwrap_or([0, 0, 0]);
                let color = Color15::from_rgb8(r, g, b);
                out.extend_from_slice(&color.0.to_le_bytes());
            }
        }

        out
    }

    /// Write the packed asset in one shot.
    ///
    /// Everything is assembled in memory first; a failing write never
    /// leaves a half-written file behind a successful return.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.pack())
    }
}

/// An asset parsed back from disk, in runtime form
#[derive(Debug, Clone)]
pub struct LoadedAsset {
    /// Texel plane carrying the a2 alpha factors
    pub plane0: IndexedTexture,
    /// Texel plane carrying the a3 alpha factors
    pub plane1: IndexedTexture,
    /// 256-entry color table shared by both planes
    pub clut: Clut,
}

impl LoadedAsset {
    pub fn width(&self) -> usize {
        self.plane0.width
    }

    pub fn height(&self) -> usize {
        self.plane0.height
    }

    /// Parse a packed asset blob.
    ///
    /// Trailing bytes beyond the computed size are tolerated; anything
    /// short of it is a `Truncated` error.
    pub fn parse(bytes: &[u8]) -> Result<LoadedAsset, AssetError> {
        if bytes.len() < HEADER_BYTES {
            return Err(AssetError::Truncated {
                expected: HEADER_BYTES,
                actual: bytes.len(),
            });
        }

        let width = size_from_code(bytes[0]).ok_or(AssetError::BadSizeCode { code: bytes[0] })?;
        let height = size_from_code(bytes[1]).ok_or(AssetError::BadSizeCode { code: bytes[1] })?;
        let (width, height) = (width as usize, height as usize);

        let texels = width * height;
        let expected = HEADER_BYTES + texels * 2 + PALETTE_BYTES;
        if bytes.len() < expected {
            return Err(AssetError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }

        let plane0 = bytes[HEADER_BYTES..HEADER_BYTES + texels].to_vec();
        let plane1 = bytes[HEADER_BYTES + texels..HEADER_BYTES + 2 * texels].to_vec();

        let colors = bytes[HEADER_BYTES + 2 * texels..expected]
            .chunks_exact(2)
            .map(|pair| Color15(u16::from_le_bytes([pair[0], pair[1]])))
            .collect();

        Ok(LoadedAsset {
            plane0: IndexedTexture::new(width, height, plane0),
            plane1: IndexedTexture::new(width, height, plane1),
            clut: Clut { colors },
        })
    }

    /// Read and parse an asset file
    pub fn load(path: &Path) -> Result<LoadedAsset, AssetError> {
        let bytes = fs::read(path).map_err(|source| AssetError::Missing {
            path: path.display().to_string(),
            source,
        })?;

        let asset = Self::parse(&bytes)?;
        info!(
            "loaded asset {}: {}x{}",
            path.display(),
            asset.width(),
            asset.height()
        );
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_asset() -> Asset {
        Asset {
            size_code_w: 0,
            size_code_h: 0,
            plane0: (0u8..64).collect(),
            plane1: (64u8..128).collect(),
            palette: vec![[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]],
        }
    }

    #[test]
    fn test_size_code_bijection() {
        let sizes = [8u32, 16, 32, 64, 128, 256, 512, 1024];
        for (code, &size) in sizes.iter().enumerate() {
            assert_eq!(size_code(size), Some(code as u8));
            assert_eq!(size_from_code(code as u8), Some(size));
        }
    }

    #[test]
    fn test_unsupported_sizes_rejected() {
        for size in [0u32, 1, 2, 4, 7, 9, 100, 2048, 4096] {
            assert_eq!(size_code(size), None);
        }
        for code in 8u8..=255 {
            assert_eq!(size_from_code(code), None);
        }
    }

    #[test]
    fn test_packed_size() {
        let packed = sample_asset().pack();
        assert_eq!(packed.len(), 2 + 2 * 64 + 512);
        assert_eq!(packed[0], 0);
        assert_eq!(packed[1], 0);
    }

    #[test]
    fn test_palette_encoding() {
        let packed = sample_asset().pack();
        let table = &packed[2 + 128..];

        // Red sits in the low five bits
        assert_eq!(u16::from_le_bytes([table[0], table[1]]), 0x801F);
        assert_eq!(u16::from_le_bytes([table[2], table[3]]), 0x83E0);
        assert_eq!(u16::from_le_bytes([table[4], table[5]]), 0xFC00);
        assert_eq!(u16::from_le_bytes([table[6], table[7]]), 0xFFFF);
        // Unused entries are opaque black
        assert_eq!(u16::from_le_bytes([table[8], table[9]]), 0x8000);
    }

    #[test]
    fn test_palette_is_repeated_eight_times() {
        let packed = sample_asset().pack();
        let table = &packed[2 + 128..];
        assert_eq!(table.len(), PALETTE_BYTES);
        let first = &table[..64];
        for repeat in 1..PALETTE_REPEATS {
            assert_eq!(&table[repeat * 64..(repeat + 1) * 64], first);
        }
    }

    #[test]
    fn test_channel_rounding() {
        // 128 * 31 / 255 = 15.56 rounds up to 16
        let c = Color15::from_rgb8(128, 128, 128);
        assert_eq!(c.0, 0x8000 | (16 << 10) | (16 << 5) | 16);
        // 4 * 31 / 255 = 0.486 rounds down
        assert_eq!(Color15::from_rgb8(4, 0, 0).0, 0x8000);
    }

    #[test]
    fn test_pack_parse_roundtrip() {
        let asset = sample_asset();
        let loaded = LoadedAsset::parse(&asset.pack()).unwrap();

        assert_eq!(loaded.width(), 8);
        assert_eq!(loaded.height(), 8);
        assert_eq!(loaded.plane0.texels, asset.plane0);
        assert_eq!(loaded.plane1.texels, asset.plane1);

        // Both palette views agree: full-byte lookups hit the same color
        // as the masked five-bit index
        assert_eq!(loaded.clut.colors.len(), 256);
        for byte in [0u8, 31, 32, 100, 255] {
            assert_eq!(
                loaded.clut.lookup(byte),
                loaded.clut.lookup(byte & 0x1f),
            );
        }
    }

    #[test]
    fn test_parse_rejects_truncation() {
        let packed = sample_asset().pack();

        let err = LoadedAsset::parse(&packed[..packed.len() - 1]).unwrap_err();
        match err {
            AssetError::Truncated { expected, actual } => {
                assert_eq!(expected, 642);
                assert_eq!(actual, 641);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            LoadedAsset::parse(&[]),
            Err(AssetError::Truncated { expected: 2, .. })
        ));
        assert!(matches!(
            LoadedAsset::parse(&packed[..300]),
            Err(AssetError::Truncated { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_size_code() {
        let mut packed = sample_asset().pack();
        packed[0] = 8;
        assert!(matches!(
            LoadedAsset::parse(&packed),
            Err(AssetError::BadSizeCode { code: 8 })
        ));
    }

    #[test]
    fn test_write_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.bin");

        let asset = sample_asset();
        asset.write_to(&path).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 642);

        let loaded = LoadedAsset::load(&path).unwrap();
        assert_eq!(loaded.plane0.texels, asset.plane0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LoadedAsset::load(&dir.path().join("nope.bin")).unwrap_err();
        assert!(matches!(err, AssetError::Missing { .. }));
    }
}
