//! Texture baking pipeline
//!
//! Turns a diffuse texture plus a tangent-space normal map into the packed
//! two-plane asset the viewer consumes:
//!
//! 1. quantize the diffuse image to a 32-color palette (`palette`)
//! 2. encode the normal map into per-texel blend alphas (`encode`)
//! 3. pack planes, header and palette into the on-disk layout (`asset`)
//!
//! Every step is a pure function over pixel data; only `convert_files`
//! touches the filesystem.

mod encode;
mod palette;

pub use encode::{
    alpha_factors, blend_weights, decode_normal, encode_planes, pack_texel, unpack_texel,
    EncodedPlanes,
};
pub use palette::{quantize_exact, QuantizedImage, MAX_COLORS};

use std::path::Path;

use image::RgbaImage;
use log::info;
use thiserror::Error;

use crate::asset::{size_code, Asset};
use crate::basis::BasisSet;

#[derive(Debug, Error)]
pub enum BakeError {
    #[error("can't decode {path}: {message}")]
    ImageDecode { path: String, message: String },

    #[error("resolution mismatch: diffuse is {tex_w}x{tex_h} but normal map is {map_w}x{map_h}")]
    ResolutionMismatch {
        tex_w: u32,
        tex_h: u32,
        map_w: u32,
        map_h: u32,
    },

    #[error("unsupported resolution {width}x{height}: sides must be powers of two from 8 to 1024")]
    UnsupportedResolution { width: u32, height: u32 },

    #[error("too many colors in diffuse texture: the palette holds at most {limit}")]
    PaletteOverflow { limit: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Load an image as RGBA8, tagging decode failures with the path
pub fn load_rgba(path: &Path) -> Result<RgbaImage, BakeError> {
    let img = image::open(path).map_err(|e| BakeError::ImageDecode {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(img.to_rgba8())
}

/// Bake a diffuse texture and its normal map into an asset.
///
/// Dimension checks run before any pixel work: first that the two images
/// agree with each other, then that the shared size is one the header can
/// express.
pub fn build_asset(
    basis: &BasisSet,
    diffuse: &RgbaImage,
    normal: &RgbaImage,
) -> Result<Asset, BakeError> {
    let (tex_w, tex_h) = diffuse.dimensions();
    let (map_w, map_h) = normal.dimensions();

    if (tex_w, tex_h) != (map_w, map_h) {
        return Err(BakeError::ResolutionMismatch {
            tex_w,
            tex_h,
            map_w,
            map_h,
        });
    }

    let size_code_w = size_code(tex_w).ok_or(BakeError::UnsupportedResolution {
        width: tex_w,
        height: tex_h,
    })?;
    let size_code_h = size_code(tex_h).ok_or(BakeError::UnsupportedResolution {
        width: tex_w,
        height: tex_h,
    })?;

    let quantized = quantize_exact(diffuse.as_raw(), tex_w as usize, tex_h as usize)?;
    let planes = encode_planes(basis, &quantized.indices, normal.as_raw());

    Ok(Asset {
        size_code_w,
        size_code_h,
        plane0: planes.plane0,
        plane1: planes.plane1,
        palette: quantized.palette,
    })
}

/// File-to-file conversion: load both images, bake, write the asset.
///
/// Nothing is written until the bake has fully succeeded, so a failing
/// conversion never leaves an output file behind.
pub fn convert_files(diffuse: &Path, normal: &Path, out: &Path) -> Result<(), BakeError> {
    let diffuse_img = load_rgba(diffuse)?;
    let normal_img = load_rgba(normal)?;

    let basis = BasisSet::new();
    let asset = build_asset(&basis, &diffuse_img, &normal_img)?;

    info!(
        "baked {}: {}x{}, {} palette colors",
        out.display(),
        asset.width(),
        asset.height(),
        asset.palette.len()
    );
    asset.write_to(out)?;

    Ok(())
}
