//! TRILIGHT: radiosity normal mapping on a DS-style software rasterizer
//!
//! Normal-mapped lighting without pixel shaders, the way a certain dual-screen
//! handheld had to do it:
//! - `texconv` bakes a normal map into per-texel blend weights over three
//!   fixed basis lighting directions, packed as 3-bit alphas into two
//!   32-color palette texture planes
//! - the viewer lights a floor per-vertex once per basis direction and
//!   composites the three passes through the baked alphas with an
//!   equal-depth test, reconstructing a per-pixel lighting response
//! - 256x192, 15-bit color, fixed-point light math (4096 = 1.0)

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod asset;
pub mod bake;
pub mod basis;
pub mod config;
pub mod fixed;
pub mod lighting;
pub mod rasterizer;
pub mod scene;
