//! DS-style software rasterizer
//!
//! Features:
//! - Indexed textures resolved through a shared 256-entry palette
//! - Two palette views over the same texel bytes (256-color, 32-color + alpha)
//! - Exact-depth decal passes for multi-layer compositing
//! - Perspective-correct texturing, near-plane clipping, backface culling
//!
//! # Module Organization
//!
//! - `types` - Color15, Clut, IndexedTexture, Vertex, draw state
//! - `math` - Vec3, Vec2, projection, screen-space winding
//! - `camera` - Camera struct for 3D rendering
//! - `render` - Framebuffer and quad rendering
//! - `constants` - Screen resolution constants

// Sub-modules (exposed for namespaced access)
pub mod camera;
pub mod constants;
pub mod math;
pub mod render;
pub mod types;

// =============================================================================
// Convenience re-exports for commonly used items
// =============================================================================

// Types - core data structures
pub use types::{
    expand_5bit, Clut, Color15, DepthTest, IndexedTexture, PaletteView, Rgb5, TextureBinding,
    Vertex,
};

// Math - vectors and projection
pub use math::{perspective_transform, project, signed_area, Vec2, Vec3, NEAR_PLANE};

// Camera
pub use camera::Camera;

// Render - framebuffer and quad rendering
pub use render::{draw_quad, Framebuffer};

// Constants
pub use constants::{HEIGHT, WIDTH};
