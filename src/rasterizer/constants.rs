//! Rasterizer constants
//!
//! Screen resolution and other fundamental constants.

/// Screen width (authentic DS resolution)
pub const WIDTH: usize = 256;

/// Screen height (authentic DS resolution)
pub const HEIGHT: usize = 192;
