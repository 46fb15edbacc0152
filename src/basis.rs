//! The three fixed basis lighting directions
//!
//! Radiosity normal mapping decomposes a tangent-space normal into blend
//! weights over three reference directions. The set used here tilts each
//! direction 60 degrees away from the surface normal (z), at azimuths 0,
//! 120 and 240 degrees, which covers the hemisphere evenly.
//!
//! The encoder works in float; the runtime lighting works in 4.12
//! fixed-point. Both forms live here so the two stages cannot drift apart.

use crate::fixed::FixedVec3;

/// Tilt of every basis direction away from the surface-normal axis, degrees
pub const TILT_DEGREES: f32 = 60.0;

/// Azimuth of each basis direction around the normal axis, degrees
pub const AZIMUTH_DEGREES: [f32; 3] = [0.0, 120.0, 240.0];

/// Straight up in the tangent frame, used as the pseudo-normal when
/// enhanced lighting is off
pub const FLAT_UP: FixedVec3 = FixedVec3::from_raw(0, 0, 4096);

/// The three basis directions, in both numeric forms
///
/// Built once at startup and passed explicitly to the encoder and the
/// lighting engine.
#[derive(Debug, Clone)]
pub struct BasisSet {
    /// Unit directions in tangent space, float form (encoder side)
    pub float_dirs: [[f32; 3]; 3],
    /// The same directions in 4.12 fixed-point (lighting side)
    pub fixed_dirs: [FixedVec3; 3],
}

impl BasisSet {
    pub fn new() -> Self {
        let tilt = TILT_DEGREES.to_radians();
        let (tilt_sin, tilt_cos) = tilt.sin_cos();

        let float_dirs = AZIMUTH_DEGREES.map(|az| {
            let az = az.to_radians();
            [az.cos() * tilt_sin, az.sin() * tilt_sin, tilt_cos]
        });

        // Rounded to 4.12 once and pinned; the test below keeps the two
        // forms in sync
        let fixed_dirs = [
            FixedVec3::from_raw(3547, 0, 2048),
            FixedVec3::from_raw(-1774, 3072, 2048),
            FixedVec3::from_raw(-1774, -3072, 2048),
        ];

        Self {
            float_dirs,
            fixed_dirs,
        }
    }
}

impl Default for BasisSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_dirs_are_unit_length() {
        let basis = BasisSet::new();
        for dir in basis.float_dirs {
            let len2 = dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2];
            assert!((len2 - 1.0).abs() < 1e-5, "length^2 = {}", len2);
        }
    }

    #[test]
    fn test_fixed_dirs_match_float_dirs() {
        let basis = BasisSet::new();
        for (float_dir, fixed_dir) in basis.float_dirs.iter().zip(basis.fixed_dirs) {
            assert_eq!((float_dir[0] * 4096.0).round() as i32, fixed_dir.x.0);
            assert_eq!((float_dir[1] * 4096.0).round() as i32, fixed_dir.y.0);
            assert_eq!((float_dir[2] * 4096.0).round() as i32, fixed_dir.z.0);
        }
    }

    #[test]
    fn test_first_dir_has_no_y() {
        let basis = BasisSet::new();
        assert_eq!(basis.fixed_dirs[0].y.0, 0);
        // Azimuth 0 leans along +x
        assert!(basis.fixed_dirs[0].x.0 > 0);
    }
}
