//! Vector math for 3D rendering
//!
//! Camera-space transform, perspective projection and screen-space winding.
//! Projection preserves camera-space depth in the z component so the
//! rasterizer can depth-test and perspective-correct attributes.

use std::ops::{Add, Mul, Sub};

/// Near clipping plane distance in camera space
pub const NEAR_PLANE: f32 = 0.1;

/// Vertical field of view in degrees
pub const FOV_Y_DEGREES: f32 = 70.0;

/// 3D Vector
#[derive(Debug, Clone, Copy, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

/// 2D Vector (for texture coordinates)
#[derive(Debug, Clone, Copy, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Transform a camera-relative vertex by camera basis vectors (rotation)
pub fn perspective_transform(v: Vec3, cam_x: Vec3, cam_y: Vec3, cam_z: Vec3) -> Vec3 {
    Vec3 {
        x: v.dot(cam_x),
        y: v.dot(cam_y),
        z: v.dot(cam_z),
    }
}

/// Focal length in pixels for a screen of the given height
pub fn focal_length(height: f32) -> f32 {
    (height * 0.5) / (FOV_Y_DEGREES * 0.5).to_radians().tan()
}

/// Project a camera-space point to 2D screen coordinates
/// Returns Vec3 where x,y are screen coords and z is the ORIGINAL camera-space depth
/// (needed for perspective-correct texture interpolation)
/// The caller must clip against NEAR_PLANE first; z is assumed positive.
pub fn project(v: Vec3, width: usize, height: usize) -> Vec3 {
    let focal = focal_length(height as f32);
    let inv_z = 1.0 / v.z;

    Vec3 {
        x: v.x * focal * inv_z + (width as f32 / 2.0),
        y: v.y * focal * inv_z + (height as f32 / 2.0),
        z: v.z, // Store ORIGINAL camera-space Z for perspective-correct interpolation
    }
}

/// Twice the signed area of a screen-space triangle.
/// Negative for front-facing triangles in our winding convention
/// (y grows downward on screen). Doubles as the barycentric normalizer.
pub fn signed_area(v1: Vec3, v2: Vec3, v3: Vec3) -> f32 {
    (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!((c.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        let v = Vec3::ZERO.normalize();
        assert_eq!(v.x, 0.0);
        assert_eq!(v.y, 0.0);
        assert_eq!(v.z, 0.0);
    }

    #[test]
    fn test_project_axis_hits_screen_center() {
        let s = project(Vec3::new(0.0, 0.0, 4.0), 256, 192);
        assert!((s.x - 128.0).abs() < 0.001);
        assert!((s.y - 96.0).abs() < 0.001);
        assert!((s.z - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_project_farther_points_move_toward_center() {
        let near = project(Vec3::new(1.0, 1.0, 2.0), 256, 192);
        let far = project(Vec3::new(1.0, 1.0, 8.0), 256, 192);
        assert!((far.x - 128.0).abs() < (near.x - 128.0).abs());
        assert!((far.y - 96.0).abs() < (near.y - 96.0).abs());
    }

    #[test]
    fn test_focal_length_matches_fov() {
        // Half the screen height subtends half the field of view
        let focal = focal_length(192.0);
        let expected = 96.0 / (35.0f32).to_radians().tan();
        assert!((focal - expected).abs() < 0.01);
    }

    #[test]
    fn test_signed_area_winding() {
        // Clockwise on a y-down screen is the back-facing direction
        let a = Vec3::new(0.0, 0.0, 1.0);
        let b = Vec3::new(10.0, 0.0, 1.0);
        let c = Vec3::new(5.0, 10.0, 1.0);
        assert!(signed_area(a, b, c) > 0.0);
        assert!(signed_area(a, c, b) < 0.0);
    }
}
