/// 3D vector utilities for orbit projection.
/// Screen convention: x right, y down, z into the screen (away from the viewer).

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Shorthand constructor
pub fn vec3(x: f64, y: f64, z: f64) -> Vec3 {
    Vec3::new(x, y, z)
}

/// Rotate about the X axis: standard 2D rotation of (y, z).
#[inline]
pub fn rotate_about_x(v: Vec3, angle: f64) -> Vec3 {
    let (sin_a, cos_a) = angle.sin_cos();
    Vec3 {
        x: v.x,
        y: v.y * cos_a - v.z * sin_a,
        z: v.y * sin_a + v.z * cos_a,
    }
}

/// Rotate about the Y axis: standard 2D rotation of (x, z).
#[inline]
pub fn rotate_about_y(v: Vec3, angle: f64) -> Vec3 {
    let (sin_a, cos_a) = angle.sin_cos();
    Vec3 {
        x: v.x * cos_a + v.z * sin_a,
        y: v.y,
        z: -v.x * sin_a + v.z * cos_a,
    }
}

/// Point on a circle of radius `r` in the XY plane at `angle` radians.
#[inline]
pub fn circle_point(angle: f64, r: f64) -> Vec3 {
    let (sin_a, cos_a) = angle.sin_cos();
    Vec3::new(cos_a * r, sin_a * r, 0.0)
}
