//! Orbit motion model: angle advance, tilted-plane projection and depth shading.

use orbit_shared::protocol::{ItemFrame, ItemSpawn};
use orbit_shared::vec3::{circle_point, rotate_about_x, rotate_about_y, Vec3};

/// One icon on its own tilted circular orbit.
#[derive(Debug, Clone)]
pub struct OrbitItem<H> {
    pub handle: H,
    /// Position in creation order, stable even if the host refused a sibling
    pub index: u32,
    /// Current orbital angle, kept in [0, 360)
    pub base_angle_deg: f64,
    /// Signed; the sign is the direction of revolution
    pub speed_deg_per_sec: f64,
    pub radius_vmin: f64,
    pub size_vmin: f64,
    /// Tilt of the orbital plane about X (radians)
    pub tilt_x: f64,
    /// Tilt of the orbital plane about Y (radians)
    pub tilt_y: f64,
    pub icon: String,
    pub hue_deg: u16,
}

impl<H> OrbitItem<H> {
    /// Advance the orbital angle by `dt` seconds.
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        let angle = (self.base_angle_deg + self.speed_deg_per_sec * dt).rem_euclid(360.0);
        // rem_euclid rounds tiny negatives up to exactly 360
        self.base_angle_deg = if angle >= 360.0 { 0.0 } else { angle };
    }

    /// Screen-space position for the current angle.
    #[inline]
    pub fn position(&self, projection: &Projection) -> Vec3 {
        project(
            self.base_angle_deg,
            self.radius_vmin * projection.px_per_vmin,
            self.tilt_x,
            self.tilt_y,
            projection.center_x,
            projection.center_y,
        )
    }

    /// Visual state for the current angle.
    #[inline]
    pub fn frame(&self, projection: &Projection) -> ItemFrame {
        let p = self.position(projection);
        ItemFrame {
            x: p.x,
            y: p.y,
            depth: p.z,
            size_vmin: self.size_vmin,
            opacity: depth_factor(p.z, projection.max_depth_px(), projection.min_opacity),
        }
    }

    pub fn spawn_info(&self) -> ItemSpawn {
        ItemSpawn {
            index: self.index,
            icon: self.icon.clone(),
            hue_deg: self.hue_deg,
            size_vmin: self.size_vmin,
            radius_vmin: self.radius_vmin,
            tilt_x_deg: self.tilt_x.to_degrees(),
            tilt_y_deg: self.tilt_y.to_degrees(),
        }
    }
}

/// Scene-wide projection parameters, recomputed on resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Orbit centre in host-local pixels
    pub center_x: f64,
    pub center_y: f64,
    pub px_per_vmin: f64,
    pub max_depth_vmin: f64,
    pub min_opacity: f64,
}

impl Projection {
    pub fn max_depth_px(&self) -> f64 {
        self.max_depth_vmin * self.px_per_vmin
    }
}

/// Position on a circular orbit of `radius` tilted by `tilt_x` then
/// `tilt_y`, translated to (cx, cy). The returned z is depth, positive
/// away from the viewer.
#[inline]
pub fn project(angle_deg: f64, radius: f64, tilt_x: f64, tilt_y: f64, cx: f64, cy: f64) -> Vec3 {
    let planar = circle_point(angle_deg.to_radians(), radius);
    let p = rotate_about_y(rotate_about_x(planar, tilt_x), tilt_y);
    Vec3::new(cx + p.x, cy + p.y, p.z)
}

/// Opacity for depth `pz`: 1 at or in front of the centre plane, falling
/// linearly to `floor` at `max_depth` and beyond.
#[inline]
pub fn depth_factor(pz: f64, max_depth: f64, floor: f64) -> f64 {
    if max_depth <= 0.0 || pz.is_nan() {
        return 1.0;
    }
    (1.0 - pz / max_depth).clamp(floor, 1.0)
}
