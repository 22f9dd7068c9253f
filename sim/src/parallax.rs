use crate::surface::Rect;
use orbit_shared::protocol::AmbientTilt;

/// Maps pointer position over the scene box to a small whole-scene tilt.
#[derive(Debug, Clone, Copy)]
pub struct PointerParallax {
    max_tilt_deg: f64,
}

impl PointerParallax {
    pub fn new(max_tilt_deg: f64) -> Self {
        Self { max_tilt_deg }
    }

    /// Tilt for a pointer at client position (x, y).
    ///
    /// The offset from the box centre is normalised by the box size, so it
    /// is about [-0.5, 0.5] over the box. Each half-extent maps to the full
    /// `max_tilt_deg`; anything further out is clamped.
    pub fn tilt_for(&self, x: f64, y: f64, bounds: Rect) -> AmbientTilt {
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return AmbientTilt::default();
        }
        let (cx, cy) = bounds.center();
        let dx = (x - cx) / bounds.width;
        let dy = (y - cy) / bounds.height;

        let max = self.max_tilt_deg;
        AmbientTilt {
            rx: (-dy * 2.0 * max).clamp(-max, max),
            ry: (dx * 2.0 * max).clamp(-max, max),
        }
    }
}
