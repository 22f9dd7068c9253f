//! Seams between the simulator and whatever displays it.

use orbit_shared::protocol::{AmbientTilt, ItemFrame, ItemSpawn};

/// Axis-aligned box in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Centre in client coordinates.
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Centre relative to the box's own top-left corner.
    pub fn local_center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixels per vmin (1% of the smaller viewport side).
    pub fn px_per_vmin(&self) -> f64 {
        self.width.min(self.height).max(0.0) / 100.0
    }
}

/// The element that hosts the orbiting icons.
pub trait HostSurface {
    /// Reference to one created child element.
    type Handle;

    /// Raw comma-separated icon list, if the host carries one.
    fn icon_attribute(&self) -> Option<String>;

    fn bounds(&self) -> Rect;

    /// Create and attach a child element. `None` if the host refused it.
    fn create_item(&mut self, spawn: &ItemSpawn) -> Option<Self::Handle>;

    fn apply_frame(&mut self, handle: &Self::Handle, frame: &ItemFrame);

    fn apply_ambient_tilt(&mut self, tilt: AmbientTilt);

    /// Detach and release a child element.
    fn remove_item(&mut self, handle: Self::Handle);
}

/// Queries answered by the surrounding environment.
pub trait Environment {
    fn viewport(&self) -> Viewport;
    fn prefers_reduced_motion(&self) -> bool;
}

/// Fixed environment, for tests and headless runs.
#[derive(Debug, Clone, Copy)]
pub struct StaticEnvironment {
    pub viewport: Viewport,
    pub reduced_motion: bool,
}

impl StaticEnvironment {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            reduced_motion: false,
        }
    }

    pub fn with_reduced_motion(mut self, reduced_motion: bool) -> Self {
        self.reduced_motion = reduced_motion;
        self
    }
}

impl Environment for StaticEnvironment {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

/// One child element of a [`MemorySurface`].
#[derive(Debug, Clone)]
pub struct MemoryElement {
    pub spawn: ItemSpawn,
    pub last_frame: Option<ItemFrame>,
    pub frames_applied: u64,
    pub attached: bool,
}

/// Host that records every write in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    pub bounds: Rect,
    pub icon_attribute: Option<String>,
    pub elements: Vec<MemoryElement>,
    pub ambient: AmbientTilt,
    pub tilt_writes: u64,
}

impl MemorySurface {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    pub fn with_icons(mut self, attr: impl Into<String>) -> Self {
        self.icon_attribute = Some(attr.into());
        self
    }

    pub fn attached_count(&self) -> usize {
        self.elements.iter().filter(|e| e.attached).count()
    }
}

impl HostSurface for MemorySurface {
    type Handle = usize;

    fn icon_attribute(&self) -> Option<String> {
        self.icon_attribute.clone()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn create_item(&mut self, spawn: &ItemSpawn) -> Option<usize> {
        self.elements.push(MemoryElement {
            spawn: spawn.clone(),
            last_frame: None,
            frames_applied: 0,
            attached: true,
        });
        Some(self.elements.len() - 1)
    }

    fn apply_frame(&mut self, handle: &usize, frame: &ItemFrame) {
        if let Some(element) = self.elements.get_mut(*handle) {
            element.last_frame = Some(*frame);
            element.frames_applied += 1;
        }
    }

    fn apply_ambient_tilt(&mut self, tilt: AmbientTilt) {
        self.ambient = tilt;
        self.tilt_writes += 1;
    }

    fn remove_item(&mut self, handle: usize) {
        if let Some(element) = self.elements.get_mut(handle) {
            element.attached = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_per_vmin_uses_smaller_side() {
        assert_eq!(Viewport::new(1600.0, 900.0).px_per_vmin(), 9.0);
        assert_eq!(Viewport::new(500.0, 1000.0).px_per_vmin(), 5.0);
    }

    #[test]
    fn rect_centers() {
        let r = Rect::new(100.0, 50.0, 400.0, 200.0);
        assert_eq!(r.center(), (300.0, 150.0));
        assert_eq!(r.local_center(), (200.0, 100.0));
    }

    #[test]
    fn memory_surface_tracks_attachment() {
        let mut surface = MemorySurface::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let spawn = ItemSpawn {
            index: 0,
            icon: "a.svg".to_string(),
            hue_deg: 10,
            size_vmin: 4.0,
            radius_vmin: 10.0,
            tilt_x_deg: 0.0,
            tilt_y_deg: 0.0,
        };
        let a = surface.create_item(&spawn).unwrap();
        let b = surface.create_item(&spawn).unwrap();
        assert_eq!(surface.attached_count(), 2);
        surface.remove_item(a);
        assert_eq!(surface.attached_count(), 1);
        assert!(surface.elements[b].attached);
    }
}
