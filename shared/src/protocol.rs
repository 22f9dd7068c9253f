use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::OrbitConfig;

/// Protocol version - increment when making breaking changes.
pub const PROTOCOL_VERSION: u32 = 1;

// === Simulator -> presentation layer ===

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(tag = "type")]
pub enum SceneMsg {
    #[serde(rename = "mounted")]
    Mounted(MountedMsg),
    #[serde(rename = "frame")]
    Frame(FrameMsg),
    #[serde(rename = "tilt")]
    Tilt(AmbientTilt),
    #[serde(rename = "unmounted")]
    Unmounted,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct MountedMsg {
    pub protocol_version: u32,
    pub items: Vec<ItemSpawn>,
    pub config: OrbitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
pub struct FrameMsg {
    /// Seconds of simulated time since mount
    pub time: f64,
    pub items: Vec<ItemFrame>,
    pub ambient: AmbientTilt,
}

/// Everything the presentation layer needs to create one icon element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ItemSpawn {
    pub index: u32,
    pub icon: String,
    pub hue_deg: u16,
    pub size_vmin: f64,
    pub radius_vmin: f64,
    pub tilt_x_deg: f64,
    pub tilt_y_deg: f64,
}

/// Per-frame visual state of one item. `x`/`y` are host pixels,
/// `depth` is positive away from the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ItemFrame {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
    pub size_vmin: f64,
    pub opacity: f64,
}

impl ItemFrame {
    /// CSS transform placing the element's centre on (x, y, depth).
    /// CSS translateZ grows toward the viewer, hence the negated depth.
    pub fn css_transform(&self) -> String {
        format!(
            "translate3d({:.2}px, {:.2}px, {:.2}px) translate(-50%, -50%)",
            self.x, self.y, -self.depth
        )
    }

    pub fn rounded(&self) -> ItemFrame {
        ItemFrame {
            x: round4(self.x),
            y: round4(self.y),
            depth: round4(self.depth),
            size_vmin: round4(self.size_vmin),
            opacity: round4(self.opacity),
        }
    }
}

/// Whole-scene tilt driven by the pointer (degrees).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/generated/")]
pub struct AmbientTilt {
    /// Rotation about the horizontal axis, from vertical pointer offset
    pub rx: f64,
    /// Rotation about the vertical axis, from horizontal pointer offset
    pub ry: f64,
}

/// Round to 4 decimal places (keeps snapshot JSON small)
#[inline]
pub fn round4(v: f64) -> f64 {
    (v * 10000.0).round() / 10000.0
}
