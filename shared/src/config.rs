/// Icon used when the host supplies no usable icon list.
pub const DEFAULT_ICON: &str = "/assets/icons/planet.svg";

/// Orbit tuning. Every field falls back to its default when absent from JSON.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase", default)]
pub struct OrbitConfig {
    pub icon_count: u32,
    /// Angular speed range (deg/s); direction is drawn separately
    pub min_speed: f64,
    pub max_speed: f64,
    pub min_radius_vmin: f64,
    pub radius_step_vmin: f64,
    pub radius_jitter_vmin: f64,
    pub min_size_vmin: f64,
    pub max_size_vmin: f64,
    pub min_tilt_deg: f64,
    pub max_tilt_deg: f64,
    /// Largest whole-scene tilt the pointer can produce (deg)
    pub max_ambient_tilt_deg: f64,
    /// Largest time step applied in one frame (seconds)
    pub max_frame_dt: f64,
    /// Opacity of items at or beyond `max_depth_vmin`
    pub min_opacity: f64,
    pub max_depth_vmin: f64,
    pub default_icon: String,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            icon_count: 10,
            min_speed: 360.0 / 60.0,        // one revolution per minute
            max_speed: 360.0 / 14.0,        // one revolution per 14s
            min_radius_vmin: 10.0,
            radius_step_vmin: 6.0,
            radius_jitter_vmin: 1.75,
            min_size_vmin: 3.2,
            max_size_vmin: 7.5,
            min_tilt_deg: -30.0,
            max_tilt_deg: 30.0,
            max_ambient_tilt_deg: 8.0,
            max_frame_dt: 0.1,
            min_opacity: 0.55,
            max_depth_vmin: 40.0,
            default_icon: DEFAULT_ICON.to_string(),
        }
    }
}

fn check_range(name: &str, min: f64, max: f64) -> Result<(), String> {
    if !min.is_finite() || !max.is_finite() {
        return Err(format!("{} range must be finite", name));
    }
    if max < min {
        return Err(format!("{} max must be >= min", name));
    }
    Ok(())
}

impl OrbitConfig {
    pub fn validate(&self) -> Result<(), String> {
        check_range("speed", self.min_speed, self.max_speed)?;
        if self.min_speed < 0.0 {
            return Err("min_speed must be >= 0 (direction is drawn separately)".to_string());
        }
        check_range("size", self.min_size_vmin, self.max_size_vmin)?;
        if self.min_size_vmin <= 0.0 {
            return Err("min_size_vmin must be > 0".to_string());
        }
        check_range("tilt", self.min_tilt_deg, self.max_tilt_deg)?;
        if !self.min_radius_vmin.is_finite() || self.min_radius_vmin < 0.0 {
            return Err("min_radius_vmin must be finite and >= 0".to_string());
        }
        if !self.radius_step_vmin.is_finite() || self.radius_step_vmin < 0.0 {
            return Err("radius_step_vmin must be finite and >= 0".to_string());
        }
        if !self.radius_jitter_vmin.is_finite() || self.radius_jitter_vmin < 0.0 {
            return Err("radius_jitter_vmin must be finite and >= 0".to_string());
        }
        if !self.max_ambient_tilt_deg.is_finite() || self.max_ambient_tilt_deg < 0.0 {
            return Err("max_ambient_tilt_deg must be finite and >= 0".to_string());
        }
        if !self.max_frame_dt.is_finite() || self.max_frame_dt <= 0.0 {
            return Err("max_frame_dt must be finite and > 0".to_string());
        }
        if !(self.min_opacity > 0.0 && self.min_opacity <= 1.0) {
            return Err("min_opacity must be in (0, 1]".to_string());
        }
        if !self.max_depth_vmin.is_finite() || self.max_depth_vmin <= 0.0 {
            return Err("max_depth_vmin must be finite and > 0".to_string());
        }
        if self.default_icon.trim().is_empty() {
            return Err("default_icon must not be empty".to_string());
        }
        Ok(())
    }
}
