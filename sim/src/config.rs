use crate::surface::Viewport;
use orbit_shared::config::OrbitConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

/// Simulator configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimConfig {
    pub frame_rate_hz: u32,
    /// How often frame snapshots are broadcast
    pub report_rate_hz: u32,
    /// None draws a fresh seed from the OS
    pub rng_seed: Option<u64>,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Comma-separated icon list, as a host element would carry it
    pub icons: Option<String>,
    pub reduced_motion: bool,
    pub orbit: OrbitConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frame_rate_hz: 60,
            report_rate_hz: 2,
            rng_seed: None,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            icons: None,
            reduced_motion: false,
            orbit: OrbitConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load from a JSON file. Absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        serde_json::from_str(&text).map_err(|e| format!("failed to parse {}: {}", path.display(), e))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.frame_rate_hz == 0 {
            return Err("frame_rate_hz must be > 0".to_string());
        }
        if self.report_rate_hz == 0 || self.report_rate_hz > self.frame_rate_hz {
            return Err("report_rate_hz must be in 1..=frame_rate_hz".to_string());
        }
        if !(self.viewport_width.is_finite() && self.viewport_width > 0.0)
            || !(self.viewport_height.is_finite() && self.viewport_height > 0.0)
        {
            return Err("viewport dimensions must be finite and > 0".to_string());
        }
        self.orbit.validate()
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    pub fn rng(&self) -> ChaCha8Rng {
        match self.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn default_sim_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn report_faster_than_frames_invalid() {
        let config = SimConfig {
            frame_rate_hz: 30,
            report_rate_hz: 60,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_viewport_invalid() {
        let config = SimConfig {
            viewport_width: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_orbit_config_is_reported() {
        let mut config = SimConfig::default();
        config.orbit.min_size_vmin = 9.0;
        config.orbit.max_size_vmin = 1.0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("size"));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let config = SimConfig {
            rng_seed: Some(99),
            ..Default::default()
        };
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn nested_json_overrides() {
        let config: SimConfig = serde_json::from_str(
            r#"{"rngSeed": 5, "icons": "a.svg,b.svg", "orbit": {"iconCount": 12}}"#,
        )
        .unwrap();
        assert_eq!(config.rng_seed, Some(5));
        assert_eq!(config.orbit.icon_count, 12);
        assert_eq!(config.frame_rate_hz, 60);
        assert_eq!(config.icons.as_deref(), Some("a.svg,b.svg"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = SimConfig::from_json_file(Path::new("/nonexistent/orbit.json")).unwrap_err();
        assert!(err.contains("failed to read"));
    }
}
