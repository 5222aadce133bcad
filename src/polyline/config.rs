use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Tuning knobs for [`PolylineEncoder`](super::PolylineEncoder).
///
/// Use the same `num_levels` and `zoom_factor` on the rendering side or the
/// levels string will be interpreted against the wrong zoom ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Number of magnification levels the polyline carries
    pub num_levels: u32,
    /// Change in magnification between consecutive levels
    pub zoom_factor: u32,
    /// Length of a barely visible feature at the highest zoom level.
    /// Raising it drops more points.
    pub epsilon: f64,
    /// Keep both endpoints visible at every zoom level
    pub force_endpoints: bool,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            num_levels: 18,
            zoom_factor: 2,
            epsilon: 0.00001,
            force_endpoints: true,
        }
    }
}

impl EncoderOptions {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).context("Failed to read encoder options file")?;
        let options = Self::from_toml_str(&content)?;
        info!("Loaded encoder options from {}", path.display());
        Ok(options)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let options: EncoderOptions =
            toml::from_str(content).context("Failed to parse encoder options")?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.num_levels > 0, "num_levels must be at least 1");
        ensure!(self.zoom_factor > 0, "zoom_factor must be at least 1");
        ensure!(
            self.epsilon.is_finite() && self.epsilon > 0.0,
            "epsilon must be a positive finite number, got {}",
            self.epsilon
        );
        Ok(())
    }
}
