//! Generation configuration.
//!
//! A [`GeneratorConfig`] describes one full run: grid size, the terrain
//! operators to apply and the erosion pass. It can be loaded from JSON; any
//! field left out falls back to its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::erosion::ErosionParams;
use crate::heightmap::DEFAULT_BASE_ELEVATION;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Planar gradient added over the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Elevation added per cell along x
    pub x_slope: f32,
    /// Elevation added per cell along y
    pub y_slope: f32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            x_slope: 0.02,
            y_slope: 0.02,
        }
    }
}

/// Configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Grid width (cells along x)
    pub width: usize,
    /// Grid height (cells along y)
    pub height: usize,
    /// Elevation of every cell before any operator runs
    pub base_elevation: f32,
    pub tilt: TiltConfig,
    /// Number of random mountain peaks
    pub mountains: usize,
    /// Noise standard deviation; `None` skips the noise pass
    pub noise_scale: Option<f32>,
    pub erosion: ErosionParams,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1500,
            base_elevation: DEFAULT_BASE_ELEVATION,
            tilt: TiltConfig::default(),
            mountains: 10,
            noise_scale: Some(0.5),
            erosion: ErosionParams::default(),
        }
    }
}

impl GeneratorConfig {
    /// Read a JSON config file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the values a run cannot recover from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.base_elevation.is_finite() {
            return Err(ConfigError::Invalid("base elevation must be finite".into()));
        }
        if !self.tilt.x_slope.is_finite() || !self.tilt.y_slope.is_finite() {
            return Err(ConfigError::Invalid("tilt slopes must be finite".into()));
        }
        if let Some(scale) = self.noise_scale {
            if !scale.is_finite() || scale < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "noise scale must be finite and non-negative, got {}",
                    scale
                )));
            }
        }
        if !self.erosion.move_amount.is_finite() {
            return Err(ConfigError::Invalid("erosion move amount must be finite".into()));
        }
        if let Some((x, y)) = self.erosion.fixed_position {
            if x >= self.width || y >= self.height {
                return Err(ConfigError::Invalid(format!(
                    "erosion position ({}, {}) is outside the {}x{} grid",
                    x, y, self.width, self.height
                )));
            }
        }
        Ok(())
    }
}
