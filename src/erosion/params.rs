//! Erosion simulation parameters and configuration

use serde::{Deserialize, Serialize};

/// Erosion intensity preset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ErosionPreset {
    /// No erosion - raw terrain
    None,
    /// A handful of droplets
    Light,
    /// Balanced erosion
    #[default]
    Normal,
    /// Many droplets moving more material
    Heavy,
}

impl ErosionPreset {
    pub fn all() -> &'static [Self] {
        &[Self::None, Self::Light, Self::Normal, Self::Heavy]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::None => "No erosion (raw terrain)",
            Self::Light => "A few droplets, barely visible",
            Self::Normal => "Balanced erosion",
            Self::Heavy => "Deep sinks and strong runoff",
        }
    }
}

impl std::fmt::Display for ErosionPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Light => write!(f, "light"),
            Self::Normal => write!(f, "normal"),
            Self::Heavy => write!(f, "heavy"),
        }
    }
}

/// Droplet erosion parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErosionParams {
    /// Number of droplets, run one after another
    pub iterations: usize,

    /// Material removed from each droplet's start cell
    /// (and deposited at its sink, if it reaches one)
    pub move_amount: f32,

    /// Start every droplet here instead of at a random cell
    pub fixed_position: Option<(usize, usize)>,
}

impl Default for ErosionParams {
    fn default() -> Self {
        Self {
            iterations: 10,
            move_amount: 0.1,
            fixed_position: None,
        }
    }
}

impl ErosionParams {
    /// Repeatedly erode from a single cell
    pub fn at_position(iterations: usize, move_amount: f32, x: usize, y: usize) -> Self {
        Self {
            iterations,
            move_amount,
            fixed_position: Some((x, y)),
        }
    }

    /// Create parameters from a preset
    pub fn from_preset(preset: ErosionPreset) -> Self {
        match preset {
            ErosionPreset::None => Self {
                iterations: 0,
                ..Default::default()
            },
            ErosionPreset::Light => Self::default(),
            ErosionPreset::Normal => Self {
                iterations: 1_000,
                ..Default::default()
            },
            ErosionPreset::Heavy => Self {
                iterations: 10_000,
                move_amount: 0.5,
                ..Default::default()
            },
        }
    }
}
