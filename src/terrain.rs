//! Terrain synthesis operators.
//!
//! Every operator is a per-cell addition on a [`HeightGrid`], so they can be
//! stacked in any order:
//! 1. [`add_tilt`] - planar gradient over raw grid coordinates
//! 2. [`add_mountains`] - randomly placed Gaussian peaks
//! 3. [`add_noise`] - independent Gaussian noise per cell
//!
//! The random operators draw from an injected [`Rng`], so a seeded generator
//! reproduces the same terrain.

use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};
use thiserror::Error;
use tracing::debug;

use crate::heightmap::HeightGrid;
use crate::tilemap::GridError;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Mean peak height (the exponential's scale; rate is the reciprocal)
pub const MOUNTAIN_HEIGHT_MEAN: f32 = 20.0;
/// Mean spread factor of a peak
pub const MOUNTAIN_SPREAD_MEAN: f32 = 2.0;
/// Standard deviation of the spread factor
pub const MOUNTAIN_SPREAD_STD_DEV: f32 = 0.2;
/// Noise standard deviation used when none is given
pub const DEFAULT_NOISE_SCALE: f32 = 30.0;

/// Errors from terrain synthesis.
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error(transparent)]
    Grid(#[from] GridError),
    /// Noise standard deviation must be finite and non-negative
    #[error("invalid noise scale {0}")]
    InvalidNoiseScale(f32),
    /// A sampling distribution could not be built from its parameters
    #[error("invalid distribution: {0}")]
    Distribution(String),
}

// =============================================================================
// TILT
// =============================================================================

/// Add `x * x_slope + y * y_slope` to every cell.
///
/// Coordinates are raw cell indices, so the slope has to be picked relative
/// to the grid size.
pub fn add_tilt(heightmap: &mut HeightGrid, x_slope: f32, y_slope: f32) {
    for (x, y, h) in heightmap.cells_mut().iter_mut() {
        *h += x as f32 * x_slope + y as f32 * y_slope;
    }
}

// =============================================================================
// MOUNTAINS
// =============================================================================

/// Parameters of one mountain peak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MountainSpec {
    pub x: usize,
    pub y: usize,
    pub peak_height: f32,
    pub spread: f32,
}

impl MountainSpec {
    /// Height this peak contributes at `(x, y)`.
    ///
    /// The falloff width is `spread * peak_height`, so taller peaks are also
    /// wider. A zero width contributes nothing.
    pub fn bump_at(&self, x: usize, y: usize) -> f32 {
        let width = self.spread * self.peak_height;
        if width == 0.0 {
            return 0.0;
        }
        let dx = (x as f32 - self.x as f32) / width;
        let dy = (y as f32 - self.y as f32) / width;
        self.peak_height * (-(dx * dx)).exp() * (-(dy * dy)).exp()
    }
}

/// Draws mountain parameters: height ~ Exp(mean 20), spread ~ N(2, 0.2).
pub struct MountainSampler {
    height: Exp<f32>,
    spread: Normal<f32>,
}

impl MountainSampler {
    pub fn new() -> Result<Self, TerrainError> {
        let height = Exp::new(1.0 / MOUNTAIN_HEIGHT_MEAN)
            .map_err(|e| TerrainError::Distribution(e.to_string()))?;
        let spread = Normal::new(MOUNTAIN_SPREAD_MEAN, MOUNTAIN_SPREAD_STD_DEV)
            .map_err(|e| TerrainError::Distribution(e.to_string()))?;
        Ok(Self { height, spread })
    }

    /// Sample a peak anywhere on a `width` x `height` grid.
    pub fn sample(&self, rng: &mut impl Rng, width: usize, height: usize) -> MountainSpec {
        let x = rng.gen_range(0..width);
        let y = rng.gen_range(0..height);
        let peak_height = self.height.sample(rng);
        let spread = self.spread.sample(rng);
        MountainSpec { x, y, peak_height, spread }
    }
}

/// Add a single peak to every cell of the grid.
pub fn add_mountain(heightmap: &mut HeightGrid, spec: &MountainSpec) {
    for (x, y, h) in heightmap.cells_mut().iter_mut() {
        *h += spec.bump_at(x, y);
    }
}

/// Place `count` random peaks and return their parameters.
pub fn add_mountains(
    heightmap: &mut HeightGrid,
    count: usize,
    rng: &mut impl Rng,
) -> Result<Vec<MountainSpec>, TerrainError> {
    let sampler = MountainSampler::new()?;
    let (width, height) = (heightmap.width(), heightmap.height());

    let mut placed = Vec::with_capacity(count);
    for _ in 0..count {
        let spec = sampler.sample(rng, width, height);
        debug!(
            x = spec.x,
            y = spec.y,
            peak_height = spec.peak_height,
            spread = spec.spread,
            "placing mountain"
        );
        add_mountain(heightmap, &spec);
        placed.push(spec);
    }
    Ok(placed)
}

// =============================================================================
// NOISE
// =============================================================================

/// Add N(0, scale) noise independently to every cell.
pub fn add_noise(
    heightmap: &mut HeightGrid,
    scale: f32,
    rng: &mut impl Rng,
) -> Result<(), TerrainError> {
    if !scale.is_finite() || scale < 0.0 {
        return Err(TerrainError::InvalidNoiseScale(scale));
    }
    if scale == 0.0 {
        return Ok(());
    }

    let noise = Normal::new(0.0f32, scale)
        .map_err(|e| TerrainError::Distribution(e.to_string()))?;
    for (_, _, h) in heightmap.cells_mut().iter_mut() {
        *h += noise.sample(rng);
    }
    Ok(())
}
