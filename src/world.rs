//! World generation pipeline
//!
//! Runs the configured stages in order and bundles the result:
//! flat grid -> tilt -> mountains -> noise -> erosion.

use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, GeneratorConfig};
use crate::erosion::{self, ErosionStats};
use crate::heightmap::HeightGrid;
use crate::seeds::WorldSeeds;
use crate::terrain::{self, MountainSpec, TerrainError};
use crate::tilemap::GridError;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Terrain(#[from] TerrainError),
}

/// All generated data bundled together
pub struct WorldData {
    /// Seeds used for generation (allows recreation)
    pub seeds: WorldSeeds,
    /// Configuration the world was generated from
    pub config: GeneratorConfig,
    /// Final elevation grid
    pub heightmap: HeightGrid,
    /// Peaks placed by the mountain stage
    pub mountains: Vec<MountainSpec>,
    /// Outcome of the erosion stage
    pub erosion_stats: ErosionStats,
}

impl WorldData {
    /// Convenience accessor for master seed
    pub fn seed(&self) -> u64 {
        self.seeds.master
    }

    pub fn width(&self) -> usize {
        self.heightmap.width()
    }

    pub fn height(&self) -> usize {
        self.heightmap.height()
    }
}

/// Build the terrain described by `config`, before any erosion.
pub fn generate_terrain(
    config: &GeneratorConfig,
    seeds: &WorldSeeds,
) -> Result<(HeightGrid, Vec<MountainSpec>), GenerationError> {
    config.validate()?;

    let mut heightmap = HeightGrid::new(config.width, config.height, config.base_elevation)?;

    info!(x_slope = config.tilt.x_slope, y_slope = config.tilt.y_slope, "adding tilt");
    terrain::add_tilt(&mut heightmap, config.tilt.x_slope, config.tilt.y_slope);

    info!(count = config.mountains, "adding mountains");
    let mountains =
        terrain::add_mountains(&mut heightmap, config.mountains, &mut seeds.mountain_rng())?;

    if let Some(scale) = config.noise_scale {
        info!(scale, "adding noise");
        terrain::add_noise(&mut heightmap, scale, &mut seeds.noise_rng())?;
    }

    Ok((heightmap, mountains))
}

/// Run the whole pipeline, erosion included.
pub fn generate_world(
    config: GeneratorConfig,
    seeds: WorldSeeds,
) -> Result<WorldData, GenerationError> {
    info!(width = config.width, height = config.height, %seeds, "generating terrain");
    let (mut heightmap, mountains) = generate_terrain(&config, &seeds)?;

    let (min_h, max_h) = heightmap.elevation_range();
    info!("Heightmap range: {:.2} to {:.2}", min_h, max_h);

    info!(
        iterations = config.erosion.iterations,
        move_amount = config.erosion.move_amount,
        "simulating erosion"
    );
    let erosion_stats =
        erosion::simulate_erosion(&mut heightmap, &config.erosion, &mut seeds.erosion_rng())?;

    Ok(WorldData {
        seeds,
        config,
        heightmap,
        mountains,
        erosion_stats,
    })
}
