//! Seed management for terrain generation
//!
//! Each stochastic stage (mountain placement, noise, erosion) gets its own seed,
//! derived from a master seed by default. Overriding one stage's seed leaves
//! the others untouched, so e.g. erosion can be re-rolled on identical terrain.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeds for all generation stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Mountain positions, heights and spreads
    pub mountains: u64,
    /// Per-cell Gaussian noise
    pub noise: u64,
    /// Random droplet start cells
    pub erosion: u64,
}

impl WorldSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            mountains: derive_seed(master, "mountains"),
            noise: derive_seed(master, "noise"),
            erosion: derive_seed(master, "erosion"),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> WorldSeedsBuilder {
        WorldSeedsBuilder::new(master)
    }

    pub fn mountain_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.mountains)
    }

    pub fn noise_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.noise)
    }

    pub fn erosion_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.erosion)
    }
}

impl Default for WorldSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Builder for customizing individual seeds while deriving others from master
pub struct WorldSeedsBuilder {
    seeds: WorldSeeds,
}

impl WorldSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: WorldSeeds::from_master(master),
        }
    }

    /// Override the mountains seed
    pub fn mountains(mut self, seed: u64) -> Self {
        self.seeds.mountains = seed;
        self
    }

    /// Override the noise seed
    pub fn noise(mut self, seed: u64) -> Self {
        self.seeds.noise = seed;
        self
    }

    /// Override the erosion seed
    pub fn erosion(mut self, seed: u64) -> Self {
        self.seeds.erosion = seed;
        self
    }

    pub fn build(self) -> WorldSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from a master seed and a stage name.
///
/// `DefaultHasher` output is not guaranteed to be stable across Rust
/// releases, so a master seed may yield different terrain after a toolchain
/// upgrade.
fn derive_seed(master: u64, stage: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    stage.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for WorldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorldSeeds {{ master: {}, mountains: {}, noise: {}, erosion: {} }}",
            self.master, self.mountains, self.noise, self.erosion,
        )
    }
}
