//! Terrain generation library
//!
//! Heightmap synthesis (tilt, mountains, noise) and droplet erosion.
//! Re-exports modules for use by binaries and tools.

pub mod config;
pub mod erosion;
pub mod heightmap;
pub mod persistence;
pub mod seeds;
pub mod terrain;
pub mod tilemap;
pub mod world;
