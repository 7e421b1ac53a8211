//! Erosion simulation module
//!
//! Droplet-based erosion: each droplet is dropped on a cell, traced downhill
//! over a snapshot of the terrain, and then moves material on the live grid.
//! - Material is always removed from the start cell
//! - If the droplet settles in a sink, the material is deposited there
//! - If it runs off the edge, the material leaves the terrain

pub mod flow;
pub mod params;

pub use flow::{trace_flow, FlowPath, FlowState, FlowTracer, TerminationOutcome};
pub use params::{ErosionParams, ErosionPreset};

use rand::Rng;
use tracing::debug;

use crate::heightmap::HeightGrid;
use crate::tilemap::GridError;

/// Statistics from erosion simulation
#[derive(Debug, Default)]
pub struct ErosionStats {
    /// Number of droplets processed
    pub iterations: usize,
    /// Droplets that settled in a sink
    pub sink_count: usize,
    /// Droplets that ran off the edge
    pub edge_count: usize,
    /// Total material removed from start cells
    pub total_eroded: f64,
    /// Total material deposited at sinks
    pub total_deposited: f64,
    /// Total number of droplet moves
    pub steps_taken: u64,
    /// Most moves made by a single droplet
    pub longest_path: usize,
    /// Path of the final droplet, for overlays
    pub last_path: Option<FlowPath>,
}

impl ErosionStats {
    /// Material gained (positive) or lost (negative) by the whole grid.
    pub fn net_mass_change(&self) -> f64 {
        self.total_deposited - self.total_eroded
    }
}

/// Run `params.iterations` droplets one after another against `heightmap`.
///
/// Each droplet is traced on a fresh snapshot, so it only sees the changes of
/// earlier droplets, never its own.
pub fn simulate_erosion(
    heightmap: &mut HeightGrid,
    params: &ErosionParams,
    rng: &mut impl Rng,
) -> Result<ErosionStats, GridError> {
    let width = heightmap.width();
    let height = heightmap.height();

    if let Some((x, y)) = params.fixed_position {
        if !heightmap.contains(x, y) {
            return Err(GridError::OutOfBounds { x, y, width, height });
        }
    }

    let mut stats = ErosionStats::default();
    let amount = params.move_amount;

    for _ in 0..params.iterations {
        let (start_x, start_y) = match params.fixed_position {
            Some(position) => position,
            None => (rng.gen_range(0..width), rng.gen_range(0..height)),
        };

        let snapshot = heightmap.snapshot();
        let (outcome, path) = FlowTracer::new(&snapshot, start_x, start_y)?.trace()?;

        heightmap.add(start_x, start_y, -amount)?;
        stats.total_eroded += amount as f64;

        match outcome {
            TerminationOutcome::Sink => {
                let (sink_x, sink_y) = path.last();
                heightmap.add(sink_x, sink_y, amount)?;
                stats.total_deposited += amount as f64;
                stats.sink_count += 1;
            }
            TerminationOutcome::Edge => {
                stats.edge_count += 1;
            }
        }

        stats.iterations += 1;
        stats.steps_taken += path.moves() as u64;
        stats.longest_path = stats.longest_path.max(path.moves());
        stats.last_path = Some(path);
    }

    debug!(
        iterations = stats.iterations,
        sinks = stats.sink_count,
        edges = stats.edge_count,
        net = stats.net_mass_change(),
        "erosion finished"
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_self_sink_is_noop() {
        let mut grid = HeightGrid::flat(5, 5).unwrap();
        let params = ErosionParams::at_position(1, 1.0, 2, 2);
        let stats =
            simulate_erosion(&mut grid, &params, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();

        assert_eq!(grid, HeightGrid::flat(5, 5).unwrap());
        assert_eq!(stats.sink_count, 1);
        assert_eq!(stats.edge_count, 0);
        assert_eq!(stats.net_mass_change(), 0.0);
        assert_eq!(stats.last_path.unwrap().cells(), &[(2, 2)]);
    }

    #[test]
    fn test_edge_runoff_only_lowers_start() {
        let mut grid = HeightGrid::new(7, 5, 0.0).unwrap();
        terrain::add_tilt(&mut grid, 1.0, 0.0);
        let before = grid.clone();

        let params = ErosionParams::at_position(1, 2.0, 4, 2);
        let stats =
            simulate_erosion(&mut grid, &params, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();

        assert_eq!(stats.edge_count, 1);
        assert_eq!(stats.net_mass_change(), -2.0);
        for (x, y, &h) in grid.cells().iter() {
            let original = before.get(x, y).unwrap();
            if (x, y) == (4, 2) {
                assert_eq!(h, original - 2.0);
            } else {
                assert_eq!(h, original);
            }
        }
    }

    #[test]
    fn test_sink_deposit_conserves_mass() {
        let mut grid = HeightGrid::new(5, 5, 5.0).unwrap();
        grid.set(2, 2, 0.0).unwrap();

        let params = ErosionParams::at_position(1, 0.5, 1, 3);
        let stats =
            simulate_erosion(&mut grid, &params, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();

        assert_eq!(grid.get(1, 3).unwrap(), 4.5);
        assert_eq!(grid.get(2, 2).unwrap(), 0.5);
        assert_eq!(stats.sink_count, 1);
        assert_eq!(stats.steps_taken, 1);
        assert!((grid.total_mass() - (24.0 * 5.0)).abs() < 1e-6);
    }

    #[test]
    fn test_repeated_droplets_see_earlier_changes() {
        // Pit at (2, 2) is 1.0 below the rim; each droplet from (1, 2) moves 0.4.
        // After two droplets the rim cell has dropped below the filling pit.
        let mut grid = HeightGrid::new(5, 5, 5.0).unwrap();
        grid.set(2, 2, 4.0).unwrap();

        let params = ErosionParams::at_position(3, 0.4, 1, 2);
        let stats =
            simulate_erosion(&mut grid, &params, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();

        assert_eq!(stats.sink_count, 3);
        assert_eq!(stats.steps_taken, 2);
        // Third droplet finds (1, 2) already the lowest cell and settles in place
        assert_eq!(stats.last_path.unwrap().cells(), &[(1, 2)]);
        assert!((grid.get(2, 2).unwrap() - 4.8).abs() < 1e-5);
        assert!((grid.get(1, 2).unwrap() - 4.2).abs() < 1e-5);
    }

    #[test]
    fn test_fixed_position_out_of_bounds() {
        let mut grid = HeightGrid::flat(4, 4).unwrap();
        let params = ErosionParams::at_position(3, 1.0, 4, 1);
        let result = simulate_erosion(&mut grid, &params, &mut ChaCha8Rng::seed_from_u64(0));

        assert!(matches!(result, Err(GridError::OutOfBounds { x: 4, y: 1, .. })));
        assert_eq!(grid, HeightGrid::flat(4, 4).unwrap());
    }

    #[test]
    fn test_random_erosion_is_reproducible() {
        let mut base = HeightGrid::flat(30, 30).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        terrain::add_mountains(&mut base, 4, &mut rng).unwrap();
        terrain::add_noise(&mut base, 0.5, &mut rng).unwrap();

        let params = ErosionParams {
            iterations: 200,
            move_amount: 0.1,
            fixed_position: None,
        };

        let mut a = base.clone();
        let mut b = base.clone();
        let stats_a = simulate_erosion(&mut a, &params, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let stats_b = simulate_erosion(&mut b, &params, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();

        assert_eq!(a, b);
        assert_eq!(stats_a.iterations, 200);
        assert_eq!(stats_a.sink_count + stats_a.edge_count, 200);
        assert_eq!(stats_a.sink_count, stats_b.sink_count);

        // Only runoff removes material
        let expected = -0.1 * stats_a.edge_count as f64;
        assert!((stats_a.net_mass_change() - expected).abs() < 1e-4);
        assert!((a.total_mass() - base.total_mass() - expected).abs() < 1e-2);
    }

    #[test]
    fn test_zero_iterations() {
        let mut grid = HeightGrid::flat(3, 3).unwrap();
        let params = ErosionParams::from_preset(ErosionPreset::None);
        let stats =
            simulate_erosion(&mut grid, &params, &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
        assert_eq!(stats.iterations, 0);
        assert!(stats.last_path.is_none());
    }
}
