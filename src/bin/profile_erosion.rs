//! Profiling tool to identify performance bottlenecks

use std::time::Instant;

use tracing_subscriber::EnvFilter;

use terrain_generator::{
    config::GeneratorConfig,
    erosion::{self, ErosionParams},
    seeds::WorldSeeds,
    world,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let seeds = WorldSeeds::from_master(1337);
    let config = GeneratorConfig {
        width: 512,
        height: 256,
        erosion: ErosionParams {
            iterations: 2_000,
            ..Default::default()
        },
        ..Default::default()
    };

    println!("=== Performance Profiling ===");
    println!(
        "Grid size: {}x{} ({} cells)",
        config.width,
        config.height,
        config.width * config.height
    );
    println!();

    // Terrain synthesis (tilt + mountains + noise)
    let start = Instant::now();
    let (mut heightmap, mountains) = world::generate_terrain(&config, &seeds)?;
    let terrain_time = start.elapsed();
    println!("Terrain synthesis: {:?} ({} mountains)", terrain_time, mountains.len());

    // Single trace, no snapshot
    let start = Instant::now();
    let (outcome, path) = erosion::trace_flow(&heightmap, config.width / 2, config.height / 2)?;
    let trace_time = start.elapsed();
    println!(
        "Single trace from centre: {:?} ({:?} after {} moves)",
        trace_time,
        outcome,
        path.moves()
    );

    println!("\nErosion parameters:");
    println!("  Iterations: {}", config.erosion.iterations);
    println!("  Move amount: {}", config.erosion.move_amount);
    println!();

    let start = Instant::now();
    let stats =
        erosion::simulate_erosion(&mut heightmap, &config.erosion, &mut seeds.erosion_rng())?;
    let erosion_time = start.elapsed();
    println!("Total erosion simulation: {:?}", erosion_time);
    println!("  Per droplet: {:?}", erosion_time / stats.iterations.max(1) as u32);
    println!("  Sinks: {}  Edge runoff: {}", stats.sink_count, stats.edge_count);
    println!("  Moves: {}  Longest path: {}", stats.steps_taken, stats.longest_path);

    let total = terrain_time + erosion_time;
    println!("\n=== Summary ===");
    let share = |part: std::time::Duration| 100.0 * part.as_secs_f64() / total.as_secs_f64();
    println!("Terrain:          {:>8.2}% ({:?})", share(terrain_time), terrain_time);
    println!("Erosion:          {:>8.2}% ({:?})", share(erosion_time), erosion_time);
    println!("─────────────────────────────────");
    println!("TOTAL:            {:>8}  {:?}", "100%", total);

    Ok(())
}
