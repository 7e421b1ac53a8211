use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use terrain_generator::config::{GeneratorConfig, TiltConfig};
use terrain_generator::erosion::{ErosionParams, ErosionPreset};
use terrain_generator::persistence;
use terrain_generator::seeds::WorldSeeds;
use terrain_generator::world;

#[derive(Parser, Debug)]
#[command(name = "terrain_generator")]
#[command(about = "Generate a terrain heightmap with mountains and droplet erosion")]
struct Args {
    /// JSON configuration file (flags below override its values)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Width of the grid in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the grid in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Elevation added per cell along x
    #[arg(long, allow_hyphen_values = true)]
    tilt_x: Option<f32>,

    /// Elevation added per cell along y
    #[arg(long, allow_hyphen_values = true)]
    tilt_y: Option<f32>,

    /// Number of mountain peaks
    #[arg(short, long)]
    mountains: Option<usize>,

    /// Standard deviation of per-cell noise (0 disables it, bare flag uses 30)
    #[arg(short, long, num_args = 0..=1, default_missing_value = "30")]
    noise: Option<f32>,

    /// Erosion preset (overridden by --iterations / --move-amount)
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,

    /// Number of erosion droplets
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Material moved per droplet
    #[arg(long)]
    move_amount: Option<f32>,

    /// Start every droplet at this cell, as "x,y"
    #[arg(long, value_parser = parse_position)]
    erode_at: Option<(usize, usize)>,

    /// Save the final heightmap as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export the normalized view and last droplet path as JSON
    #[arg(long)]
    render_data: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetArg {
    None,
    Light,
    Normal,
    Heavy,
}

impl From<PresetArg> for ErosionPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::None => ErosionPreset::None,
            PresetArg::Light => ErosionPreset::Light,
            PresetArg::Normal => ErosionPreset::Normal,
            PresetArg::Heavy => ErosionPreset::Heavy,
        }
    }
}

fn parse_position(s: &str) -> Result<(usize, usize), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got \"{}\"", s))?;
    let x: usize = x.trim().parse().map_err(|e| format!("bad x coordinate: {}", e))?;
    let y: usize = y.trim().parse().map_err(|e| format!("bad y coordinate: {}", e))?;
    Ok((x, y))
}

impl Args {
    /// Config file (or defaults) with command-line overrides applied.
    fn to_config(&self) -> anyhow::Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        if let Some(width) = self.width { config.width = width; }
        if let Some(height) = self.height { config.height = height; }

        let tilt = config.tilt;
        config.tilt = TiltConfig {
            x_slope: self.tilt_x.unwrap_or(tilt.x_slope),
            y_slope: self.tilt_y.unwrap_or(tilt.y_slope),
        };

        if let Some(mountains) = self.mountains { config.mountains = mountains; }
        if let Some(noise) = self.noise {
            config.noise_scale = if noise == 0.0 { None } else { Some(noise) };
        }

        if let Some(preset) = self.preset.map(ErosionPreset::from) {
            tracing::info!("Erosion preset: {} ({})", preset, preset.description());
            let fixed_position = config.erosion.fixed_position;
            config.erosion = ErosionParams {
                fixed_position,
                ..ErosionParams::from_preset(preset)
            };
        }
        if let Some(iterations) = self.iterations { config.erosion.iterations = iterations; }
        if let Some(amount) = self.move_amount { config.erosion.move_amount = amount; }
        if self.erode_at.is_some() { config.erosion.fixed_position = self.erode_at; }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.to_config()?;

    if args.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let seeds = WorldSeeds::from_master(args.seed.unwrap_or_else(rand::random));
    tracing::info!("Generating terrain with seed: {}", seeds.master);
    tracing::info!("Grid size: {}x{}", config.width, config.height);

    let world = world::generate_world(config, seeds)?;

    let stats = &world.erosion_stats;
    let (min_h, max_h) = world.heightmap.elevation_range();
    tracing::info!("Erosion complete:");
    tracing::info!(
        "  Droplets: {} ({} sinks, {} ran off the edge)",
        stats.iterations,
        stats.sink_count,
        stats.edge_count
    );
    tracing::info!("  Total eroded: {:.3}", stats.total_eroded);
    tracing::info!("  Total deposited: {:.3}", stats.total_deposited);
    tracing::info!("  Longest path: {} moves", stats.longest_path);
    tracing::info!("Final heightmap range: {:.2} to {:.2}", min_h, max_h);

    if let Some(path) = &args.output {
        persistence::save_heightmap(&world.heightmap, path)
            .with_context(|| format!("saving heightmap to {}", path.display()))?;
        tracing::info!("Saved heightmap: {}", path.display());
    }

    if let Some(path) = &args.render_data {
        persistence::export_render_data(&world.heightmap, stats.last_path.as_ref(), path)
            .with_context(|| format!("exporting render data to {}", path.display()))?;
        tracing::info!("Saved render data: {}", path.display());
    }

    Ok(())
}
