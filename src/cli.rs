//! Command-line argument parsing.

use clap::Parser;
use glam::Vec2;

use wavecrest::params::SimulationConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Wavecrest")]
#[command(about = "Spectral FFT ocean surface simulator", long_about = None)]
pub struct Args {
    /// Simulation grid resolution (power of two)
    #[arg(long, value_name = "CELLS", default_value = "256")]
    pub resolution: usize,

    /// World-space size of the ocean patch (meters)
    #[arg(long, value_name = "METERS", default_value = "150")]
    pub ocean_size: f32,

    /// Wind vector x component (m/s)
    #[arg(long, value_name = "MPS", default_value = "60")]
    pub wind_x: f32,

    /// Wind vector y component (m/s)
    #[arg(long, value_name = "MPS", default_value = "30")]
    pub wind_y: f32,

    /// Horizontal displacement scale (sharper crests)
    #[arg(long, default_value = "1.5")]
    pub choppiness: f32,

    /// Seed for the initial random phases
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Number of simulation ticks to run
    #[arg(long, value_name = "COUNT", default_value = "120")]
    pub ticks: u32,

    /// Fixed timestep per tick (seconds)
    #[arg(long, value_name = "SECONDS", default_value = "0.016")]
    pub dt: f32,

    /// Directory for height/normal PNG snapshots (skipped when absent)
    #[arg(long, value_name = "DIR")]
    pub snapshot_dir: Option<String>,
}

impl Args {
    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            resolution: self.resolution,
            ocean_size_m: self.ocean_size,
            wind: Vec2::new(self.wind_x, self.wind_y),
            choppiness: self.choppiness,
            phase_seed: self.seed,
        }
    }
}
