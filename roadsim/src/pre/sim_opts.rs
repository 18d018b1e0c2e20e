use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    name = "roadsim",
    about = "A frame-discrete arcade road racer simulation"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug printing (only for headless mode)
    #[clap(short, long)]
    pub debug: bool,

    /// Play interactively in the terminal (arrow keys, b = handbrake)
    #[clap(long)]
    pub play: bool,

    /// Spectate a scripted run in real-time instead of running headless
    #[clap(long)]
    pub demo: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set race distance in km (overrides the parameter file)
    #[clap(long)]
    pub distance_km: Option<f64>,

    /// Set path to the game parameter file (OPTIONAL: defaults are used if not set)
    #[clap(short, long)]
    pub parfile_path: Option<PathBuf>,

    /// Set real-time factor (only relevant in demo mode)
    #[clap(short, long, default_value = "1.0")]
    pub realtime_factor: f64,

    /// Set frame cap for headless runs
    #[clap(long, default_value = "200000")]
    pub max_frames: u64,

    /// Set RNG seed for reproducible obstacle rolls
    #[clap(short, long)]
    pub seed: Option<u64>,
}
