//! Command-line argument parsing for the cupola simulation.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Cupola simulation command-line arguments.
///
/// CLI values override settings loaded from `cupola.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "cupola", about = "Headless ISS cupola mission simulation")]
pub struct CliArgs {
    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Capture tolerance in degrees.
    #[arg(long)]
    pub tolerance: Option<f32>,

    /// RON mission catalog to load instead of the built-in one.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Mission id to fly.
    #[arg(long)]
    pub mission: Option<String>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    pub frames: u32,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(tolerance) = args.tolerance {
            self.mission.tolerance_deg = tolerance;
        }
        if let Some(ref path) = args.catalog {
            self.mission.catalog_path = Some(path.clone());
        }
    }
}
