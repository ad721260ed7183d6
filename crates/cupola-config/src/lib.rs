//! Configuration for the cupola simulation.
//!
//! Settings persist to disk as a RON file, accept CLI overrides via clap,
//! support reload with change detection, and tolerate missing or unknown
//! fields so older files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    ArbiterConfig, CONFIG_FILE_NAME, Config, DebugConfig, InputConfig, LookConfig, MissionConfig,
    OrbitConfig, PhysicsConfig, TransitionConfig, TunnelConfig, default_config_dir,
};
pub use error::ConfigError;
