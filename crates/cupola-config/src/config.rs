//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name used inside the config directory.
pub const CONFIG_FILE_NAME: &str = "cupola.ron";

/// Per-user config directory (`<config_dir>/cupola`), falling back to the
/// working directory when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("cupola"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Zero-gravity movement tuning.
    pub physics: PhysicsConfig,
    /// Station tunnel geometry.
    pub tunnel: TunnelConfig,
    /// Planet placement and orbital camera tuning.
    pub orbit: OrbitConfig,
    /// Pointer look tuning.
    pub look: LookConfig,
    /// Navigation mode arbitration.
    pub arbiter: ArbiterConfig,
    /// Camera transition timing.
    pub transition: TransitionConfig,
    /// Mission targeting.
    pub mission: MissionConfig,
    /// Input settings.
    pub input: InputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Zero-gravity movement configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Thrust per held key before time scaling.
    pub movement_speed: f32,
    /// Scales frame time (seconds) into per-step acceleration.
    pub time_scale: f32,
    /// Velocity kept per step (0..1].
    pub drag: f32,
    /// Velocity magnitude cap, world units per step.
    pub max_speed: f32,
    /// Fraction of velocity kept and reversed on a wall hit.
    pub bounce: f32,
}

/// Tunnel interior volume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TunnelConfig {
    pub center: [f32; 3],
    /// Half size of the box along each axis.
    pub half_extents: [f32; 3],
    /// Where the camera starts and returns to on view toggle.
    pub home: [f32; 3],
}

/// Planet and orbital camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrbitConfig {
    pub body_center: [f32; 3],
    pub body_radius: f32,
    /// Fraction of the target gap closed per step.
    pub smoothing: f32,
    /// Degrees per left/right nudge.
    pub angle_step_deg: f32,
    pub height_step: f32,
    pub radius_step: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub max_height: f32,
    /// Orbit entered by the view toggle.
    pub initial_angle_deg: f32,
    pub initial_height: f32,
    pub initial_radius: f32,
    /// Constant target-angle drift in degrees per second (0 = off).
    /// Targets are fixed on the body, so any drift carries a framed target
    /// out of the tolerance cone while the user holds still; 1.15 matches a
    /// globe spinning at 0.02 rad/s.
    pub auto_orbit_deg_per_s: f32,
}

/// Pointer look configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LookConfig {
    /// Radians per pixel of drag.
    pub sensitivity: f32,
    /// Pitch limit in degrees either side of level.
    pub pitch_limit_deg: f32,
}

/// Mode arbitration configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Dead zone around the tunnel walls, world units.
    pub margin: f32,
    /// Minimum time between evaluations.
    pub interval_ms: f64,
}

/// Camera transition configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransitionConfig {
    pub duration_ms: f64,
}

/// Mission targeting configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MissionConfig {
    /// Accepted aim error in degrees.
    pub tolerance_deg: f32,
    /// Marker height above the surface.
    pub marker_altitude: f32,
    /// Camera distance above the surface when framing a target.
    pub framing_distance: f32,
    /// Delay between the shutter and the result.
    pub capture_delay_ms: f64,
    /// Optional RON mission catalog; the built-in list is used otherwise.
    pub catalog_path: Option<PathBuf>,
}

/// Input configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Keybinding overrides (action name -> key name).
    pub keybindings: HashMap<String, String>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            movement_speed: 0.015,
            time_scale: 50.0,
            drag: 0.985,
            max_speed: 0.3,
            bounce: 0.5,
        }
    }
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0, 0.0],
            half_extents: [4.0, 3.5, 9.0],
            home: [0.0, 0.0, 5.0],
        }
    }
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            body_center: [0.0, 0.0, -25.0],
            body_radius: 4.0,
            smoothing: 0.05,
            angle_step_deg: 5.0,
            height_step: 0.5,
            radius_step: 0.5,
            min_radius: 6.0,
            max_radius: 14.0,
            max_height: 10.0,
            initial_angle_deg: 90.0,
            initial_height: 0.0,
            initial_radius: 10.0,
            auto_orbit_deg_per_s: 0.0,
        }
    }
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.002,
            pitch_limit_deg: 90.0,
        }
    }
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            margin: 0.25,
            interval_ms: 100.0,
        }
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000.0,
        }
    }
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            tolerance_deg: 10.0,
            marker_altitude: 0.05,
            framing_distance: 6.0,
            capture_delay_ms: 100.0,
            catalog_path: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Validation ---

impl Config {
    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        let p = &self.physics;
        if !(p.drag > 0.0 && p.drag <= 1.0) {
            return Err(invalid("physics.drag", format!("{} is not in (0, 1]", p.drag)));
        }
        if !(p.max_speed > 0.0) {
            return Err(invalid("physics.max_speed", "must be positive"));
        }
        if !(0.0..=1.0).contains(&p.bounce) {
            return Err(invalid("physics.bounce", format!("{} is not in [0, 1]", p.bounce)));
        }
        if self.tunnel.half_extents.iter().any(|h| !(*h > 0.0)) {
            return Err(invalid("tunnel.half_extents", "every axis must be positive"));
        }

        let o = &self.orbit;
        if !(o.body_radius > 0.0) {
            return Err(invalid("orbit.body_radius", "must be positive"));
        }
        if !(o.min_radius > o.body_radius + self.mission.marker_altitude) {
            return Err(invalid(
                "orbit.min_radius",
                format!("{} must clear the planet surface", o.min_radius),
            ));
        }
        if !(o.max_radius >= o.min_radius) {
            return Err(invalid("orbit.max_radius", "must not be below min_radius"));
        }
        if !(o.smoothing > 0.0 && o.smoothing <= 1.0) {
            return Err(invalid("orbit.smoothing", format!("{} is not in (0, 1]", o.smoothing)));
        }

        let t = self.mission.tolerance_deg;
        if !(t > 0.0 && t <= 180.0) {
            return Err(invalid("mission.tolerance_deg", format!("{t} is not in (0, 180]")));
        }
        if !(self.transition.duration_ms >= 0.0) {
            return Err(invalid("transition.duration_ms", "must not be negative"));
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let config = read_config(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `cupola.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
        log::debug!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Re-read the file; `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = read_config(&config_dir.join(CONFIG_FILE_NAME))?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
