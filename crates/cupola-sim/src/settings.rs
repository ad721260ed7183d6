//! Conversion from the user-facing [`Config`] into controller settings.

use cupola_camera::{
    ArbiterSettings, LookSettings, OrbitSettings, OrbitalParameters, ZeroGravityParams,
};
use cupola_config::Config;
use cupola_math::TunnelBounds;
use cupola_mission::TargetSettings;
use glam::Vec3;

/// Everything the simulation needs from the config, in controller units
/// (radians, world units, milliseconds).
#[derive(Clone, Debug, PartialEq)]
pub struct SimSettings {
    pub physics: ZeroGravityParams,
    pub bounds: TunnelBounds,
    /// Pose the view toggle returns to inside the tunnel.
    pub home: Vec3,
    pub orbit: OrbitSettings,
    /// Orbit parameters used for the wide view.
    pub orbit_initial: OrbitalParameters,
    pub look: LookSettings,
    pub arbiter: ArbiterSettings,
    pub transition_ms: f64,
    pub target: TargetSettings,
    pub capture_delay_ms: f64,
    /// Distance above the surface when framing a mission target.
    pub framing_distance: f32,
}

impl SimSettings {
    pub fn from_config(config: &Config) -> Self {
        let body_center = Vec3::from(config.orbit.body_center);
        let o = &config.orbit;
        Self {
            physics: ZeroGravityParams {
                movement_speed: config.physics.movement_speed,
                time_scale: config.physics.time_scale,
                drag: config.physics.drag,
                max_speed: config.physics.max_speed,
                bounce: config.physics.bounce,
            },
            bounds: TunnelBounds::from_center_half_extents(
                Vec3::from(config.tunnel.center),
                Vec3::from(config.tunnel.half_extents),
            ),
            home: Vec3::from(config.tunnel.home),
            orbit: OrbitSettings {
                body_center,
                smoothing: o.smoothing,
                angle_step: o.angle_step_deg.to_radians(),
                height_step: o.height_step,
                radius_step: o.radius_step,
                min_radius: o.min_radius,
                max_radius: o.max_radius,
                max_height: o.max_height,
                auto_orbit_rate: o.auto_orbit_deg_per_s.to_radians(),
            },
            orbit_initial: OrbitalParameters::new(
                o.initial_angle_deg.to_radians(),
                o.initial_height,
                o.initial_radius,
            ),
            look: LookSettings {
                sensitivity: config.look.sensitivity,
                pitch_limit: config.look.pitch_limit_deg.to_radians(),
            },
            arbiter: ArbiterSettings {
                margin: config.arbiter.margin,
                interval_ms: config.arbiter.interval_ms,
            },
            transition_ms: config.transition.duration_ms,
            target: TargetSettings {
                body_center,
                body_radius: o.body_radius,
                marker_altitude: config.mission.marker_altitude,
                tolerance_deg: config.mission.tolerance_deg,
            },
            capture_delay_ms: config.mission.capture_delay_ms,
            framing_distance: config.mission.framing_distance,
        }
    }
}

impl Default for SimSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
