//! Orbital camera: a parametrized circular path around the planet with
//! smoothed targets.
//!
//! The camera sits at `center + (cos(angle)·radius, height, sin(angle)·radius)`
//! and always looks at the body center. Key presses and wheel ticks move
//! the *target* parameters; each step the current parameters close a fixed
//! fraction of the gap, which gives the eased feel of the orbit.

use cupola_math::GeoPoint;
use glam::Vec3;

use crate::pose::CameraPose;

/// Angle (radians), height and horizontal radius of the orbit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrbitalParameters {
    pub angle: f32,
    pub height: f32,
    pub radius: f32,
}

impl OrbitalParameters {
    pub const fn new(angle: f32, height: f32, radius: f32) -> Self {
        Self {
            angle,
            height,
            radius,
        }
    }

    /// Offset of the camera from the body center.
    pub fn offset(&self) -> Vec3 {
        Vec3::new(
            self.angle.cos() * self.radius,
            self.height,
            self.angle.sin() * self.radius,
        )
    }

    /// Parameters that reproduce `offset` exactly (before radius clamping).
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = Vec3::new(offset.x, 0.0, offset.z).length();
        let angle = if radius > 1e-6 {
            offset.z.atan2(offset.x)
        } else {
            0.0
        };
        Self::new(angle, offset.y, radius)
    }
}

/// Tuning for [`OrbitalController`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitSettings {
    pub body_center: Vec3,
    /// Fraction of the target gap closed per step (0..1].
    pub smoothing: f32,
    /// Radians per left/right nudge.
    pub angle_step: f32,
    /// World units per raise/lower nudge.
    pub height_step: f32,
    /// World units per zoom nudge.
    pub radius_step: f32,
    /// Closest allowed horizontal radius; keeps the camera outside the body.
    pub min_radius: f32,
    pub max_radius: f32,
    /// Height is clamped to `[-max_height, max_height]`.
    pub max_height: f32,
    /// Constant drift of the target angle in radians per second.
    pub auto_orbit_rate: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            body_center: Vec3::new(0.0, 0.0, -25.0),
            smoothing: 0.05,
            angle_step: 5.0_f32.to_radians(),
            height_step: 0.5,
            radius_step: 0.5,
            min_radius: 6.0,
            max_radius: 14.0,
            max_height: 10.0,
            auto_orbit_rate: 0.0,
        }
    }
}

/// Discrete orbit adjustments, one per key press or wheel tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrbitNudge {
    AngleLeft,
    AngleRight,
    Raise,
    Lower,
    ZoomIn,
    ZoomOut,
}

/// Circular-orbit camera controller.
#[derive(Clone, Debug)]
pub struct OrbitalController {
    settings: OrbitSettings,
    current: OrbitalParameters,
    target: OrbitalParameters,
}

impl OrbitalController {
    /// Create a controller resting at `initial` (clamped into range).
    pub fn new(settings: OrbitSettings, initial: OrbitalParameters) -> Self {
        let mut controller = Self {
            settings,
            current: initial,
            target: initial,
        };
        controller.current = controller.clamped(initial);
        controller.target = controller.current;
        controller
    }

    pub fn settings(&self) -> &OrbitSettings {
        &self.settings
    }

    pub fn current(&self) -> OrbitalParameters {
        self.current
    }

    pub fn target(&self) -> OrbitalParameters {
        self.target
    }

    /// Apply one nudge to the target parameters.
    pub fn nudge(&mut self, nudge: OrbitNudge) {
        let s = self.settings;
        let mut t = self.target;
        match nudge {
            OrbitNudge::AngleLeft => t.angle -= s.angle_step,
            OrbitNudge::AngleRight => t.angle += s.angle_step,
            OrbitNudge::Raise => t.height += s.height_step,
            OrbitNudge::Lower => t.height -= s.height_step,
            OrbitNudge::ZoomIn => t.radius -= s.radius_step,
            OrbitNudge::ZoomOut => t.radius += s.radius_step,
        }
        self.target = self.clamped(t);
    }

    /// Zoom by a wheel delta. Positive moves away from the body.
    pub fn zoom(&mut self, wheel: f32) {
        if !wheel.is_finite() || wheel == 0.0 {
            return;
        }
        let mut t = self.target;
        t.radius += wheel * self.settings.radius_step;
        self.target = self.clamped(t);
    }

    /// Replace the target parameters (clamped).
    pub fn set_target(&mut self, target: OrbitalParameters) {
        self.target = self.clamped(target);
    }

    /// Snap current and target to the parameters nearest `position`.
    /// Used when the orbit takes over from another controller so the
    /// camera does not jump.
    pub fn sync_to_position(&mut self, position: Vec3) {
        let params = self.clamped(OrbitalParameters::from_offset(
            position - self.settings.body_center,
        ));
        self.current = params;
        self.target = params;
    }

    /// Advance smoothing by one step and return the resulting pose.
    pub fn step(&mut self, dt: f32) -> CameraPose {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if self.settings.auto_orbit_rate != 0.0 {
            self.target.angle += self.settings.auto_orbit_rate * dt;
        }

        let k = self.settings.smoothing.clamp(0.0, 1.0);
        self.current.angle += (self.target.angle - self.current.angle) * k;
        self.current.height += (self.target.height - self.current.height) * k;
        self.current.radius += (self.target.radius - self.current.radius) * k;
        self.current = self.clamped(self.current);

        self.pose()
    }

    /// Pose for the current parameters, facing the body center.
    pub fn pose(&self) -> CameraPose {
        self.pose_for(&self.current)
    }

    /// Pose for arbitrary parameters, facing the body center.
    pub fn pose_for(&self, params: &OrbitalParameters) -> CameraPose {
        let position = self.settings.body_center + params.offset();
        CameraPose::looking_at(position, self.settings.body_center)
    }

    /// Parameters placing the camera on the radial line above `point`,
    /// `distance` beyond the surface of a body of `body_radius`.
    ///
    /// At high latitudes the horizontal radius may fall below the safe
    /// minimum; it is clamped, which tilts the framing off the radial line.
    pub fn framing_params(
        &self,
        point: &GeoPoint,
        body_radius: f32,
        distance: f32,
    ) -> OrbitalParameters {
        let offset = point.to_cartesian(body_radius + distance);
        self.clamped(OrbitalParameters::from_offset(offset))
    }

    fn clamped(&self, mut p: OrbitalParameters) -> OrbitalParameters {
        let s = &self.settings;
        if !p.angle.is_finite() {
            p.angle = self.current.angle;
        }
        p.height = if p.height.is_finite() {
            p.height.clamp(-s.max_height, s.max_height)
        } else {
            0.0
        };
        p.radius = if p.radius.is_finite() {
            p.radius.clamp(s.min_radius, s.max_radius)
        } else {
            s.min_radius
        };
        p
    }
}
