//! Zero-gravity movement inside the station tunnel: thrust from held
//! movement keys, drag, a speed cap, and elastic-ish wall bounces.
//!
//! Velocity is measured in world units per step and persists between
//! steps, so releasing every key leaves the camera drifting until drag
//! brings it to rest.

use cupola_math::{Orientation, TunnelBounds};
use glam::{BVec3, Vec3};

/// Which movement keys are held. Set on press, cleared on release.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MovementIntent {
    /// True when no movement key is held.
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Tuning for [`ZeroGravityBody`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZeroGravityParams {
    /// Thrust per held key, before time scaling.
    pub movement_speed: f32,
    /// Multiplier turning `dt` in seconds into the per-step acceleration
    /// scale.
    pub time_scale: f32,
    /// Per-step velocity retention factor (0..1).
    pub drag: f32,
    /// Upper bound on velocity magnitude.
    pub max_speed: f32,
    /// Fraction of velocity kept (and reversed) on a wall hit.
    pub bounce: f32,
}

impl Default for ZeroGravityParams {
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

/// Velocity integrator for the free-floating camera.
#[derive(Clone, Debug, Default)]
pub struct ZeroGravityBody {
    params: ZeroGravityParams,
    velocity: Vec3,
}

impl ZeroGravityBody {
    pub fn new(params: ZeroGravityParams) -> Self {
        Self {
            params,
            velocity: Vec3::ZERO,
        }
    }

    pub fn params(&self) -> &ZeroGravityParams {
        &self.params
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Zero the velocity. Called when physics loses or regains authority.
    pub fn reset(&mut self) {
        self.velocity = Vec3::ZERO;
    }

    /// Advance one step: accelerate from `intent` along the camera axes,
    /// apply drag and the speed cap, move `position`, then bounce off the
    /// tunnel walls.
    ///
    /// Returns the axes that hit a wall this step. A corner hit reports
    /// (and bounces) every offending axis.
    pub fn step(
        &mut self,
        position: &mut Vec3,
        orientation: &Orientation,
        intent: &MovementIntent,
        bounds: &TunnelBounds,
        dt: f32,
    ) -> BVec3 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if !self.velocity.is_finite() {
            self.velocity = Vec3::ZERO;
        }

        let forward = orientation.forward();
        let right = orientation.right();
        let factor = self.params.movement_speed * dt * self.params.time_scale;

        let mut accel = Vec3::ZERO;
        if intent.forward {
            accel += forward * factor;
        }
        if intent.backward {
            accel -= forward * factor;
        }
        if intent.right {
            accel += right * factor;
        }
        if intent.left {
            accel -= right * factor;
        }
        if intent.up {
            accel += Vec3::Y * factor;
        }
        if intent.down {
            accel -= Vec3::Y * factor;
        }
        if accel.is_finite() {
            self.velocity += accel;
        }

        self.velocity *= self.params.drag;
        self.velocity = self.velocity.clamp_length_max(self.params.max_speed);

        *position += self.velocity;
        self.resolve_walls(position, bounds)
    }

    fn resolve_walls(&mut self, position: &mut Vec3, bounds: &TunnelBounds) -> BVec3 {
        let mut hit = [false; 3];
        for (axis, hit) in hit.iter_mut().enumerate() {
            let (min, max) = (bounds.min[axis], bounds.max[axis]);
            if position[axis] < min || position[axis] > max {
                self.velocity[axis] *= -self.params.bounce;
                position[axis] = position[axis].clamp(min, max);
                *hit = true;
            }
        }
        BVec3::from(hit)
    }
}
