//! Camera orientation as yaw/pitch/roll applied in Y-X-Z order.

use glam::{EulerRot, Quat, Vec3};
use std::f32::consts::{PI, TAU};

/// Camera orientation in radians.
///
/// Rotations compose as `Ry(yaw) * Rx(pitch) * Rz(roll)`: yaw about world
/// up first, then pitch about the yawed right axis, then roll about the
/// view axis. With all angles zero the camera looks down -Z with +Y up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl Orientation {
    pub const IDENTITY: Self = Self {
        yaw: 0.0,
        pitch: 0.0,
        roll: 0.0,
    };

    pub const fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Orientation (zero roll) whose forward axis points along `direction`.
    ///
    /// Returns `None` for a zero-length or non-finite direction.
    pub fn looking_along(direction: Vec3) -> Option<Self> {
        let dir = direction.try_normalize()?;
        let pitch = dir.y.clamp(-1.0, 1.0).asin();
        let yaw = (-dir.x).atan2(-dir.z);
        Some(Self::new(yaw, pitch, 0.0))
    }

    /// Orientation looking from `eye` toward `target`, or `None` if they
    /// coincide.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Option<Self> {
        Self::looking_along(target - eye)
    }

    /// Rotation quaternion for this orientation.
    pub fn to_quat(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, self.roll)
    }

    /// Unit view direction (-Z rotated).
    pub fn forward(&self) -> Vec3 {
        self.to_quat() * Vec3::NEG_Z
    }

    /// Unit right direction (+X rotated).
    pub fn right(&self) -> Vec3 {
        self.to_quat() * Vec3::X
    }

    /// Unit up direction (+Y rotated).
    pub fn up(&self) -> Vec3 {
        self.to_quat() * Vec3::Y
    }

    /// Interpolate each component independently. Yaw and roll follow the
    /// shortest arc so a transition never spins the long way round.
    pub fn lerp(&self, other: &Orientation, t: f32) -> Orientation {
        Orientation {
            yaw: self.yaw + wrap_angle(other.yaw - self.yaw) * t,
            pitch: self.pitch + (other.pitch - self.pitch) * t,
            roll: self.roll + wrap_angle(other.roll - self.roll) * t,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.yaw.is_finite() && self.pitch.is_finite() && self.roll.is_finite()
    }
}

/// Wrap an angle in radians into `[-PI, PI)`.
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}
