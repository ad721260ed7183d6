use cupola_math::Orientation;
use glam::Vec3;

/// Position plus Y-X-Z orientation of the simulated camera.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub orientation: Orientation,
}

impl CameraPose {
    pub const fn new(position: Vec3, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose at `position` looking toward `target`. Falls back to the
    /// identity orientation when the two points coincide.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let orientation = Orientation::looking_at(position, target).unwrap_or_default();
        Self::new(position, orientation)
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        self.orientation.forward()
    }

    /// Position lerp plus per-component orientation lerp.
    pub fn lerp(&self, other: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: self.position.lerp(other.position, t),
            orientation: self.orientation.lerp(&other.orientation, t),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.orientation.is_finite()
    }

    /// Copy this pose into a render camera.
    pub fn apply_to(&self, camera: &mut dyn CameraHandle) {
        camera.set_position(self.position);
        camera.set_orientation(self.orientation);
    }
}

/// Render-side camera the simulation writes its pose into once per frame.
pub trait CameraHandle {
    fn set_position(&mut self, position: Vec3);
    fn set_orientation(&mut self, orientation: Orientation);
}
