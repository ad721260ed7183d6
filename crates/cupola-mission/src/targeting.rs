//! Placing the mission target on the planet and testing whether the camera
//! is aimed at it.

use cupola_camera::CameraPose;
use cupola_math::GeoPoint;
use glam::Vec3;

use crate::marker::MarkerId;

/// Geometry used to place targets and judge captures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetSettings {
    pub body_center: Vec3,
    pub body_radius: f32,
    /// Height of the marker above the surface so it is not buried.
    pub marker_altitude: f32,
    /// Largest accepted angle between the view axis and the target, in
    /// degrees.
    pub tolerance_deg: f32,
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            body_center: Vec3::new(0.0, 0.0, -25.0),
            body_radius: 4.0,
            marker_altitude: 0.05,
            tolerance_deg: 10.0,
        }
    }
}

impl TargetSettings {
    /// Distance of the marker from the body center.
    pub fn marker_radius(&self) -> f32 {
        self.body_radius + self.marker_altitude
    }

    /// World position of the marker for `geo`.
    pub fn marker_position(&self, geo: &GeoPoint) -> Vec3 {
        self.body_center + geo.to_cartesian(self.marker_radius())
    }
}

/// The live target of the active mission.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MissionTarget {
    pub geo: GeoPoint,
    /// Distance from the body center.
    pub radius: f32,
    pub position: Vec3,
    pub marker: MarkerId,
}

/// Angle in radians between the view axis and the direction from the
/// camera to `target`. `None` when either vector is degenerate.
pub fn angular_error(camera: &CameraPose, target: Vec3) -> Option<f32> {
    let forward = camera.forward().try_normalize()?;
    let to_target = (target - camera.position).try_normalize()?;
    Some(forward.dot(to_target).clamp(-1.0, 1.0).acos())
}

/// Whether `camera` is aimed at `target` within `tolerance_deg`.
/// Degenerate geometry never hits.
pub fn hit_test(camera: &CameraPose, target: Vec3, tolerance_deg: f32) -> bool {
    if !tolerance_deg.is_finite() {
        return false;
    }
    angular_error(camera, target).is_some_and(|err| err <= tolerance_deg.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cupola_math::Orientation;

    /// Camera on the +Z side of the body looking at its center.
    fn facing_center(yaw_offset_deg: f32) -> CameraPose {
        let mut pose = CameraPose::looking_at(Vec3::new(0.0, 0.0, -15.0), Vec3::new(0.0, 0.0, -25.0));
        pose.orientation.yaw += yaw_offset_deg.to_radians();
        pose
    }

    #[test]
    fn test_center_target_hits() {
        let target = Vec3::new(0.0, 0.0, -25.0 + 4.05);
        assert!(hit_test(&facing_center(0.0), target, 10.0));
    }

    #[test]
    fn test_forty_five_degrees_off_misses() {
        let target = Vec3::new(0.0, 0.0, -25.0 + 4.05);
        assert!(!hit_test(&facing_center(45.0), target, 10.0));
    }

    #[test]
    fn test_tolerance_boundary() {
        let target = Vec3::new(0.0, 0.0, -25.0 + 4.05);
        assert!(hit_test(&facing_center(9.0), target, 10.0));
        assert!(!hit_test(&facing_center(11.0), target, 10.0));
        let err = angular_error(&facing_center(9.0), target).unwrap();
        assert!((err.to_degrees() - 9.0).abs() < 1e-3);
    }

    #[test]
    fn test_body_center_camera_hits_equator_target_and_misses_at_ninety() {
        let target = GeoPoint::new(0.0, 0.0).to_cartesian(4.0);
        let orientation = Orientation::looking_along(target).unwrap();
        let mut pose = CameraPose::new(Vec3::ZERO, orientation);
        assert!(hit_test(&pose, target, 10.0));

        pose.orientation.yaw += std::f32::consts::FRAC_PI_2;
        assert!(!hit_test(&pose, target, 10.0));
        let err = angular_error(&pose, target).unwrap();
        assert!((err.to_degrees() - 90.0).abs() < 1e-3, "{err}");
    }

    #[test]
    fn test_degenerate_geometry_never_hits() {
        let pose = CameraPose::new(Vec3::ONE, Orientation::IDENTITY);
        assert!(!hit_test(&pose, Vec3::ONE, 180.0));
        let nan = CameraPose::new(Vec3::ZERO, Orientation::new(f32::NAN, 0.0, 0.0));
        assert!(!hit_test(&nan, Vec3::NEG_Z, 180.0));
        assert!(!hit_test(&facing_center(0.0), Vec3::new(0.0, 0.0, -21.0), f32::NAN));
    }

    #[test]
    fn test_marker_position_on_offset_sphere() {
        let s = TargetSettings::default();
        let p = s.marker_position(&GeoPoint::new(0.0, 0.0));
        assert!((p - Vec3::new(4.05, 0.0, -25.0)).length() < 1e-5);
        let ny = s.marker_position(&GeoPoint::new(40.7, -74.0));
        assert!(((ny - s.body_center).length() - 4.05).abs() < 1e-4);
    }
}
