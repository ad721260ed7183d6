//! Scene-side target marker handle and its pulse animation.

use glam::Vec3;

/// Opaque identifier of a marker created by the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// The parts of the render scene the mission layer touches.
pub trait SceneHandle {
    /// Place a marker at a world position.
    fn create_marker(&mut self, position: Vec3) -> MarkerId;
    /// Remove a marker and release its resources. Unknown ids are ignored.
    fn destroy_marker(&mut self, id: MarkerId);
    fn set_marker_opacity(&mut self, id: MarkerId, opacity: f32);
}

/// Marker opacity at `now_ms`: `0.3 + 0.5·sin(t·0.005)`, clamped to `[0, 1]`.
pub fn pulse_opacity(now_ms: f64) -> f32 {
    let t = if now_ms.is_finite() { now_ms } else { 0.0 };
    (0.3 + 0.5 * (t * 0.005).sin()).clamp(0.0, 1.0) as f32
}
