//! Pointer-drag look: horizontal drag turns, vertical drag tilts.

use cupola_input::PointerState;
use cupola_math::Orientation;
use std::f32::consts::FRAC_PI_2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LookSettings {
    /// Radians per pixel of drag.
    pub sensitivity: f32,
    /// Pitch is clamped to `[-pitch_limit, pitch_limit]` radians.
    pub pitch_limit: f32,
}

impl Default for LookSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.002,
            pitch_limit: FRAC_PI_2,
        }
    }
}

/// Applies pointer drags to a camera orientation.
///
/// Dragging right turns the view right (yaw decreases) and dragging down
/// tilts it down. Roll is left untouched.
#[derive(Clone, Debug, Default)]
pub struct LookController {
    settings: LookSettings,
}

impl LookController {
    pub fn new(settings: LookSettings) -> Self {
        Self { settings }
    }

    /// Apply the drag accumulated in `pointer` this frame. Returns `true`
    /// if the orientation changed.
    pub fn apply(&self, pointer: &PointerState, orientation: &mut Orientation) -> bool {
        let delta = pointer.delta();
        self.apply_delta(delta.x, delta.y, orientation)
    }

    /// Apply a raw drag delta in pixels.
    pub fn apply_delta(&self, dx: f32, dy: f32, orientation: &mut Orientation) -> bool {
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        let limit = self.settings.pitch_limit.abs();
        orientation.yaw -= dx * self.settings.sensitivity;
        orientation.pitch =
            (orientation.pitch - dy * self.settings.sensitivity).clamp(-limit, limit);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cupola_input::InputEvent;

    #[test]
    fn test_drag_right_turns_right() {
        let look = LookController::default();
        let mut o = Orientation::IDENTITY;
        assert!(look.apply_delta(100.0, 0.0, &mut o));
        assert!((o.yaw + 0.2).abs() < 1e-6);
        // Turning right from -Z swings the view toward +X.
        assert!(o.forward().x > 0.0);
    }

    #[test]
    fn test_drag_down_tilts_down() {
        let look = LookController::default();
        let mut o = Orientation::IDENTITY;
        look.apply_delta(0.0, 50.0, &mut o);
        assert!(o.pitch < 0.0);
        assert!(o.forward().y < 0.0);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let look = LookController::default();
        let mut o = Orientation::IDENTITY;
        look.apply_delta(0.0, -100_000.0, &mut o);
        assert!((o.pitch - FRAC_PI_2).abs() < 1e-6);
        look.apply_delta(0.0, 100_000.0, &mut o);
        assert!((o.pitch + FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_roll_is_preserved() {
        let look = LookController::default();
        let mut o = Orientation::new(0.0, 0.0, 0.3);
        look.apply_delta(10.0, 10.0, &mut o);
        assert_eq!(o.roll, 0.3);
    }

    #[test]
    fn test_pointer_without_drag_does_nothing() {
        let look = LookController::default();
        let mut pointer = PointerState::new();
        pointer.process_event(&InputEvent::PointerMove { dx: 40.0, dy: 0.0 });
        let mut o = Orientation::IDENTITY;
        assert!(!look.apply(&pointer, &mut o));
        assert_eq!(o, Orientation::IDENTITY);
    }

    #[test]
    fn test_pointer_drag_applies() {
        let look = LookController::default();
        let mut pointer = PointerState::new();
        pointer.process_event(&InputEvent::PointerDown { x: 0.0, y: 0.0 });
        pointer.process_event(&InputEvent::PointerMove { dx: 40.0, dy: 0.0 });
        let mut o = Orientation::IDENTITY;
        assert!(look.apply(&pointer, &mut o));
        assert!((o.yaw + 0.08).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_delta_ignored() {
        let look = LookController::default();
        let mut o = Orientation::IDENTITY;
        assert!(!look.apply_delta(f32::NAN, 1.0, &mut o));
        assert_eq!(o, Orientation::IDENTITY);
    }
}
