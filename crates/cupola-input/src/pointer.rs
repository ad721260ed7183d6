//! Frame-coherent pointer state tracker.
//!
//! [`PointerState`] accumulates pointer drags during a frame for the look
//! controller.

use glam::Vec2;

use crate::event::InputEvent;

/// Frame-coherent pointer state.
///
/// Movement only accumulates into [`delta`](Self::delta) while a drag is
/// active (between pointer-down and pointer-up).
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    delta: Vec2,
    dragging: bool,
}

impl PointerState {
    /// Creates a new `PointerState` with all fields zeroed/false.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes an input event. Key and wheel events are ignored.
    pub fn process_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { .. } => {
                self.dragging = true;
            }
            InputEvent::PointerMove { dx, dy } => {
                let d = Vec2::new(dx, dy);
                if !d.is_finite() {
                    return;
                }
                if self.dragging {
                    self.delta += d;
                }
            }
            InputEvent::PointerUp => {
                self.dragging = false;
            }
            InputEvent::Wheel(_) | InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => {}
        }
    }

    /// Clears the drag delta. Call at end of frame.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
    }

    /// End any drag in progress, e.g. when the view unmounts.
    pub fn cancel_drag(&mut self) {
        self.dragging = false;
        self.delta = Vec2::ZERO;
    }

    /// Drag movement accumulated since the last frame clear.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Whether the pointer is held down.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_without_drag_has_no_delta() {
        let mut ps = PointerState::new();
        ps.process_event(&InputEvent::PointerMove { dx: 10.0, dy: 5.0 });
        assert_eq!(ps.delta(), Vec2::ZERO);
    }

    #[test]
    fn test_drag_accumulates_delta() {
        let mut ps = PointerState::new();
        ps.process_event(&InputEvent::PointerDown { x: 100.0, y: 100.0 });
        ps.process_event(&InputEvent::PointerMove { dx: 10.0, dy: -5.0 });
        ps.process_event(&InputEvent::PointerMove { dx: 2.0, dy: 1.0 });
        assert!(ps.is_dragging());
        assert_eq!(ps.delta(), Vec2::new(12.0, -4.0));
    }

    #[test]
    fn test_pointer_up_ends_drag() {
        let mut ps = PointerState::new();
        ps.process_event(&InputEvent::PointerDown { x: 0.0, y: 0.0 });
        ps.process_event(&InputEvent::PointerUp);
        ps.process_event(&InputEvent::PointerMove { dx: 10.0, dy: 0.0 });
        assert!(!ps.is_dragging());
        assert_eq!(ps.delta(), Vec2::ZERO);
    }

    #[test]
    fn test_clear_transients_keeps_drag() {
        let mut ps = PointerState::new();
        ps.process_event(&InputEvent::PointerDown { x: 0.0, y: 0.0 });
        ps.process_event(&InputEvent::PointerMove { dx: 3.0, dy: 1.0 });
        ps.clear_transients();
        assert_eq!(ps.delta(), Vec2::ZERO);
        assert!(ps.is_dragging());
    }

    #[test]
    fn test_non_finite_input_ignored() {
        let mut ps = PointerState::new();
        ps.process_event(&InputEvent::PointerDown { x: 0.0, y: 0.0 });
        ps.process_event(&InputEvent::PointerMove {
            dx: f32::NAN,
            dy: 1.0,
        });
        assert_eq!(ps.delta(), Vec2::ZERO);
    }

    #[test]
    fn test_cancel_drag() {
        let mut ps = PointerState::new();
        ps.process_event(&InputEvent::PointerDown { x: 0.0, y: 0.0 });
        ps.process_event(&InputEvent::PointerMove { dx: 5.0, dy: 0.0 });
        ps.cancel_drag();
        assert!(!ps.is_dragging());
        assert_eq!(ps.delta(), Vec2::ZERO);
    }
}
