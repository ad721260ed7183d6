//! Keyboard state tracker.
//!
//! [`KeyboardState`] tracks which physical keys are held and reports press
//! and release edges as events arrive.

use std::collections::HashSet;
use winit::keyboard::KeyCode;

use crate::event::InputEvent;

/// Held-key set keyed by physical key code.
///
/// Forward every [`InputEvent`] to [`process_event`](Self::process_event);
/// its return value says whether the event was an edge. Held state is
/// queried with [`is_pressed`](Self::is_pressed).
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<KeyCode>,
}

impl KeyboardState {
    /// Creates a new `KeyboardState` with no keys pressed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes an input event, updating internal state.
    ///
    /// Returns `true` when the event was a key *edge*: a press of a key
    /// that was not held, or a release of a key that was. Auto-repeat
    /// presses of a held key are ignored and return `false`. Non-key
    /// events are ignored.
    pub fn process_event(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::KeyDown(code) => self.pressed.insert(code),
            InputEvent::KeyUp(code) => self.pressed.remove(&code),
            _ => false,
        }
    }

    /// Returns `true` while the key is held down.
    #[must_use]
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Release every held key, e.g. when the view loses focus or unmounts.
    pub fn release_all(&mut self) {
        self.pressed.clear();
    }
}
