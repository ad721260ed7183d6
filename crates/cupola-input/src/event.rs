use winit::keyboard::KeyCode;

/// Platform-neutral input event delivered to the simulation.
///
/// Key codes are physical (layout independent) so WASD movement works on
/// any keyboard layout. Browser `KeyboardEvent.code` strings use the same
/// names as [`KeyCode`] variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A key transitioned to pressed. Auto-repeat presses may arrive again
    /// while the key is held.
    KeyDown(KeyCode),
    /// A key transitioned to released.
    KeyUp(KeyCode),
    /// Primary pointer pressed at window coordinates.
    PointerDown { x: f32, y: f32 },
    /// Pointer moved by a delta in pixels.
    PointerMove { dx: f32, dy: f32 },
    /// Primary pointer released.
    PointerUp,
    /// Wheel scrolled. Positive values move away from the viewed body.
    Wheel(f32),
}
