//! Action mapping: maps abstract simulation actions to physical inputs.
//!
//! [`InputMap`] defines which keys (and wheel directions) trigger which
//! [`Action`]s. It serializes to RON and accepts per-action overrides from
//! the configuration file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;
use winit::keyboard::KeyCode;

/// Serde helper module for [`KeyCode`] which doesn't implement serde natively.
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use winit::keyboard::KeyCode;

    /// Serialize a [`KeyCode`] as its debug string (e.g., `"KeyW"`).
    pub fn serialize<S: Serializer>(code: &KeyCode, s: S) -> Result<S::Ok, S::Error> {
        format!("{code:?}").serialize(s)
    }

    /// Deserialize a [`KeyCode`] from its debug string.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(d)?;
        super::parse_key_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
    }
}

/// Parse a physical key name (`"KeyW"`, `"ArrowUp"`, `"Space"`, ...) into a
/// [`KeyCode`]. Names match browser `KeyboardEvent.code` values.
#[must_use]
pub fn parse_key_name(s: &str) -> Option<KeyCode> {
    Some(match s {
        "KeyA" => KeyCode::KeyA,
        "KeyB" => KeyCode::KeyB,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG,
        "KeyH" => KeyCode::KeyH,
        "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM,
        "KeyN" => KeyCode::KeyN,
        "KeyO" => KeyCode::KeyO,
        "KeyP" => KeyCode::KeyP,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyT" => KeyCode::KeyT,
        "KeyU" => KeyCode::KeyU,
        "KeyV" => KeyCode::KeyV,
        "KeyW" => KeyCode::KeyW,
        "KeyX" => KeyCode::KeyX,
        "KeyY" => KeyCode::KeyY,
        "KeyZ" => KeyCode::KeyZ,
        "Digit0" => KeyCode::Digit0,
        "Digit1" => KeyCode::Digit1,
        "Digit2" => KeyCode::Digit2,
        "Digit3" => KeyCode::Digit3,
        "Digit4" => KeyCode::Digit4,
        "Digit5" => KeyCode::Digit5,
        "Digit6" => KeyCode::Digit6,
        "Digit7" => KeyCode::Digit7,
        "Digit8" => KeyCode::Digit8,
        "Digit9" => KeyCode::Digit9,
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "Equal" => KeyCode::Equal,
        "Minus" => KeyCode::Minus,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft,
        "ControlRight" => KeyCode::ControlRight,
        "AltLeft" => KeyCode::AltLeft,
        "AltRight" => KeyCode::AltRight,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        _ => return None,
    })
}

/// Semantic actions that can be bound to physical inputs.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Thrust along the view direction (held).
    MoveForward,
    /// Thrust against the view direction (held).
    MoveBackward,
    /// Strafe left (held).
    MoveLeft,
    /// Strafe right (held).
    MoveRight,
    /// Thrust toward world up (held).
    MoveUp,
    /// Thrust toward world down (held).
    MoveDown,
    /// Nudge the orbit angle counter-clockwise (edge).
    OrbitLeft,
    /// Nudge the orbit angle clockwise (edge).
    OrbitRight,
    /// Nudge the orbit height up (edge).
    OrbitRaise,
    /// Nudge the orbit height down (edge).
    OrbitLower,
    /// Move the orbit closer to the body (edge).
    ZoomIn,
    /// Move the orbit away from the body (edge).
    ZoomOut,
    /// Switch between the tunnel view and the orbital view (edge).
    ToggleView,
    /// Take the mission photo (edge).
    CapturePhoto,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 14] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveUp,
        Action::MoveDown,
        Action::OrbitLeft,
        Action::OrbitRight,
        Action::OrbitRaise,
        Action::OrbitLower,
        Action::ZoomIn,
        Action::ZoomOut,
        Action::ToggleView,
        Action::CapturePhoto,
    ];

    /// Look up an action by its variant name (as written in config files).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Action> {
        Self::ALL.into_iter().find(|a| format!("{a:?}") == name)
    }

    /// Whether this action is held continuously (movement) rather than
    /// triggered once per press.
    #[must_use]
    pub fn is_held(self) -> bool {
        matches!(
            self,
            Action::MoveForward
                | Action::MoveBackward
                | Action::MoveLeft
                | Action::MoveRight
                | Action::MoveUp
                | Action::MoveDown
        )
    }
}

/// A physical input source that can be bound to an action.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum InputBinding {
    /// A keyboard key (physical code).
    Key(#[serde(with = "keycode_serde")] KeyCode),
    /// Wheel scrolled toward the body (negative wheel delta).
    WheelIn,
    /// Wheel scrolled away from the body (positive wheel delta).
    WheelOut,
}

/// Maps [`Action`]s to lists of [`InputBinding`]s.
///
/// Multiple bindings per action are supported (OR logic). Serializable to
/// RON for user-editable config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMap {
    /// The binding table.
    pub bindings: HashMap<Action, Vec<InputBinding>>,
}

impl Default for InputMap {
    fn default() -> Self {
        Self::default_cupola()
    }
}

impl InputMap {
    /// Create an empty input map with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Default bindings: WASD + Q/E movement, arrow-key orbit nudges,
    /// wheel or `=`/`-` zoom, `V` view toggle, `Space` capture.
    #[must_use]
    pub fn default_cupola() -> Self {
        use InputBinding::{Key, WheelIn, WheelOut};

        let mut bindings: HashMap<Action, Vec<InputBinding>> = HashMap::new();
        bindings.insert(Action::MoveForward, vec![Key(KeyCode::KeyW)]);
        bindings.insert(Action::MoveBackward, vec![Key(KeyCode::KeyS)]);
        bindings.insert(Action::MoveLeft, vec![Key(KeyCode::KeyA)]);
        bindings.insert(Action::MoveRight, vec![Key(KeyCode::KeyD)]);
        bindings.insert(Action::MoveUp, vec![Key(KeyCode::KeyQ)]);
        bindings.insert(Action::MoveDown, vec![Key(KeyCode::KeyE)]);
        bindings.insert(Action::OrbitLeft, vec![Key(KeyCode::ArrowLeft)]);
        bindings.insert(Action::OrbitRight, vec![Key(KeyCode::ArrowRight)]);
        bindings.insert(Action::OrbitRaise, vec![Key(KeyCode::ArrowUp)]);
        bindings.insert(Action::OrbitLower, vec![Key(KeyCode::ArrowDown)]);
        bindings.insert(Action::ZoomIn, vec![WheelIn, Key(KeyCode::Equal)]);
        bindings.insert(Action::ZoomOut, vec![WheelOut, Key(KeyCode::Minus)]);
        bindings.insert(Action::ToggleView, vec![Key(KeyCode::KeyV)]);
        bindings.insert(Action::CapturePhoto, vec![Key(KeyCode::Space)]);

        Self { bindings }
    }

    /// Set the bindings for an action, replacing any existing ones.
    pub fn set_bindings(&mut self, action: Action, bindings: Vec<InputBinding>) {
        self.bindings.insert(action, bindings);
    }

    /// Get the bindings for an action.
    #[must_use]
    pub fn get_bindings(&self, action: &Action) -> &[InputBinding] {
        self.bindings.get(action).map_or(&[], |v| v.as_slice())
    }

    /// All actions triggered by `binding`, in [`Action::ALL`] order.
    #[must_use]
    pub fn actions_for(&self, binding: InputBinding) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|a| self.get_bindings(a).contains(&binding))
            .collect()
    }

    /// Apply `action name -> key name` overrides from the configuration.
    ///
    /// Each valid entry replaces that action's keyboard bindings with the
    /// single named key; wheel bindings are kept. Entries with an unknown
    /// action or key are skipped with a warning and returned.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut rejected = Vec::new();
        for (action_name, key_name) in overrides {
            let (Some(action), Some(key)) = (Action::from_name(action_name), parse_key_name(key_name))
            else {
                warn!(action = %action_name, key = %key_name, "ignoring invalid keybinding override");
                rejected.push(action_name.clone());
                continue;
            };
            let mut bindings: Vec<InputBinding> = self
                .get_bindings(&action)
                .iter()
                .copied()
                .filter(|b| !matches!(b, InputBinding::Key(_)))
                .collect();
            bindings.insert(0, InputBinding::Key(key));
            self.bindings.insert(action, bindings);
        }
        rejected.sort();
        rejected
    }

    /// Bindings shared by more than one action, with the actions using them.
    #[must_use]
    pub fn detect_conflicts(&self) -> Vec<(InputBinding, Vec<Action>)> {
        let mut seen: HashMap<InputBinding, Vec<Action>> = HashMap::new();
        for action in Action::ALL {
            for binding in self.get_bindings(&action) {
                let users = seen.entry(*binding).or_default();
                if !users.contains(&action) {
                    users.push(action);
                }
            }
        }
        seen.into_iter().filter(|(_, a)| a.len() > 1).collect()
    }

    /// Serialize to RON string.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON string.
    ///
    /// # Errors
    /// Returns an error if the RON string is malformed.
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings_cover_every_action() {
        let map = InputMap::default();
        for action in Action::ALL {
            assert!(!map.get_bindings(&action).is_empty(), "{action:?} unbound");
        }
    }

    #[test]
    fn test_default_bindings_have_no_conflicts() {
        assert!(InputMap::default().detect_conflicts().is_empty());
    }

    #[test]
    fn test_actions_for_key() {
        let map = InputMap::default();
        assert_eq!(
            map.actions_for(InputBinding::Key(KeyCode::KeyW)),
            vec![Action::MoveForward]
        );
        assert_eq!(map.actions_for(InputBinding::WheelOut), vec![Action::ZoomOut]);
        assert!(map.actions_for(InputBinding::Key(KeyCode::KeyZ)).is_empty());
    }

    #[test]
    fn test_override_replaces_key_and_keeps_wheel() {
        let mut map = InputMap::default();
        let overrides = HashMap::from([("ZoomIn".to_string(), "PageUp".to_string())]);
        let rejected = map.apply_overrides(&overrides);
        assert!(rejected.is_empty());
        let b = map.get_bindings(&Action::ZoomIn);
        assert_eq!(b, &[InputBinding::Key(KeyCode::PageUp), InputBinding::WheelIn]);
    }

    #[test]
    fn test_invalid_overrides_are_rejected() {
        let mut map = InputMap::default();
        let overrides = HashMap::from([
            ("Jump".to_string(), "Space".to_string()),
            ("ToggleView".to_string(), "NotAKey".to_string()),
        ]);
        let rejected = map.apply_overrides(&overrides);
        assert_eq!(rejected, vec!["Jump".to_string(), "ToggleView".to_string()]);
        assert_eq!(
            map.get_bindings(&Action::ToggleView),
            &[InputBinding::Key(KeyCode::KeyV)]
        );
    }

    #[test]
    fn test_override_can_create_conflict() {
        let mut map = InputMap::default();
        let overrides = HashMap::from([("CapturePhoto".to_string(), "KeyW".to_string())]);
        map.apply_overrides(&overrides);
        let conflicts = map.detect_conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].0, InputBinding::Key(KeyCode::KeyW));
    }

    #[test]
    fn test_ron_roundtrip() {
        let map = InputMap::default();
        let ron = map.to_ron().unwrap();
        assert!(ron.contains("\"KeyW\""));
        let back = InputMap::from_ron(&ron).unwrap();
        assert_eq!(map, back);
    }

    #[test]
    fn test_held_actions() {
        assert!(Action::MoveUp.is_held());
        assert!(!Action::OrbitLeft.is_held());
        assert!(!Action::CapturePhoto.is_held());
    }

    #[test]
    fn test_action_from_name() {
        assert_eq!(Action::from_name("OrbitRaise"), Some(Action::OrbitRaise));
        assert_eq!(Action::from_name("orbitraise"), None);
    }
}
