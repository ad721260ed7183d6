//! Chooses which controller owns the camera: zero-g physics inside the
//! tunnel, the orbital controller outside it.

use cupola_math::TunnelBounds;
use glam::Vec3;
use tracing::debug;

/// The navigation mode currently driving the camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NavigationMode {
    /// Free-floating inside the tunnel.
    #[default]
    Physics,
    /// Circular orbit around the planet.
    Orbital,
}

/// Containment-only decision: inside (or on) the bounds is physics.
pub fn decide_mode(position: Vec3, bounds: &TunnelBounds) -> NavigationMode {
    if bounds.contains(position) {
        NavigationMode::Physics
    } else {
        NavigationMode::Orbital
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArbiterSettings {
    /// Dead-zone half-width around the tunnel walls, in world units.
    pub margin: f32,
    /// Minimum time between evaluations.
    pub interval_ms: f64,
}

impl Default for ArbiterSettings {
    fn default() -> Self {
        Self {
            margin: 0.25,
            interval_ms: 100.0,
        }
    }
}

/// A mode switch reported by [`ModeArbiter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeChange {
    pub from: NavigationMode,
    pub to: NavigationMode,
}

/// Runtime arbitration with hysteresis and a throttle.
///
/// Physics is left only once the camera is beyond the bounds grown by the
/// margin; physics is re-entered only once the camera is inside the bounds
/// shrunk by the margin. Between the two the current mode holds, so a
/// camera hovering at the wall cannot flap between modes.
#[derive(Clone, Debug)]
pub struct ModeArbiter {
    settings: ArbiterSettings,
    mode: NavigationMode,
    last_eval_ms: Option<f64>,
}

impl ModeArbiter {
    pub fn new(initial: NavigationMode, settings: ArbiterSettings) -> Self {
        Self {
            settings,
            mode: initial,
            last_eval_ms: None,
        }
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    /// Evaluate if the throttle interval has elapsed since the last
    /// evaluation.
    pub fn update(&mut self, position: Vec3, bounds: &TunnelBounds, now_ms: f64) -> Option<ModeChange> {
        if let Some(last) = self.last_eval_ms {
            let elapsed = now_ms - last;
            // A clock that went backwards restarts the interval.
            if elapsed >= 0.0 && elapsed < self.settings.interval_ms {
                return None;
            }
        }
        self.evaluate(position, bounds, now_ms)
    }

    /// Evaluate immediately, ignoring the throttle. Used when a transition
    /// hands authority back.
    pub fn force_update(
        &mut self,
        position: Vec3,
        bounds: &TunnelBounds,
        now_ms: f64,
    ) -> Option<ModeChange> {
        self.evaluate(position, bounds, now_ms)
    }

    fn evaluate(&mut self, position: Vec3, bounds: &TunnelBounds, now_ms: f64) -> Option<ModeChange> {
        self.last_eval_ms = Some(now_ms);
        if !position.is_finite() {
            return None;
        }

        let margin = self.settings.margin.abs();
        let next = match self.mode {
            NavigationMode::Physics => decide_mode(position, &bounds.expand_by(margin)),
            NavigationMode::Orbital => decide_mode(position, &bounds.expand_by(-margin)),
        };
        if next == self.mode {
            return None;
        }

        let change = ModeChange {
            from: self.mode,
            to: next,
        };
        debug!(from = ?change.from, to = ?change.to, ?position, "navigation mode changed");
        self.mode = next;
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tunnel() -> TunnelBounds {
        TunnelBounds::from_center_half_extents(Vec3::ZERO, Vec3::new(4.0, 3.5, 9.0))
    }

    #[test]
    fn test_decide_mode_by_containment() {
        let b = tunnel();
        assert_eq!(decide_mode(Vec3::new(0.0, 0.0, 5.0), &b), NavigationMode::Physics);
        assert_eq!(decide_mode(Vec3::new(4.0, 3.5, 9.0), &b), NavigationMode::Physics);
        assert_eq!(decide_mode(Vec3::new(0.0, 0.0, -15.0), &b), NavigationMode::Orbital);
    }

    #[test]
    fn test_decide_mode_is_idempotent() {
        let b = tunnel();
        for p in [Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), Vec3::new(3.99, -3.49, 8.99)] {
            let first = decide_mode(p, &b);
            for _ in 0..5 {
                assert_eq!(decide_mode(p, &b), first);
            }
        }
    }

    #[test]
    fn test_leaves_physics_beyond_margin_only() {
        let mut arb = ModeArbiter::new(NavigationMode::Physics, ArbiterSettings::default());
        assert_eq!(arb.update(Vec3::new(4.1, 0.0, 0.0), &tunnel(), 0.0), None);
        let change = arb.update(Vec3::new(4.3, 0.0, 0.0), &tunnel(), 200.0);
        assert_eq!(
            change,
            Some(ModeChange {
                from: NavigationMode::Physics,
                to: NavigationMode::Orbital
            })
        );
        assert_eq!(arb.mode(), NavigationMode::Orbital);
    }

    #[test]
    fn test_reenters_physics_inside_margin_only() {
        let mut arb = ModeArbiter::new(NavigationMode::Orbital, ArbiterSettings::default());
        assert_eq!(arb.update(Vec3::new(3.9, 0.0, 0.0), &tunnel(), 0.0), None);
        assert_eq!(arb.mode(), NavigationMode::Orbital);
        assert!(arb.update(Vec3::new(3.5, 0.0, 0.0), &tunnel(), 200.0).is_some());
        assert_eq!(arb.mode(), NavigationMode::Physics);
    }

    #[test]
    fn test_throttle_skips_early_updates() {
        let mut arb = ModeArbiter::new(NavigationMode::Physics, ArbiterSettings::default());
        assert_eq!(arb.update(Vec3::ZERO, &tunnel(), 0.0), None);
        assert_eq!(arb.update(Vec3::new(0.0, 0.0, -15.0), &tunnel(), 50.0), None);
        assert_eq!(arb.mode(), NavigationMode::Physics);
        assert!(arb.update(Vec3::new(0.0, 0.0, -15.0), &tunnel(), 100.0).is_some());
    }

    #[test]
    fn test_force_update_ignores_throttle() {
        let mut arb = ModeArbiter::new(NavigationMode::Physics, ArbiterSettings::default());
        arb.update(Vec3::ZERO, &tunnel(), 0.0);
        assert!(arb.force_update(Vec3::new(0.0, 0.0, -15.0), &tunnel(), 1.0).is_some());
    }

    #[test]
    fn test_non_finite_position_keeps_mode() {
        let mut arb = ModeArbiter::new(NavigationMode::Physics, ArbiterSettings::default());
        assert_eq!(arb.update(Vec3::splat(f32::NAN), &tunnel(), 0.0), None);
        assert_eq!(arb.mode(), NavigationMode::Physics);
    }
}
