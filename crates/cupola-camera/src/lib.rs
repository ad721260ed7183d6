//! Camera controllers for the cupola view: the zero-gravity velocity
//! integrator used inside the tunnel, the orbital controller used outside
//! it, pointer look, the mode arbiter that picks between them, and the
//! eased transition animator.

pub mod camera_transition;
pub mod look_controller;
pub mod mode_arbiter;
pub mod orbit_camera;
mod pose;
pub mod zero_gravity;

pub use camera_transition::{EasingFunction, TransitionAnimator, TransitionJob, TransitionSample};
pub use look_controller::{LookController, LookSettings};
pub use mode_arbiter::{ArbiterSettings, ModeArbiter, ModeChange, NavigationMode, decide_mode};
pub use orbit_camera::{OrbitNudge, OrbitSettings, OrbitalController, OrbitalParameters};
pub use pose::{CameraHandle, CameraPose};
pub use zero_gravity::{MovementIntent, ZeroGravityBody, ZeroGravityParams};
