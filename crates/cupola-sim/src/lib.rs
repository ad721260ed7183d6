//! The cupola simulation: wires input, the camera controllers and the
//! mission machine into one frame-driven [`Simulation`].
//!
//! Per frame: drain input, arbitrate the navigation mode, run the
//! authoritative controller (or the transition animator), update the
//! mission, then copy the pose into the render camera.

mod frame_clock;
mod observer;
mod settings;
mod simulation;

pub use frame_clock::{FIXED_DT, FrameClock, MAX_FRAME_TIME};
pub use observer::{Narrator, SessionContext, SimulationObserver, WELCOME_LINE};
pub use settings::SimSettings;
pub use simulation::{GroundTrack, LISTENER_NAME, Simulation};
