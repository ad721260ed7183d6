//! Observation missions: the mission catalog, the target marker placed on
//! the planet, the angular hit test, and the mission state machine.

pub mod catalog;
mod error;
pub mod marker;
pub mod state;
pub mod targeting;

pub use catalog::{Difficulty, MissionCatalog, MissionDef};
pub use error::CatalogError;
pub use marker::{MarkerId, SceneHandle, pulse_opacity};
pub use state::{MissionEvent, MissionMachine, MissionState};
pub use targeting::{MissionTarget, TargetSettings, angular_error, hit_test};
