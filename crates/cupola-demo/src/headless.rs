//! Render-side stand-ins for running the simulation without a window.
//! Everything they receive goes to the log; the recorder also builds the
//! session report printed at exit.

use std::cell::RefCell;
use std::rc::Rc;

use cupola_camera::{CameraHandle, NavigationMode};
use cupola_math::Orientation;
use cupola_mission::{MarkerId, MissionDef, SceneHandle};
use cupola_sim::{Narrator, SimulationObserver};
use glam::Vec3;
use serde::Serialize;
use tracing::{debug, info, trace};

#[derive(Default)]
pub struct LoggingCamera;

impl CameraHandle for LoggingCamera {
    fn set_position(&mut self, position: Vec3) {
        trace!(?position, "camera position");
    }

    fn set_orientation(&mut self, orientation: Orientation) {
        trace!(
            yaw = orientation.yaw.to_degrees(),
            pitch = orientation.pitch.to_degrees(),
            "camera orientation"
        );
    }
}

#[derive(Default)]
pub struct LoggingScene {
    next_id: u64,
    live: Vec<MarkerId>,
}

impl SceneHandle for LoggingScene {
    fn create_marker(&mut self, position: Vec3) -> MarkerId {
        self.next_id += 1;
        let id = MarkerId(self.next_id);
        self.live.push(id);
        debug!(?id, ?position, "marker created");
        id
    }

    fn destroy_marker(&mut self, id: MarkerId) {
        self.live.retain(|m| *m != id);
        debug!(?id, remaining = self.live.len(), "marker destroyed");
    }

    fn set_marker_opacity(&mut self, id: MarkerId, opacity: f32) {
        trace!(?id, opacity, "marker pulse");
    }
}

pub struct LogNarrator;

impl Narrator for LogNarrator {
    fn speak(&mut self, line: &str) {
        info!(target: "narration", "{line}");
    }
}

/// Summary printed as JSON when the session ends.
#[derive(Debug, Default, Serialize)]
pub struct SessionReport {
    pub mission: Option<String>,
    pub captures: Vec<bool>,
    pub success: Option<bool>,
    pub mode_changes: Vec<String>,
    pub frames: u64,
    pub fixed_steps: u64,
    pub sim_time_s: f64,
    pub final_position: [f32; 3],
    pub ground_track: Option<GroundTrackReport>,
}

#[derive(Debug, Serialize)]
pub struct GroundTrackReport {
    pub latitude: f64,
    pub longitude: f64,
    pub region: &'static str,
}

/// Observer filling a shared [`SessionReport`].
pub struct ReportRecorder(pub Rc<RefCell<SessionReport>>);

impl SimulationObserver for ReportRecorder {
    fn on_mission_start(&mut self, mission: &MissionDef) {
        info!(mission = %mission.id, title = %mission.title, "mission start");
        self.0.borrow_mut().mission = Some(mission.id.clone());
    }

    fn on_capture_attempt(&mut self, hit: bool) {
        self.0.borrow_mut().captures.push(hit);
    }

    fn on_mission_resolved(&mut self, success: bool, mission: &MissionDef) {
        info!(mission = %mission.id, success, "mission complete");
        self.0.borrow_mut().success = Some(success);
    }

    fn on_mode_changed(&mut self, mode: NavigationMode) {
        self.0.borrow_mut().mode_changes.push(format!("{mode:?}"));
    }
}
