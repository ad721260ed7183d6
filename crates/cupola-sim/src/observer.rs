//! Hooks the host uses to follow the simulation without polling.

use cupola_camera::NavigationMode;
use cupola_mission::MissionDef;

/// Line spoken the first time the view mounts in a session.
pub const WELCOME_LINE: &str =
    "Welcome aboard the station. Float to the cupola window and pick a mission.";

/// Receives simulation notifications. Every method defaults to a no-op.
pub trait SimulationObserver {
    fn on_mission_start(&mut self, _mission: &MissionDef) {}

    /// A photo was taken; `hit` is the aim verdict before resolution.
    fn on_capture_attempt(&mut self, _hit: bool) {}

    fn on_mission_resolved(&mut self, _success: bool, _mission: &MissionDef) {}

    fn on_mode_changed(&mut self, _mode: NavigationMode) {}
}

/// Session-wide state that outlives a single mount.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub has_played_welcome: bool,
}

/// Voice-over sink.
pub trait Narrator {
    fn speak(&mut self, line: &str);

    /// Speak the welcome line unless this session already heard it.
    fn welcome(&mut self, session: &mut SessionContext) {
        if session.has_played_welcome {
            return;
        }
        self.speak(WELCOME_LINE);
        session.has_played_welcome = true;
    }

    fn brief(&mut self, mission: &MissionDef) {
        if mission.briefing.is_empty() {
            self.speak(&mission.description);
        } else {
            self.speak(&mission.briefing);
        }
    }
}
