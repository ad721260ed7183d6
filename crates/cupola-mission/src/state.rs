//! Mission lifecycle.
//!
//! ```text
//! Idle -> Selecting -> Briefed -> Active -> Capturing -> Resolved
//!                        ^          ^                      |
//!                        |          +------- retry --------+
//!                        +------------- exit / reset ------+
//! ```
//!
//! Invalid commands are logged and ignored; nothing here returns an error.
//! The machine owns the live [`MissionTarget`] and keeps the scene marker
//! in step with it: one marker exists exactly while the mission is Active
//! or Capturing.

use cupola_camera::CameraPose;
use tracing::{debug, info, warn};

use crate::catalog::MissionDef;
use crate::marker::{SceneHandle, pulse_opacity};
use crate::targeting::{MissionTarget, TargetSettings, angular_error, hit_test};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum MissionState {
    #[default]
    Idle,
    Selecting,
    Briefed(MissionDef),
    Active(MissionDef),
    Capturing(MissionDef),
    Resolved { mission: MissionDef, success: bool },
}

impl MissionState {
    /// The mission this state refers to, if any.
    pub fn mission(&self) -> Option<&MissionDef> {
        match self {
            MissionState::Idle | MissionState::Selecting => None,
            MissionState::Briefed(m)
            | MissionState::Active(m)
            | MissionState::Capturing(m)
            | MissionState::Resolved { mission: m, .. } => Some(m),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MissionState::Idle => "idle",
            MissionState::Selecting => "selecting",
            MissionState::Briefed(_) => "briefed",
            MissionState::Active(_) => "active",
            MissionState::Capturing(_) => "capturing",
            MissionState::Resolved { .. } => "resolved",
        }
    }
}

/// Notable transitions reported to the caller, which forwards them to
/// observers.
#[derive(Clone, Debug, PartialEq)]
pub enum MissionEvent {
    Briefed(MissionDef),
    Started(MissionDef),
    CaptureAttempt { mission: MissionDef, hit: bool },
    Resolved { mission: MissionDef, success: bool },
}

#[derive(Clone, Copy, Debug)]
struct PendingCapture {
    hit: bool,
    resolve_at_ms: f64,
}

/// Mission state machine plus the target it owns.
#[derive(Debug)]
pub struct MissionMachine {
    settings: TargetSettings,
    capture_delay_ms: f64,
    state: MissionState,
    target: Option<MissionTarget>,
    pending: Option<PendingCapture>,
}

impl MissionMachine {
    pub fn new(settings: TargetSettings, capture_delay_ms: f64) -> Self {
        let capture_delay_ms = if capture_delay_ms.is_finite() {
            capture_delay_ms.max(0.0)
        } else {
            0.0
        };
        Self {
            settings,
            capture_delay_ms,
            state: MissionState::Idle,
            target: None,
            pending: None,
        }
    }

    pub fn state(&self) -> &MissionState {
        &self.state
    }

    pub fn target(&self) -> Option<&MissionTarget> {
        self.target.as_ref()
    }

    pub fn settings(&self) -> &TargetSettings {
        &self.settings
    }

    /// Show the mission selector. Valid from Idle; a no-op if already
    /// selecting.
    pub fn open_selector(&mut self) -> bool {
        match self.state {
            MissionState::Idle => {
                self.enter(MissionState::Selecting);
                true
            }
            MissionState::Selecting => true,
            _ => {
                warn!(state = self.state.name(), "mission selector is only available when idle");
                false
            }
        }
    }

    /// Brief `mission`. Valid from Idle, Selecting or Briefed (changing
    /// the pick).
    pub fn select(&mut self, mission: MissionDef) -> Option<MissionEvent> {
        match self.state {
            MissionState::Idle | MissionState::Selecting | MissionState::Briefed(_) => {
                info!(mission = %mission.id, "mission briefed");
                self.enter(MissionState::Briefed(mission.clone()));
                Some(MissionEvent::Briefed(mission))
            }
            _ => {
                warn!(
                    state = self.state.name(),
                    mission = %mission.id,
                    "cannot select a mission while one is in progress"
                );
                None
            }
        }
    }

    /// Start the briefed mission and place its target.
    pub fn start(&mut self, scene: &mut dyn SceneHandle) -> Option<MissionEvent> {
        let MissionState::Briefed(mission) = &self.state else {
            warn!(state = self.state.name(), "no briefed mission to start");
            return None;
        };
        let mission = mission.clone();
        self.activate(mission.clone(), scene);
        info!(mission = %mission.id, "mission started");
        Some(MissionEvent::Started(mission))
    }

    /// Take the photo. Valid only while Active: the hit is evaluated now
    /// against `camera`, and the mission resolves after the capture delay.
    pub fn capture(&mut self, camera: &CameraPose, now_ms: f64) -> Option<MissionEvent> {
        let MissionState::Active(mission) = &self.state else {
            debug!(state = self.state.name(), "capture ignored outside an active mission");
            return None;
        };
        let mission = mission.clone();
        let Some(target) = self.target else {
            warn!(mission = %mission.id, "active mission has no target");
            return None;
        };

        let hit = hit_test(camera, target.position, self.settings.tolerance_deg);
        let error_deg = angular_error(camera, target.position).map(f32::to_degrees);
        info!(mission = %mission.id, hit, ?error_deg, "photo captured");

        self.pending = Some(PendingCapture {
            hit,
            resolve_at_ms: now_ms + self.capture_delay_ms,
        });
        self.state = MissionState::Capturing(mission.clone());
        Some(MissionEvent::CaptureAttempt { mission, hit })
    }

    /// Per-frame update: pulse the marker and resolve a pending capture
    /// whose delay has elapsed.
    pub fn update(&mut self, scene: &mut dyn SceneHandle, now_ms: f64) -> Option<MissionEvent> {
        if let Some(target) = &self.target {
            scene.set_marker_opacity(target.marker, pulse_opacity(now_ms));
        }

        let pending = self.pending?;
        if now_ms < pending.resolve_at_ms {
            return None;
        }
        self.pending = None;
        let MissionState::Capturing(mission) = &self.state else {
            return None;
        };
        let mission = mission.clone();
        self.release_target(scene);
        info!(mission = %mission.id, success = pending.hit, "mission resolved");
        self.state = MissionState::Resolved {
            mission: mission.clone(),
            success: pending.hit,
        };
        Some(MissionEvent::Resolved {
            mission,
            success: pending.hit,
        })
    }

    /// Replay a resolved mission.
    pub fn retry(&mut self, scene: &mut dyn SceneHandle) -> Option<MissionEvent> {
        let MissionState::Resolved { mission, .. } = &self.state else {
            warn!(state = self.state.name(), "retry is only available after a mission");
            return None;
        };
        let mission = mission.clone();
        self.activate(mission.clone(), scene);
        info!(mission = %mission.id, "mission retried");
        Some(MissionEvent::Started(mission))
    }

    /// Leave a resolved mission for the selector.
    pub fn exit(&mut self) -> bool {
        if !matches!(self.state, MissionState::Resolved { .. }) {
            warn!(state = self.state.name(), "exit is only available after a mission");
            return false;
        }
        self.enter(MissionState::Selecting);
        true
    }

    /// Abandon whatever is happening and go back to the selector.
    pub fn reset(&mut self, scene: &mut dyn SceneHandle) {
        self.release_target(scene);
        self.pending = None;
        self.enter(MissionState::Selecting);
    }

    /// Return to Idle, releasing the target. Used when the view unmounts.
    pub fn shutdown(&mut self, scene: &mut dyn SceneHandle) {
        self.release_target(scene);
        self.pending = None;
        self.enter(MissionState::Idle);
    }

    fn activate(&mut self, mission: MissionDef, scene: &mut dyn SceneHandle) {
        self.release_target(scene);
        self.pending = None;
        let geo = mission.geo();
        let position = self.settings.marker_position(&geo);
        let marker = scene.create_marker(position);
        self.target = Some(MissionTarget {
            geo,
            radius: self.settings.marker_radius(),
            position,
            marker,
        });
        self.state = MissionState::Active(mission);
    }

    fn release_target(&mut self, scene: &mut dyn SceneHandle) {
        if let Some(target) = self.target.take() {
            scene.destroy_marker(target.marker);
        }
    }

    fn enter(&mut self, state: MissionState) {
        debug!(from = self.state.name(), to = state.name(), "mission state");
        self.state = state;
    }
}
