//! The frame-driven simulation that owns every controller.
//!
//! Exactly one of three writers moves the camera in a given fixed step:
//! the transition animator while a transition runs, otherwise the
//! zero-gravity body in Physics mode or the orbital controller in Orbital
//! mode. When a transition finishes the arbiter is consulted immediately
//! and the newly authoritative controller adopts the final pose.

use cupola_camera::{
    CameraHandle, CameraPose, EasingFunction, LookController, ModeArbiter, ModeChange,
    MovementIntent, NavigationMode, OrbitNudge, OrbitalController, TransitionAnimator,
    ZeroGravityBody, decide_mode,
};
use cupola_config::Config;
use cupola_input::{
    Action, InputBinding, InputBus, InputError, InputEvent, InputMap, KeyboardState,
    PointerState, Subscription,
};
use cupola_math::{GeoPoint, region_name, to_geo};
use cupola_mission::{
    MissionCatalog, MissionDef, MissionEvent, MissionMachine, MissionState, SceneHandle,
};
use glam::Vec3;
use tracing::{debug, info, warn};

use crate::frame_clock::FrameClock;
use crate::observer::{Narrator, SessionContext, SimulationObserver};
use crate::settings::SimSettings;

/// Name the simulation registers on the input bus.
pub const LISTENER_NAME: &str = "cupola-view";

/// Where on the planet the camera is looking from, for the HUD.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundTrack {
    pub point: GeoPoint,
    pub region: &'static str,
}

pub struct Simulation {
    settings: SimSettings,
    catalog: MissionCatalog,
    input_map: InputMap,
    keyboard: KeyboardState,
    pointer: PointerState,
    intent: MovementIntent,
    pose: CameraPose,
    body: ZeroGravityBody,
    orbit: OrbitalController,
    look: LookController,
    arbiter: ModeArbiter,
    animator: TransitionAnimator,
    missions: MissionMachine,
    camera: Box<dyn CameraHandle>,
    scene: Box<dyn SceneHandle>,
    observers: Vec<Box<dyn SimulationObserver>>,
    narrator: Option<Box<dyn Narrator>>,
    session: SessionContext,
    subscription: Option<Subscription>,
    clock: FrameClock,
    now_ms: f64,
    /// Shutter pressed during input drain, judged after this frame's steps.
    capture_requested: bool,
}

impl Simulation {
    /// Create a simulation resting at the tunnel home pose in Physics mode.
    pub fn new(
        settings: SimSettings,
        catalog: MissionCatalog,
        input_map: InputMap,
        camera: Box<dyn CameraHandle>,
        scene: Box<dyn SceneHandle>,
    ) -> Self {
        let pose = CameraPose::looking_at(settings.home, settings.orbit.body_center);
        let initial_mode = decide_mode(pose.position, &settings.bounds);
        Self {
            catalog,
            input_map,
            keyboard: KeyboardState::new(),
            pointer: PointerState::new(),
            intent: MovementIntent::default(),
            pose,
            body: ZeroGravityBody::new(settings.physics),
            orbit: OrbitalController::new(settings.orbit, settings.orbit_initial),
            look: LookController::new(settings.look),
            arbiter: ModeArbiter::new(initial_mode, settings.arbiter),
            animator: TransitionAnimator::new(),
            missions: MissionMachine::new(settings.target, settings.capture_delay_ms),
            camera,
            scene,
            observers: Vec::new(),
            narrator: None,
            session: SessionContext::default(),
            subscription: None,
            clock: FrameClock::new(),
            now_ms: 0.0,
            capture_requested: false,
            settings,
        }
    }

    /// Build from a loaded config. Keybinding overrides that fail to parse
    /// are logged and the defaults kept.
    pub fn from_config(
        config: &Config,
        catalog: MissionCatalog,
        camera: Box<dyn CameraHandle>,
        scene: Box<dyn SceneHandle>,
    ) -> Self {
        let mut input_map = InputMap::default_cupola();
        let rejected = input_map.apply_overrides(&config.input.keybindings);
        if !rejected.is_empty() {
            warn!(?rejected, "ignored invalid keybinding overrides");
        }
        for (binding, actions) in input_map.detect_conflicts() {
            warn!(?binding, ?actions, "input binding triggers several actions");
        }
        Self::new(
            SimSettings::from_config(config),
            catalog,
            input_map,
            camera,
            scene,
        )
    }

    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    pub fn set_narrator(&mut self, narrator: Box<dyn Narrator>) {
        self.narrator = Some(narrator);
    }

    // --- Lifecycle ---

    /// Start listening on `bus`, greet the user once per session and open
    /// the mission selector.
    ///
    /// # Errors
    ///
    /// Fails if another view is already listening on `bus`.
    pub fn mount(&mut self, bus: &InputBus) -> Result<(), InputError> {
        if self.subscription.is_some() {
            debug!("simulation already mounted");
            return Ok(());
        }
        self.subscription = Some(bus.subscribe(LISTENER_NAME)?);
        self.clock.reset();
        if let Some(narrator) = self.narrator.as_mut() {
            narrator.welcome(&mut self.session);
        }
        self.missions.open_selector();
        self.pose.apply_to(self.camera.as_mut());
        info!(mode = ?self.arbiter.mode(), "simulation mounted");
        Ok(())
    }

    /// Stop listening, release every held input, cancel any transition
    /// and return the mission machine to Idle.
    pub fn unmount(&mut self) {
        if self.subscription.take().is_none() {
            return;
        }
        self.keyboard.release_all();
        self.pointer.cancel_drag();
        self.intent.clear();
        self.capture_requested = false;
        self.animator.cancel();
        self.body.reset();
        self.missions.shutdown(self.scene.as_mut());
        info!("simulation unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    // --- Frame ---

    /// Advance the simulation to `now_ms`.
    ///
    /// Input is drained first, then the fixed steps move the camera, and
    /// only then does the mission protocol see the pose. A shutter press
    /// read from this frame's input is judged against the stepped pose.
    pub fn frame(&mut self, now_ms: f64) {
        if !now_ms.is_finite() {
            warn!(now_ms, "ignoring frame with non-finite timestamp");
            return;
        }
        self.now_ms = now_ms;

        self.drain_input();
        self.sync_intent();
        self.apply_look();

        let steps = self.clock.advance(now_ms);
        let dt = crate::frame_clock::FIXED_DT as f32;
        for _ in 0..steps {
            self.fixed_step(dt, now_ms);
        }

        if std::mem::take(&mut self.capture_requested) {
            self.capture_photo();
        }
        if let Some(event) = self.missions.update(self.scene.as_mut(), now_ms) {
            self.dispatch(event);
        }

        self.pose.apply_to(self.camera.as_mut());
        self.pointer.clear_transients();
    }

    fn fixed_step(&mut self, dt: f32, now_ms: f64) {
        if let Some(sample) = self.animator.step(now_ms) {
            self.pose = sample.pose;
            if sample.finished {
                self.hand_back_authority(now_ms);
            }
            return;
        }

        if let Some(change) =
            self.arbiter
                .update(self.pose.position, &self.settings.bounds, now_ms)
        {
            self.on_mode_change(change);
        }

        match self.arbiter.mode() {
            NavigationMode::Physics => {
                let hit = self.body.step(
                    &mut self.pose.position,
                    &self.pose.orientation,
                    &self.intent,
                    &self.settings.bounds,
                    dt,
                );
                if hit.any() {
                    debug!(?hit, velocity = ?self.body.velocity(), "bounced off tunnel wall");
                }
            }
            NavigationMode::Orbital => {
                self.pose = self.orbit.step(dt);
            }
        }
    }

    /// A transition just finished: pick the mode for the final pose now and
    /// make the matching controller continue from it.
    fn hand_back_authority(&mut self, now_ms: f64) {
        if let Some(change) =
            self.arbiter
                .force_update(self.pose.position, &self.settings.bounds, now_ms)
        {
            self.on_mode_change(change);
        }
        match self.arbiter.mode() {
            NavigationMode::Physics => self.body.reset(),
            NavigationMode::Orbital => self.orbit.sync_to_position(self.pose.position),
        }
        debug!(mode = ?self.arbiter.mode(), position = ?self.pose.position, "transition finished");
    }

    fn on_mode_change(&mut self, change: ModeChange) {
        self.body.reset();
        if change.to == NavigationMode::Orbital {
            self.orbit.sync_to_position(self.pose.position);
        }
        info!(from = ?change.from, to = ?change.to, "navigation mode changed");
        for observer in &mut self.observers {
            observer.on_mode_changed(change.to);
        }
    }

    // --- Input ---

    fn drain_input(&mut self) {
        let events = match &self.subscription {
            Some(subscription) => subscription.drain(),
            None => return,
        };
        for event in events {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: InputEvent) {
        let edge = self.keyboard.process_event(&event);
        self.pointer.process_event(&event);

        match event {
            InputEvent::KeyDown(code) if edge => {
                for action in self.input_map.actions_for(InputBinding::Key(code)) {
                    self.on_action_pressed(action);
                }
            }
            InputEvent::Wheel(delta) if delta.is_finite() && delta != 0.0 => {
                let binding = if delta > 0.0 {
                    InputBinding::WheelOut
                } else {
                    InputBinding::WheelIn
                };
                for action in self.input_map.actions_for(binding) {
                    match action {
                        Action::ZoomIn => self.zoom(-delta.abs()),
                        Action::ZoomOut => self.zoom(delta.abs()),
                        other if !other.is_held() => self.on_action_pressed(other),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    fn on_action_pressed(&mut self, action: Action) {
        match action {
            Action::MoveForward
            | Action::MoveBackward
            | Action::MoveLeft
            | Action::MoveRight
            | Action::MoveUp
            | Action::MoveDown => {} // read from the keyboard in sync_intent
            Action::OrbitLeft => self.nudge_orbit(OrbitNudge::AngleLeft),
            Action::OrbitRight => self.nudge_orbit(OrbitNudge::AngleRight),
            Action::OrbitRaise => self.nudge_orbit(OrbitNudge::Raise),
            Action::OrbitLower => self.nudge_orbit(OrbitNudge::Lower),
            Action::ZoomIn => self.nudge_orbit(OrbitNudge::ZoomIn),
            Action::ZoomOut => self.nudge_orbit(OrbitNudge::ZoomOut),
            Action::ToggleView => self.toggle_view(),
            Action::CapturePhoto => self.capture_requested = true,
        }
    }

    /// A movement action is held while any of its keys is down.
    fn sync_intent(&mut self) {
        let held = |action: Action| {
            self.input_map
                .get_bindings(&action)
                .iter()
                .any(|b| matches!(b, InputBinding::Key(k) if self.keyboard.is_pressed(*k)))
        };
        let intent = MovementIntent {
            forward: held(Action::MoveForward),
            backward: held(Action::MoveBackward),
            left: held(Action::MoveLeft),
            right: held(Action::MoveRight),
            up: held(Action::MoveUp),
            down: held(Action::MoveDown),
        };
        self.intent = intent;
    }

    fn orbit_has_authority(&self) -> bool {
        self.arbiter.mode() == NavigationMode::Orbital && !self.animator.is_active()
    }

    fn nudge_orbit(&mut self, nudge: OrbitNudge) {
        if !self.orbit_has_authority() {
            debug!(?nudge, "orbit nudge ignored outside orbital mode");
            return;
        }
        self.orbit.nudge(nudge);
    }

    fn zoom(&mut self, wheel: f32) {
        if !self.orbit_has_authority() {
            return;
        }
        self.orbit.zoom(wheel);
    }

    fn apply_look(&mut self) {
        if self.arbiter.mode() != NavigationMode::Physics || self.animator.is_active() {
            return;
        }
        self.look.apply(&self.pointer, &mut self.pose.orientation);
    }

    // --- Commands ---

    /// Animate from the current pose to `to`, replacing any running
    /// transition.
    pub fn begin_transition(&mut self, to: CameraPose) {
        let replaced = self.animator.begin(
            self.pose,
            to,
            self.settings.transition_ms,
            self.now_ms,
            EasingFunction::CubicInOut,
        );
        self.body.reset();
        debug!(replaced, to = ?to.position, "camera transition started");
    }

    /// Fly between the tunnel home pose and the wide orbital view.
    ///
    /// While a transition runs, its destination decides the direction, so
    /// pressing twice turns the camera back.
    pub fn toggle_view(&mut self) {
        let heading = match self.animator.job() {
            Some(job) => decide_mode(job.to.position, &self.settings.bounds),
            None => self.arbiter.mode(),
        };
        let to = match heading {
            NavigationMode::Physics => self.orbit.pose_for(&self.settings.orbit_initial),
            NavigationMode::Orbital => self.home_pose(),
        };
        info!(from = ?heading, "view toggled");
        self.begin_transition(to);
    }

    fn home_pose(&self) -> CameraPose {
        CameraPose::looking_at(self.settings.home, self.settings.orbit.body_center)
    }

    /// Show the mission selector.
    pub fn open_selector(&mut self) -> bool {
        self.missions.open_selector()
    }

    /// Brief the catalog mission `id`. Unknown ids are logged and ignored.
    pub fn select_mission(&mut self, id: &str) -> bool {
        let Some(mission) = self.catalog.get(id).cloned() else {
            warn!(mission = id, "unknown mission id");
            return false;
        };
        match self.missions.select(mission) {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Start the briefed mission and fly to frame its target.
    pub fn start_mission(&mut self) -> bool {
        match self.missions.start(self.scene.as_mut()) {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Take the photo. Returns the aim verdict, or `None` when no mission
    /// is active.
    pub fn capture_photo(&mut self) -> Option<bool> {
        let event = self.missions.capture(&self.pose, self.now_ms)?;
        let hit = match &event {
            MissionEvent::CaptureAttempt { hit, .. } => Some(*hit),
            _ => None,
        };
        self.dispatch(event);
        hit
    }

    /// Fly the resolved mission again.
    pub fn retry_mission(&mut self) -> bool {
        match self.missions.retry(self.scene.as_mut()) {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Leave a resolved mission for the selector.
    pub fn exit_mission(&mut self) -> bool {
        self.missions.exit()
    }

    /// Abandon the current mission and return to the selector.
    pub fn reset_mission(&mut self) {
        self.missions.reset(self.scene.as_mut());
    }

    fn dispatch(&mut self, event: MissionEvent) {
        match event {
            MissionEvent::Briefed(mission) => {
                if let Some(narrator) = self.narrator.as_mut() {
                    narrator.brief(&mission);
                }
            }
            MissionEvent::Started(mission) => {
                self.frame_target(&mission);
                for observer in &mut self.observers {
                    observer.on_mission_start(&mission);
                }
            }
            MissionEvent::CaptureAttempt { hit, .. } => {
                for observer in &mut self.observers {
                    observer.on_capture_attempt(hit);
                }
            }
            MissionEvent::Resolved { mission, success } => {
                for observer in &mut self.observers {
                    observer.on_mission_resolved(success, &mission);
                }
            }
        }
    }

    fn frame_target(&mut self, mission: &MissionDef) {
        let params = self.orbit.framing_params(
            &mission.geo(),
            self.settings.target.body_radius,
            self.settings.framing_distance,
        );
        let to = self.orbit.pose_for(&params);
        self.begin_transition(to);
    }

    // --- Queries ---

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn mode(&self) -> NavigationMode {
        self.arbiter.mode()
    }

    pub fn mission_state(&self) -> &MissionState {
        self.missions.state()
    }

    pub fn missions(&self) -> &MissionMachine {
        &self.missions
    }

    pub fn catalog(&self) -> &MissionCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    pub fn is_transitioning(&self) -> bool {
        self.animator.is_active()
    }

    /// Destination of the running transition.
    pub fn transition_target(&self) -> Option<CameraPose> {
        self.animator.job().map(|job| job.to)
    }

    pub fn velocity(&self) -> Vec3 {
        self.body.velocity()
    }

    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }

    /// Fixed steps run since creation.
    pub fn update_count(&self) -> u64 {
        self.clock.update_count()
    }

    /// Simulated seconds, the sum of all fixed steps.
    pub fn sim_time(&self) -> f64 {
        self.clock.total_sim_time()
    }

    /// Point on the planet below the camera.
    pub fn ground_track(&self) -> GroundTrack {
        let point = to_geo(self.pose.position, self.settings.orbit.body_center);
        GroundTrack {
            point,
            region: region_name(point.latitude, point.longitude),
        }
    }
}
