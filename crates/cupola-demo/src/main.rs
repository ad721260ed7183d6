//! Headless cupola session.
//!
//! Loads `cupola.ron` (creating it on first run), applies CLI overrides,
//! then flies one mission end to end: brief, frame the target, press the
//! shutter through the input bus and wait for the verdict. The session
//! report is printed as JSON on stdout.
//!
//! Run with `cargo run -p cupola-demo -- --mission hurricane-ida-2021`.

mod headless;

use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use cupola_config::{CliArgs, Config, default_config_dir};
use cupola_input::{InputBus, InputEvent, KeyCode};
use cupola_mission::{MissionCatalog, MissionState};
use cupola_sim::Simulation;
use headless::{
    GroundTrackReport, LogNarrator, LoggingCamera, LoggingScene, ReportRecorder, SessionReport,
};
use tracing::{error, info, warn};

const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);
    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {e}, using defaults");
        config = Config::default();
        config.apply_cli_overrides(&args);
    }

    let log_dir = config_dir.join("logs");
    if let Err(e) = cupola_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config))
    {
        eprintln!("Failed to initialize logging: {e}");
    }

    let catalog = MissionCatalog::load_or_builtin(config.mission.catalog_path.as_deref());
    info!(missions = catalog.len(), "mission catalog ready");

    let mission_id = match args.mission.clone() {
        Some(id) => id,
        None => match catalog.iter().next() {
            Some(m) => m.id.clone(),
            None => {
                error!("mission catalog is empty");
                return ExitCode::FAILURE;
            }
        },
    };

    let report = Rc::new(RefCell::new(SessionReport::default()));
    let mut sim = Simulation::from_config(
        &config,
        catalog,
        Box::new(LoggingCamera),
        Box::new(LoggingScene::default()),
    );
    sim.add_observer(Box::new(ReportRecorder(Rc::clone(&report))));
    sim.set_narrator(Box::new(LogNarrator));

    let bus = InputBus::new();
    if let Err(e) = sim.mount(&bus) {
        error!("failed to mount simulation: {e}");
        return ExitCode::FAILURE;
    }

    if !sim.select_mission(&mission_id) || !sim.start_mission() {
        error!(mission = %mission_id, "could not start mission");
        return ExitCode::FAILURE;
    }

    run_session(&mut sim, &bus, args.frames);

    let track = sim.ground_track();
    {
        let mut report = report.borrow_mut();
        report.frames = sim.frame_count();
        report.fixed_steps = sim.update_count();
        report.sim_time_s = sim.sim_time();
        report.final_position = sim.pose().position.to_array();
        report.ground_track = Some(GroundTrackReport {
            latitude: track.point.latitude,
            longitude: track.point.longitude,
            region: track.region,
        });
    }
    sim.unmount();

    let report = report.borrow();
    match serde_json::to_string_pretty(&*report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!("failed to serialize session report: {e}");
            return ExitCode::FAILURE;
        }
    }

    match report.success {
        Some(true) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

/// Drive frames until the mission resolves or `max_frames` run out.
/// The shutter is pressed once the framing flight has landed.
fn run_session(sim: &mut Simulation, bus: &InputBus, max_frames: u32) {
    let mut now = 0.0;
    let mut shutter_down = false;
    let mut pressed = false;

    for _ in 0..max_frames {
        sim.frame(now);
        now += FRAME_MS;

        if shutter_down {
            bus.publish(InputEvent::KeyUp(KeyCode::Space));
            shutter_down = false;
        }

        match sim.mission_state() {
            MissionState::Active(_) if !pressed && !sim.is_transitioning() => {
                let track = sim.ground_track();
                info!(
                    lat = track.point.latitude,
                    lon = track.point.longitude,
                    region = track.region,
                    "target framed, taking photo"
                );
                bus.publish(InputEvent::KeyDown(KeyCode::Space));
                shutter_down = true;
                pressed = true;
            }
            MissionState::Resolved { success, .. } => {
                info!(success, frames = sim.frame_count(), "session finished");
                return;
            }
            _ => {}
        }
    }
    warn!(max_frames, state = sim.mission_state().name(), "ran out of frames");
}
