//! Fixed-timestep clock implementing the "Fix Your Timestep" pattern.
//!
//! The host passes a timestamp each frame; the clock turns elapsed time
//! into a whole number of fixed simulation steps and carries the remainder.

use tracing::warn;

/// Fixed simulation timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Maximum frame time clamp to prevent spiral of death.
/// A long stall (tab in background, debugger) costs at most this much
/// simulated time instead of dozens of catch-up steps.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Accumulator state driven by explicit frame timestamps.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    previous_ms: Option<f64>,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frame at `now_ms` and return how many fixed steps to run.
    ///
    /// The first frame only sets the reference time. A timestamp earlier
    /// than the previous one counts as zero elapsed time.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let mut frame_time = match self.previous_ms {
            Some(prev) if now_ms.is_finite() => ((now_ms - prev) / 1000.0).max(0.0),
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.previous_ms = Some(now_ms);
        }

        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= FIXED_DT {
            self.total_sim_time += FIXED_DT;
            self.accumulator -= FIXED_DT;
            steps += 1;
        }
        self.update_count += u64::from(steps);
        self.frame_count += 1;
        steps
    }

    /// Forget the reference time, e.g. after the view was unmounted.
    pub fn reset(&mut self) {
        self.previous_ms = None;
        self.accumulator = 0.0;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Total simulated time in seconds.
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}
