//! Smooth camera transitions: interpolates position and orientation
//! between two poses over a wall-clock duration with easing.
//!
//! At most one job exists. Starting a new one discards the old job
//! outright; the new job starts from whatever pose the caller passes,
//! which is normally the pose the old job had reached.

use tracing::debug;

use crate::pose::CameraPose;

/// Easing curves for camera transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EasingFunction {
    /// Constant speed, no acceleration.
    Linear,
    /// Slow start, fast end.
    EaseIn,
    /// Fast start, slow end.
    EaseOut,
    /// Quadratic slow start and slow end.
    EaseInOut,
    /// Cubic slow start and slow end.
    #[default]
    CubicInOut,
}

impl EasingFunction {
    /// Map a linear progress value (0.0..=1.0) to an eased value.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseIn => t * t,
            EasingFunction::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            EasingFunction::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            EasingFunction::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// One pose-to-pose animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionJob {
    pub from: CameraPose,
    pub to: CameraPose,
    pub start_ms: f64,
    /// Zero means snap on the first sample.
    pub duration_ms: f64,
    pub easing: EasingFunction,
}

impl TransitionJob {
    /// Linear progress in `[0, 1]` at `now_ms`.
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms.is_nan() || self.duration_ms <= 0.0 {
            return 1.0;
        }
        let elapsed = now_ms - self.start_ms;
        if !elapsed.is_finite() {
            return 0.0;
        }
        (elapsed / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    /// Interpolated pose at `now_ms`. Exactly `to` once complete.
    pub fn sample(&self, now_ms: f64) -> CameraPose {
        let p = self.progress(now_ms);
        if p >= 1.0 {
            return self.to;
        }
        self.from.lerp(&self.to, self.easing.apply(p))
    }
}

/// Result of advancing the animator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionSample {
    pub pose: CameraPose,
    /// The job reached its end on this sample and has been cleared.
    pub finished: bool,
}

/// Holds at most one [`TransitionJob`].
#[derive(Clone, Debug, Default)]
pub struct TransitionAnimator {
    job: Option<TransitionJob>,
}

impl TransitionAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transition, replacing any job in flight. Returns `true` if
    /// a job was replaced.
    pub fn begin(
        &mut self,
        from: CameraPose,
        to: CameraPose,
        duration_ms: f64,
        now_ms: f64,
        easing: EasingFunction,
    ) -> bool {
        let duration_ms = if duration_ms.is_finite() {
            duration_ms.max(0.0)
        } else {
            0.0
        };
        let replaced = self.job.is_some();
        if replaced {
            debug!("camera transition replaced before completion");
        }
        self.job = Some(TransitionJob {
            from,
            to,
            start_ms: now_ms,
            duration_ms,
            easing,
        });
        replaced
    }

    pub fn is_active(&self) -> bool {
        self.job.is_some()
    }

    pub fn job(&self) -> Option<&TransitionJob> {
        self.job.as_ref()
    }

    /// Drop the job in flight, leaving the camera wherever it was last
    /// sampled.
    pub fn cancel(&mut self) {
        self.job = None;
    }

    /// Sample the job at `now_ms`. Returns `None` when idle. On the sample
    /// that reaches progress 1 the pose is exactly the end pose and the
    /// job is cleared.
    pub fn step(&mut self, now_ms: f64) -> Option<TransitionSample> {
        let job = self.job?;
        let pose = job.sample(now_ms);
        let finished = job.progress(now_ms) >= 1.0;
        if finished {
            self.job = None;
        }
        Some(TransitionSample { pose, finished })
    }
}
