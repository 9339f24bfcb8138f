use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{Clock, SystemClock, Timestamp};

pub const DEFAULT_MAX_FPS: f64 = 60.0;

/// Value reported by [`FrameLimiter::current_frame_fps`] when no time has
/// passed since the frame started (elapsed is clamped to one nanosecond).
pub const MAX_REPORTED_FPS: f64 = 1e9;

const MIN_FRAME_SECONDS: f64 = 1.0 / MAX_REPORTED_FPS;

/// Produces per-frame `dt` and sleeps to cap the loop at a target rate.
///
/// Pacing is best effort: a frame that overruns its budget is simply not
/// throttled, the limiter never sleeps less later to catch up.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    clock: Arc<dyn Clock>,
    wait: Duration,
    frame_start: Timestamp,
}

impl FrameLimiter {
    pub fn new(max_fps: f64) -> Self {
        Self::with_clock(max_fps, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(max_fps: f64, clock: Arc<dyn Clock>) -> Self {
        let frame_start = clock.now();
        let mut limiter = Self {
            clock,
            wait: Duration::ZERO,
            frame_start,
        };
        limiter.set_limit(max_fps);
        limiter
    }

    /// Restarts the frame so an immediate `start_frame` returns (close to) zero.
    pub fn reset(&mut self) {
        self.frame_start = self.clock.now();
    }

    /// Marks the beginning of a frame and returns seconds since the previous one.
    pub fn start_frame(&mut self) -> f64 {
        let delta = self.clock.elapsed_since(self.frame_start);
        self.reset();
        delta.as_secs_f64()
    }

    /// Sleeps whatever remains of the frame budget. Overrun frames return at once.
    pub fn wait_for_next_frame(&self) {
        let elapsed = self.clock.elapsed_since(self.frame_start);
        self.clock.sleep(self.wait.saturating_sub(elapsed));
    }

    /// Takes effect from the next `wait_for_next_frame`. Non-finite or
    /// non-positive limits disable throttling.
    pub fn set_limit(&mut self, max_fps: f64) {
        self.wait = match wait_for_fps(max_fps) {
            Some(wait) => wait,
            None => {
                warn!(max_fps, "fps_limit_invalid");
                Duration::ZERO
            }
        };
        debug!(
            max_fps,
            wait_us = self.wait.as_micros() as u64,
            "fps_limit_changed"
        );
    }

    pub fn frame_budget(&self) -> Duration {
        self.wait
    }

    pub fn frame_start(&self) -> Timestamp {
        self.frame_start
    }

    /// Instantaneous rate of the running frame, capped at [`MAX_REPORTED_FPS`].
    pub fn current_frame_fps(&self) -> f64 {
        let elapsed = self.clock.elapsed_since(self.frame_start).as_secs_f64();
        1.0 / elapsed.max(MIN_FRAME_SECONDS)
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

fn wait_for_fps(max_fps: f64) -> Option<Duration> {
    if !max_fps.is_finite() || max_fps <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / max_fps).ok()
}
