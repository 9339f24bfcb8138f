use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LockResult, RwLock};
use std::time::Duration;

use tracing::warn;

use crate::time::Timestamp;

static POISON_WARNED: AtomicBool = AtomicBool::new(false);

/// Takes the guard out of a poisoned lock; the snapshot is plain data, so a
/// panicking writer cannot leave it half-updated. Warns once per process.
fn recover<G>(result: LockResult<G>, operation: &'static str) -> G {
    result.unwrap_or_else(|poisoned| {
        if !POISON_WARNED.swap(true, Ordering::Relaxed) {
            warn!(operation, "metrics_lock_poisoned");
        }
        poisoned.into_inner()
    })
}

/// Averages over one reporting interval.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub frames: u32,
    pub fps: f32,
    /// Mean `dt` handed to the scene.
    pub frame_time_ms: f32,
    /// Longest `dt` of the interval.
    pub max_frame_time_ms: f32,
    /// Mean time spent updating, drawing and presenting, before the limiter sleeps.
    pub work_time_ms: f32,
}

/// Latest loop metrics, readable from any thread.
#[derive(Clone, Debug, Default)]
pub struct MetricsHandle {
    latest: Arc<RwLock<LoopMetricsSnapshot>>,
}

impl MetricsHandle {
    pub fn snapshot(&self) -> LoopMetricsSnapshot {
        *recover(self.latest.read(), "read")
    }

    pub(crate) fn publish(&self, snapshot: LoopMetricsSnapshot) {
        *recover(self.latest.write(), "write") = snapshot;
    }
}

#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval: Duration,
    started: Timestamp,
    frames: u32,
    frame_total: Duration,
    frame_max: Duration,
    work_total: Duration,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration, start: Timestamp) -> Self {
        Self {
            interval,
            started: start,
            frames: 0,
            frame_total: Duration::ZERO,
            frame_max: Duration::ZERO,
            work_total: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, dt: Duration, work: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.frame_total = self.frame_total.saturating_add(dt);
        self.frame_max = self.frame_max.max(dt);
        self.work_total = self.work_total.saturating_add(work);
    }

    /// Closes the interval once it has run its length, starting the next one
    /// at `now`.
    pub(crate) fn maybe_snapshot(&mut self, now: Timestamp) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed < self.interval {
            return None;
        }

        let mean_ms = |total: Duration| match self.frames {
            0 => 0.0,
            frames => total.as_secs_f32() * 1000.0 / frames as f32,
        };
        let snapshot = LoopMetricsSnapshot {
            frames: self.frames,
            fps: self.frames as f32 / elapsed.as_secs_f32().max(f32::EPSILON),
            frame_time_ms: mean_ms(self.frame_total),
            max_frame_time_ms: self.frame_max.as_secs_f32() * 1000.0,
            work_time_ms: mean_ms(self.work_total),
        };

        *self = Self::new(self.interval, now);
        Some(snapshot)
    }
}
