use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::canvas::Color;
use crate::time::{Clock, FrameLimiter, SystemClock, DEFAULT_MAX_FPS};

use super::metrics::MetricsAccumulator;
use super::{Host, HostError, MetricsHandle, Scene, SceneError, SceneRegistry, SceneResult};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub max_fps: f64,
    /// Cleared before every draw; `None` leaves the previous frame in place.
    pub clear_color: Option<Color>,
    /// 0 disables the periodic `loop_metrics` event.
    pub metrics_log_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            title: "World Order".to_string(),
            width: 1024,
            height: 768,
            max_fps: DEFAULT_MAX_FPS,
            clear_color: Some(Color::BLACK),
            metrics_log_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("no scene registered under `{name}`")]
    SceneNotFound { name: String },
    #[error("failed to create scene `{name}`: {source}")]
    SceneCreation {
        name: String,
        #[source]
        source: SceneError,
    },
    #[error("scene `{name}` finished with an error result")]
    SceneFailed { name: String },
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Drives named scenes on a [`Host`], one frame per limiter tick.
pub struct World<H, T> {
    host: H,
    config: WorldConfig,
    scenes: SceneRegistry<T>,
    limiter: FrameLimiter,
    metrics: MetricsHandle,
}

impl<H, T> World<H, T>
where
    H: Host,
    T: fmt::Debug + 'static,
{
    pub fn new(host: H, config: WorldConfig, scenes: SceneRegistry<T>) -> Self {
        Self::with_clock(host, config, scenes, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(
        host: H,
        config: WorldConfig,
        scenes: SceneRegistry<T>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let limiter = FrameLimiter::with_clock(config.max_fps, clock);
        Self {
            host,
            config,
            scenes,
            limiter,
            metrics: MetricsHandle::default(),
        }
    }

    /// Applies from the next frame, including inside a running scene.
    pub fn set_fps(&mut self, max_fps: f64) {
        self.config.max_fps = max_fps;
        self.limiter.set_limit(max_fps);
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn metrics_handle(&self) -> MetricsHandle {
        self.metrics.clone()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Builds a fresh `name` scene and runs it until it returns anything but
    /// [`SceneResult::Continue`] or the host closes.
    pub fn run_scene(&mut self, name: &str) -> Result<SceneResult<T>, WorldError> {
        let mut scene = self.create_scene(name)?;
        self.limiter.reset();
        let mut metrics = self.metrics_interval().map(|interval| {
            MetricsAccumulator::new(interval, self.limiter.frame_start())
        });

        let result = loop {
            if self.host.is_closed() {
                break SceneResult::WindowClosed;
            }
            let dt = self.limiter.start_frame();
            self.host.poll();
            if self.host.is_closed() {
                break SceneResult::WindowClosed;
            }

            let result = scene.update(dt, self.host.input());
            if !result.is_continue() {
                break result;
            }
            if self.host.is_closed() {
                break SceneResult::WindowClosed;
            }

            self.draw_frame(scene.as_mut());
            if let Err(error) = self.host.present() {
                warn!(scene = name, error = %error, "present_failed");
                return Err(error.into());
            }

            if let Some(metrics) = metrics.as_mut() {
                let clock = self.limiter.clock();
                let now = clock.now();
                let work = now.saturating_duration_since(self.limiter.frame_start());
                metrics.record_frame(Duration::from_secs_f64(dt), work);
                if let Some(snapshot) = metrics.maybe_snapshot(now) {
                    self.metrics.publish(snapshot);
                    info!(
                        fps = snapshot.fps,
                        frame_time_ms = snapshot.frame_time_ms,
                        max_frame_time_ms = snapshot.max_frame_time_ms,
                        work_time_ms = snapshot.work_time_ms,
                        scene = name,
                        "loop_metrics"
                    );
                }
            }

            self.limiter.wait_for_next_frame();
        };

        if matches!(result, SceneResult::WindowClosed) {
            info!(scene = name, "window_closed");
        }
        info!(scene = name, result = ?result, "scene_finished");
        Ok(result)
    }

    /// Runs `start`, then asks `route` where to go after each scene that
    /// finishes with [`SceneResult::App`] or [`SceneResult::Error`]. `route`
    /// gets the finished scene's name and returns the next scene, or `None`
    /// to stop. A closed window ends the run. An error left unrouted comes
    /// back as [`WorldError::SceneFailed`].
    pub fn run<F>(&mut self, start: &str, mut route: F) -> Result<(), WorldError>
    where
        F: FnMut(&str, SceneResult<T>) -> Option<String>,
    {
        let mut name = start.to_string();
        loop {
            let result = self.run_scene(&name)?;
            let failed = matches!(result, SceneResult::Error);
            if matches!(result, SceneResult::WindowClosed | SceneResult::Continue) {
                return Ok(());
            }

            match route(&name, result) {
                Some(next) => {
                    debug!(from = name.as_str(), to = next.as_str(), failed, "scene_transition");
                    name = next;
                }
                None if failed => return Err(WorldError::SceneFailed { name }),
                None => return Ok(()),
            }
        }
    }

    fn create_scene(&mut self, name: &str) -> Result<Box<dyn Scene<T>>, WorldError> {
        debug!(scene = name, "scene_creating");
        let clock = Arc::clone(self.limiter.clock());
        let started = clock.now();

        let factory = self
            .scenes
            .factory_mut(name)
            .ok_or_else(|| WorldError::SceneNotFound {
                name: name.to_string(),
            })?;
        let scene = factory(self.host.canvas()).map_err(|source| WorldError::SceneCreation {
            name: name.to_string(),
            source,
        })?;

        debug!(
            scene = name,
            creation_ms = clock.elapsed_since(started).as_secs_f64() * 1000.0,
            "scene_created"
        );
        Ok(scene)
    }

    fn draw_frame(&mut self, scene: &mut dyn Scene<T>) {
        let canvas = self.host.canvas();
        if let Some(color) = self.config.clear_color {
            canvas.clear(color);
        }
        scene.draw(canvas);
    }

    fn metrics_interval(&self) -> Option<Duration> {
        match self.config.metrics_log_interval_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

impl<H, T> fmt::Debug for World<H, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("config", &self.config)
            .field("scenes", &self.scenes)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}
