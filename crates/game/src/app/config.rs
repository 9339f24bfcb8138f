use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use worldorder::{Color, WorldConfig};

use super::scenes::{SwarmConfig, SCENE_PLAY, SCENE_SWARM, SCENE_TITLE};

pub(crate) const CONFIG_ENV_VAR: &str = "WORLDORDER_CONFIG";
pub(crate) const SEED_ENV_VAR: &str = "WORLDORDER_SEED";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DemoConfig {
    /// Fields given here replace those of [`demo_world`]; the rest keep it.
    #[serde(deserialize_with = "world_over_demo_defaults")]
    pub(crate) world: WorldConfig,
    pub(crate) start: StartScene,
    /// Overridden by `WORLDORDER_SEED`; random when neither is set.
    pub(crate) seed: Option<u64>,
    pub(crate) swarm: SwarmConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            world: demo_world(),
            start: StartScene::default(),
            seed: None,
            swarm: SwarmConfig::default(),
        }
    }
}

fn demo_world() -> WorldConfig {
    WorldConfig {
        title: "World Order Demos".to_string(),
        width: 640,
        height: 480,
        ..WorldConfig::default()
    }
}

/// The `world` table as written in the file; absent fields stay `None`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WorldOverrides {
    title: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    max_fps: Option<f64>,
    /// `Some(None)` for an explicit `null`, which turns clearing off.
    #[serde(deserialize_with = "present")]
    clear_color: Option<Option<Color>>,
    metrics_log_interval_ms: Option<u64>,
}

impl WorldOverrides {
    fn apply(self, mut world: WorldConfig) -> WorldConfig {
        if let Some(title) = self.title {
            world.title = title;
        }
        if let Some(width) = self.width {
            world.width = width;
        }
        if let Some(height) = self.height {
            world.height = height;
        }
        if let Some(max_fps) = self.max_fps {
            world.max_fps = max_fps;
        }
        if let Some(clear_color) = self.clear_color {
            world.clear_color = clear_color;
        }
        if let Some(interval) = self.metrics_log_interval_ms {
            world.metrics_log_interval_ms = interval;
        }
        world
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn world_over_demo_defaults<'de, D>(deserializer: D) -> Result<WorldConfig, D::Error>
where
    D: Deserializer<'de>,
{
    WorldOverrides::deserialize(deserializer).map(|overrides| overrides.apply(demo_world()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum StartScene {
    #[default]
    Title,
    Play,
    Swarm,
}

impl StartScene {
    pub(crate) fn scene_name(self) -> &'static str {
        match self {
            StartScene::Title => SCENE_TITLE,
            StartScene::Play => SCENE_PLAY,
            StartScene::Swarm => SCENE_SWARM,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path} at {field}: {source}")]
    Parse {
        path: String,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{var} must be an unsigned integer, got `{value}`")]
    InvalidSeed { var: &'static str, value: String },
}

/// Defaults unless `WORLDORDER_CONFIG` names a JSON file.
pub(crate) fn load_from_env() -> Result<DemoConfig, ConfigError> {
    let mut config = match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) => load_from_path(Path::new(&path))?,
        None => DemoConfig::default(),
    };
    if let Some(seed) = parse_seed(std::env::var(SEED_ENV_VAR).ok().as_deref())? {
        config.seed = Some(seed);
    }
    Ok(config)
}

pub(crate) fn load_from_path(path: &Path) -> Result<DemoConfig, ConfigError> {
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;
    parse_config(&raw).map_err(|error| {
        let field = error.path().to_string();
        ConfigError::Parse {
            path: display,
            field,
            source: error.into_inner(),
        }
    })
}

pub(crate) fn parse_config(
    raw: &str,
) -> Result<DemoConfig, serde_path_to_error::Error<serde_json::Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer)
}

fn parse_seed(raw: Option<&str>) -> Result<Option<u64>, ConfigError> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    raw.parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidSeed {
            var: SEED_ENV_VAR,
            value: raw.to_string(),
        })
}
