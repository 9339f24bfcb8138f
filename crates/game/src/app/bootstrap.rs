use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;
use worldorder::{SceneRegistry, WorldConfig};

use super::config::{self, ConfigError, DemoConfig};
use super::scenes::{self, Session, SharedSession, Transition};

pub(crate) struct AppWiring {
    pub(crate) config: WorldConfig,
    pub(crate) scenes: SceneRegistry<Transition>,
    pub(crate) session: SharedSession,
    pub(crate) start: &'static str,
}

pub(crate) fn build_app() -> Result<AppWiring, ConfigError> {
    init_tracing();
    info!("=== World Order Demos Startup ===");

    let config = config::load_from_env()?;
    Ok(wire(config))
}

fn wire(config: DemoConfig) -> AppWiring {
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    info!(seed, start = config.start.scene_name(), "demo_session");

    let session = Rc::new(RefCell::new(Session::new(seed)));
    let scenes = scenes::build_registry(&session, config.swarm);

    AppWiring {
        config: config.world,
        scenes,
        session,
        start: config.start.scene_name(),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
