mod host;
pub(crate) mod input;
mod metrics;
mod scene;
mod window;
mod world;

pub use host::{Host, HostError};
pub use input::{Button, Input, InputState};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use scene::{Scene, SceneError, SceneFactory, SceneRegistry, SceneResult};
pub use window::WindowHost;
pub use world::{World, WorldConfig, WorldError};
