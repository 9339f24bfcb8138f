//! Small 2D game engine: a paced frame loop driving named scenes, and a
//! behavior-driven object model for the game logic inside them.

pub mod app;
pub mod canvas;
pub mod geom;
pub mod objects;
pub mod time;

#[cfg(test)]
mod testing;

pub use app::{
    Button, Host, HostError, Input, InputState, LoopMetricsSnapshot, MetricsHandle, Scene,
    SceneError, SceneFactory, SceneRegistry, SceneResult, WindowHost, World, WorldConfig,
    WorldError,
};
pub use canvas::{Canvas, Color, Drawable, ShapeDrawable};
pub use geom::{collision, deg_to_rad, fit, fit_at_zero, rad_to_deg, vec2, Affine, Rect, Vec2};
pub use objects::{
    Behavior, Behaviors, Layers, Object, ObjectHandle, ObjectId, ObjectSet, Objects, Reaction,
    TagIter,
};
pub use time::{Clock, FakeClock, FrameLimiter, SystemClock, Timestamp};
