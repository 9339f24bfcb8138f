use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;

use crate::canvas::Canvas;

use super::Input;

/// Outcome of one [`Scene::update`]. Anything but `Continue` ends the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneResult<T> {
    Continue,
    /// The scene hit a condition it cannot recover from.
    Error,
    WindowClosed,
    /// Application-defined transition code.
    App(T),
}

impl<T> SceneResult<T> {
    pub fn is_continue(&self) -> bool {
        matches!(self, SceneResult::Continue)
    }
}

pub trait Scene<T> {
    fn update(&mut self, dt: f64, input: &dyn Input) -> SceneResult<T>;

    fn draw(&mut self, canvas: &mut dyn Canvas);
}

/// Failure reported by a scene factory.
#[derive(Debug)]
pub struct SceneError {
    inner: Box<dyn StdError + Send + Sync>,
}

impl SceneError {
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Box::new(error),
        }
    }

    pub fn msg(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self {
            inner: message.into(),
        }
    }
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl StdError for SceneError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source()
    }
}

pub type SceneFactory<T> =
    Box<dyn FnMut(&mut dyn Canvas) -> Result<Box<dyn Scene<T>>, SceneError>>;

/// Scene factories by name. A factory runs every time its scene starts, so
/// each run gets fresh state.
pub struct SceneRegistry<T> {
    factories: HashMap<String, SceneFactory<T>>,
}

impl<T: 'static> SceneRegistry<T> {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Replaces any factory already registered under `name`.
    pub fn register<S, F>(&mut self, name: impl Into<String>, mut factory: F) -> &mut Self
    where
        S: Scene<T> + 'static,
        F: FnMut(&mut dyn Canvas) -> Result<S, SceneError> + 'static,
    {
        self.factories.insert(
            name.into(),
            Box::new(move |canvas: &mut dyn Canvas| {
                factory(canvas).map(|scene| Box::new(scene) as Box<dyn Scene<T>>)
            }),
        );
        self
    }

    pub fn with<S, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        S: Scene<T> + 'static,
        F: FnMut(&mut dyn Canvas) -> Result<S, SceneError> + 'static,
    {
        self.register(name, factory);
        self
    }
}

impl<T> SceneRegistry<T> {
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub(crate) fn factory_mut(&mut self, name: &str) -> Option<&mut SceneFactory<T>> {
        self.factories.get_mut(name)
    }
}

impl<T: 'static> Default for SceneRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SceneRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("SceneRegistry")
            .field("scenes", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::app::InputState;
    use crate::testing::RecordingCanvas;

    struct Fixed(SceneResult<u8>);

    impl Scene<u8> for Fixed {
        fn update(&mut self, _dt: f64, _input: &dyn Input) -> SceneResult<u8> {
            self.0
        }

        fn draw(&mut self, _canvas: &mut dyn Canvas) {}
    }

    #[test]
    fn only_continue_keeps_running() {
        assert!(SceneResult::<u8>::Continue.is_continue());
        assert!(!SceneResult::<u8>::Error.is_continue());
        assert!(!SceneResult::<u8>::WindowClosed.is_continue());
        assert!(!SceneResult::App(0u8).is_continue());
    }

    #[test]
    fn registered_factory_builds_fresh_scenes() {
        let mut registry = SceneRegistry::<u8>::new();
        registry.register("fixed", |_canvas: &mut dyn Canvas| Ok(Fixed(SceneResult::App(7))));
        let mut canvas = RecordingCanvas::new(10.0, 10.0);

        let factory = registry.factory_mut("fixed").expect("factory");
        let mut scene = factory(&mut canvas).expect("scene");

        assert_eq!(scene.update(0.0, &InputState::new()), SceneResult::App(7));
        assert!(registry.contains("fixed"));
        assert!(registry.factory_mut("missing").is_none());
    }

    #[test]
    fn register_replaces_existing_name() {
        let registry = SceneRegistry::<u8>::new()
            .with("a", |_canvas: &mut dyn Canvas| Ok(Fixed(SceneResult::Continue)))
            .with("a", |_canvas: &mut dyn Canvas| Ok(Fixed(SceneResult::Error)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn scene_error_displays_inner_message() {
        let error = SceneError::msg("missing level");
        assert_eq!(error.to_string(), "missing level");

        let wrapped = SceneError::new(io::Error::new(io::ErrorKind::NotFound, "level.json"));
        assert_eq!(wrapped.to_string(), "level.json");
    }
}
