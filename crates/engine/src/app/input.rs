use crate::geom::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    Space,
    Enter,
    Escape,
    MouseLeft,
    MouseRight,
}

pub(crate) const BUTTON_COUNT: usize = 13;

impl Button {
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::ArrowUp,
        Button::ArrowDown,
        Button::ArrowLeft,
        Button::ArrowRight,
        Button::KeyW,
        Button::KeyA,
        Button::KeyS,
        Button::KeyD,
        Button::Space,
        Button::Enter,
        Button::Escape,
        Button::MouseLeft,
        Button::MouseRight,
    ];

    pub(crate) const fn index(self) -> usize {
        match self {
            Button::ArrowUp => 0,
            Button::ArrowDown => 1,
            Button::ArrowLeft => 2,
            Button::ArrowRight => 3,
            Button::KeyW => 4,
            Button::KeyA => 5,
            Button::KeyS => 6,
            Button::KeyD => 7,
            Button::Space => 8,
            Button::Enter => 9,
            Button::Escape => 10,
            Button::MouseLeft => 11,
            Button::MouseRight => 12,
        }
    }
}

/// Per-frame input as seen by a scene. "Just" queries cover the events
/// collected since the previous frame.
pub trait Input {
    fn pressed(&self, button: Button) -> bool;

    fn just_pressed(&self, button: Button) -> bool;

    fn just_released(&self, button: Button) -> bool;

    /// Key repeat fired by the platform while the button is held.
    fn repeated(&self, button: Button) -> bool;

    /// Canvas coordinates, `None` while the cursor is outside the window.
    fn mouse_position(&self) -> Option<Vec2>;

    fn mouse_scroll(&self) -> Vec2;

    /// Text typed since the previous frame.
    fn typed(&self) -> &str;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub(crate) down: [bool; BUTTON_COUNT],
    pub(crate) pressed: [bool; BUTTON_COUNT],
    pub(crate) released: [bool; BUTTON_COUNT],
    pub(crate) repeated: [bool; BUTTON_COUNT],
    pub(crate) mouse_position: Option<Vec2>,
    pub(crate) scroll: Vec2,
    pub(crate) typed: String,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_down(mut self, button: Button) -> Self {
        self.down[button.index()] = true;
        self
    }

    /// Marks `button` as held and pressed this frame.
    pub fn with_just_pressed(mut self, button: Button) -> Self {
        self.down[button.index()] = true;
        self.pressed[button.index()] = true;
        self
    }

    pub fn with_just_released(mut self, button: Button) -> Self {
        self.down[button.index()] = false;
        self.released[button.index()] = true;
        self
    }

    pub fn with_repeated(mut self, button: Button) -> Self {
        self.down[button.index()] = true;
        self.repeated[button.index()] = true;
        self
    }

    pub fn with_mouse_position(mut self, position: Vec2) -> Self {
        self.mouse_position = Some(position);
        self
    }

    pub fn with_scroll(mut self, scroll: Vec2) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn with_typed(mut self, text: impl Into<String>) -> Self {
        self.typed = text.into();
        self
    }
}

impl Input for InputState {
    fn pressed(&self, button: Button) -> bool {
        self.down[button.index()]
    }

    fn just_pressed(&self, button: Button) -> bool {
        self.pressed[button.index()]
    }

    fn just_released(&self, button: Button) -> bool {
        self.released[button.index()]
    }

    fn repeated(&self, button: Button) -> bool {
        self.repeated[button.index()]
    }

    fn mouse_position(&self) -> Option<Vec2> {
        self.mouse_position
    }

    fn mouse_scroll(&self) -> Vec2 {
        self.scroll
    }

    fn typed(&self) -> &str {
        &self.typed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::vec2;

    #[test]
    fn button_indices_are_unique_and_dense() {
        let mut seen = [false; BUTTON_COUNT];
        for button in Button::ALL {
            assert!(!seen[button.index()], "{button:?} shares an index");
            seen[button.index()] = true;
        }
        assert!(seen.iter().all(|&hit| hit));
    }

    #[test]
    fn just_pressed_implies_pressed() {
        let input = InputState::new().with_just_pressed(Button::Space);
        assert!(input.pressed(Button::Space));
        assert!(input.just_pressed(Button::Space));
        assert!(!input.just_pressed(Button::Enter));
    }

    #[test]
    fn just_released_clears_down() {
        let input = InputState::new()
            .with_down(Button::KeyA)
            .with_just_released(Button::KeyA);
        assert!(!input.pressed(Button::KeyA));
        assert!(input.just_released(Button::KeyA));
    }

    #[test]
    fn pointer_and_text_queries() {
        let input = InputState::new()
            .with_mouse_position(vec2(3.0, 4.0))
            .with_scroll(vec2(0.0, -1.0))
            .with_typed("hi");
        assert_eq!(input.mouse_position(), Some(vec2(3.0, 4.0)));
        assert_eq!(input.mouse_scroll(), vec2(0.0, -1.0));
        assert_eq!(input.typed(), "hi");
        assert_eq!(InputState::new().mouse_position(), None);
    }
}
