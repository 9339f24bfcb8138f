use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::app::input::BUTTON_COUNT;
use crate::app::{Button, InputState};
use crate::geom::{vec2, Vec2};

/// Folds window events into per-frame [`InputState`] snapshots. Press and
/// release edges last exactly one snapshot.
#[derive(Debug, Default)]
pub(crate) struct InputCollector {
    down: [bool; BUTTON_COUNT],
    pressed_edge: [bool; BUTTON_COUNT],
    released_edge: [bool; BUTTON_COUNT],
    repeated_edge: [bool; BUTTON_COUNT],
    cursor_position: Option<Vec2>,
    pending_scroll: Vec2,
    typed: String,
}

impl InputCollector {
    pub(crate) fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        if let Some(button) = button_for_key(key_event.physical_key) {
            self.handle_button_state(button, key_event.state, key_event.repeat);
        }
        if key_event.state == ElementState::Pressed {
            if let Some(text) = &key_event.text {
                self.push_typed(text);
            }
        }
    }

    pub(crate) fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        let button = match button {
            MouseButton::Left => Button::MouseLeft,
            MouseButton::Right => Button::MouseRight,
            _ => return,
        };
        self.handle_button_state(button, state, false);
    }

    pub(crate) fn handle_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        self.pending_scroll += scroll_from_delta(delta);
    }

    pub(crate) fn set_cursor_position(&mut self, position: Option<Vec2>) {
        self.cursor_position = position;
    }

    fn handle_button_state(&mut self, button: Button, state: ElementState, repeat: bool) {
        let index = button.index();
        match state {
            ElementState::Pressed => {
                if repeat {
                    self.repeated_edge[index] = true;
                } else if !self.down[index] {
                    self.pressed_edge[index] = true;
                }
                self.down[index] = true;
            }
            ElementState::Released => {
                if self.down[index] {
                    self.released_edge[index] = true;
                }
                self.down[index] = false;
            }
        }
    }

    fn push_typed(&mut self, text: &str) {
        self.typed
            .extend(text.chars().filter(|character| !character.is_control()));
    }

    pub(crate) fn snapshot_for_frame(&mut self) -> InputState {
        let snapshot = InputState {
            down: self.down,
            pressed: self.pressed_edge,
            released: self.released_edge,
            repeated: self.repeated_edge,
            mouse_position: self.cursor_position,
            scroll: self.pending_scroll,
            typed: std::mem::take(&mut self.typed),
        };
        self.pressed_edge = [false; BUTTON_COUNT];
        self.released_edge = [false; BUTTON_COUNT];
        self.repeated_edge = [false; BUTTON_COUNT];
        self.pending_scroll = Vec2::ZERO;
        snapshot
    }
}

fn button_for_key(key: PhysicalKey) -> Option<Button> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let button = match code {
        KeyCode::ArrowUp => Button::ArrowUp,
        KeyCode::ArrowDown => Button::ArrowDown,
        KeyCode::ArrowLeft => Button::ArrowLeft,
        KeyCode::ArrowRight => Button::ArrowRight,
        KeyCode::KeyW => Button::KeyW,
        KeyCode::KeyA => Button::KeyA,
        KeyCode::KeyS => Button::KeyS,
        KeyCode::KeyD => Button::KeyD,
        KeyCode::Space => Button::Space,
        KeyCode::Enter | KeyCode::NumpadEnter => Button::Enter,
        KeyCode::Escape => Button::Escape,
        _ => return None,
    };
    Some(button)
}

/// Lines per axis; pixel deltas count as one line in their direction.
fn scroll_from_delta(delta: MouseScrollDelta) -> Vec2 {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => vec2(x as f64, y as f64),
        MouseScrollDelta::PixelDelta(position) => vec2(step(position.x), step(position.y)),
    }
}

fn step(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
