//! Platform-agnostic input system
//!
//! Defines input types and state containers that do not depend on any GUI library.
//! Concrete platform adapters (the winit adapter in [`crate::app::winit`]) are
//! responsible for translating platform events into these types.

use glam::Vec2;
use rustc_hash::FxHashSet;

/// Keyboard keys the application reacts to (platform-agnostic).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    // Movement and toggles
    A,
    D,
    O,
    R,
    S,
    W,

    // Number keys
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,

    // Function keys
    F1,
    F2,
    F12,

    // Control keys
    Space,
    Escape,

    // Modifier keys
    ShiftLeft,
    ControlLeft,

    // Punctuation
    Minus,
    Equal,

    // Numpad
    NumpadAdd,
    NumpadSubtract,
}

/// Mouse button enumeration
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Button state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Platform-agnostic input state container
#[derive(Debug, Clone)]
pub struct Input {
    // Keyboard state
    pressed_keys: FxHashSet<Key>,
    just_pressed_keys: FxHashSet<Key>,

    // Mouse button state
    pressed_mouse: FxHashSet<MouseButton>,
    just_pressed_mouse: FxHashSet<MouseButton>,

    // Cursor position in physical pixels
    mouse_position: Vec2,

    // Raster size in physical pixels
    screen_size: Vec2,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pressed_keys: FxHashSet::default(),
            just_pressed_keys: FxHashSet::default(),
            pressed_mouse: FxHashSet::default(),
            just_pressed_mouse: FxHashSet::default(),
            mouse_position: Vec2::ZERO,
            screen_size: Vec2::ZERO,
        }
    }

    // ========== System API (called by Engine/Adapter) ==========

    /// Clears transient state at the start of each frame
    pub fn start_frame(&mut self) {
        self.just_pressed_keys.clear();
        self.just_pressed_mouse.clear();
    }

    /// Injects a keyboard event
    pub fn inject_key(&mut self, key: Key, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                if self.pressed_keys.insert(key) {
                    self.just_pressed_keys.insert(key);
                }
            }
            ButtonState::Released => {
                self.pressed_keys.remove(&key);
            }
        }
    }

    /// Injects a mouse button event
    pub fn inject_mouse_button(&mut self, button: MouseButton, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                if self.pressed_mouse.insert(button) {
                    self.just_pressed_mouse.insert(button);
                }
            }
            ButtonState::Released => {
                self.pressed_mouse.remove(&button);
            }
        }
    }

    /// Injects a cursor position update
    pub fn inject_mouse_position(&mut self, x: f32, y: f32) {
        self.mouse_position = Vec2::new(x, y);
    }

    /// Injects a window resize event
    pub fn inject_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    // ========== User API ==========

    /// Checks whether a key is currently held down
    #[must_use]
    pub fn get_key(&self, key: Key) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Checks whether a key was just pressed this frame
    #[must_use]
    pub fn get_key_down(&self, key: Key) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    /// Checks whether a mouse button is currently held down
    #[must_use]
    pub fn get_mouse_button(&self, button: MouseButton) -> bool {
        self.pressed_mouse.contains(&button)
    }

    /// Checks whether a mouse button was just pressed this frame
    #[must_use]
    pub fn get_mouse_button_down(&self, button: MouseButton) -> bool {
        self.just_pressed_mouse.contains(&button)
    }

    /// Returns the current mouse position
    #[must_use]
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Returns the window dimensions
    #[must_use]
    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_is_reported_for_one_frame_only() {
        let mut input = Input::new();
        input.inject_key(Key::R, ButtonState::Pressed);
        assert!(input.get_key_down(Key::R));
        assert!(input.get_key(Key::R));

        input.start_frame();
        assert!(!input.get_key_down(Key::R));
        assert!(input.get_key(Key::R));
    }

    #[test]
    fn repeated_press_does_not_retrigger() {
        let mut input = Input::new();
        input.inject_key(Key::O, ButtonState::Pressed);
        input.start_frame();
        // OS key repeat delivers another Pressed without a Released
        input.inject_key(Key::O, ButtonState::Pressed);
        assert!(!input.get_key_down(Key::O));
    }

    #[test]
    fn release_clears_held_state() {
        let mut input = Input::new();
        input.inject_mouse_button(MouseButton::Left, ButtonState::Pressed);
        input.inject_mouse_button(MouseButton::Left, ButtonState::Released);
        assert!(!input.get_mouse_button(MouseButton::Left));
        assert!(input.get_mouse_button_down(MouseButton::Left));
    }
}
