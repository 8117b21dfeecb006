//! Winit input adapter
//!
//! Translates winit window events into the platform-agnostic [`Input`].

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::resources::input::{ButtonState, Input, Key, MouseButton};

/// Maps the keys the demo binds; everything else is ignored.
#[must_use]
pub fn translate_key(physical_key: PhysicalKey) -> Option<Key> {
    let PhysicalKey::Code(code) = physical_key else {
        return None;
    };

    let key = match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyW => Key::W,

        KeyCode::Digit0 | KeyCode::Numpad0 => Key::Key0,
        KeyCode::Digit1 | KeyCode::Numpad1 => Key::Key1,
        KeyCode::Digit2 | KeyCode::Numpad2 => Key::Key2,
        KeyCode::Digit3 | KeyCode::Numpad3 => Key::Key3,
        KeyCode::Digit4 | KeyCode::Numpad4 => Key::Key4,

        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F12 => Key::F12,

        KeyCode::Space => Key::Space,
        KeyCode::Escape => Key::Escape,
        KeyCode::ShiftLeft => Key::ShiftLeft,
        KeyCode::ControlLeft => Key::ControlLeft,

        KeyCode::Minus => Key::Minus,
        KeyCode::Equal => Key::Equal,
        KeyCode::NumpadAdd => Key::NumpadAdd,
        KeyCode::NumpadSubtract => Key::NumpadSubtract,

        _ => return None,
    };

    Some(key)
}

#[must_use]
pub fn translate_mouse_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        winit::event::MouseButton::Back => MouseButton::Other(3),
        winit::event::MouseButton::Forward => MouseButton::Other(4),
        winit::event::MouseButton::Other(id) => MouseButton::Other(id),
    }
}

#[must_use]
pub fn translate_element_state(state: ElementState) -> ButtonState {
    match state {
        ElementState::Pressed => ButtonState::Pressed,
        ElementState::Released => ButtonState::Released,
    }
}

/// Feeds one window event into `input`.
pub fn process_window_event(input: &mut Input, event: &WindowEvent) {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            if event.repeat {
                return;
            }
            if let Some(key) = translate_key(event.physical_key) {
                input.inject_key(key, translate_element_state(event.state));
            }
        }

        WindowEvent::CursorMoved { position, .. } => {
            input.inject_mouse_position(position.x as f32, position.y as f32);
        }

        WindowEvent::MouseInput { state, button, .. } => {
            input.inject_mouse_button(translate_mouse_button(*button), translate_element_state(*state));
        }

        WindowEvent::Resized(size) => {
            input.inject_resize(size.width, size.height);
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_and_numpad_share_debug_keys() {
        assert_eq!(translate_key(PhysicalKey::Code(KeyCode::Digit3)), Some(Key::Key3));
        assert_eq!(translate_key(PhysicalKey::Code(KeyCode::Numpad3)), Some(Key::Key3));
        assert_eq!(translate_key(PhysicalKey::Code(KeyCode::KeyQ)), None);
    }

    #[test]
    fn extra_mouse_buttons_map_to_other() {
        assert_eq!(translate_mouse_button(winit::event::MouseButton::Back), MouseButton::Other(3));
        assert_eq!(translate_mouse_button(winit::event::MouseButton::Left), MouseButton::Left);
    }
}
