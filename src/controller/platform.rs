//! winit glue: event translation and the cursor mode sink.

use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window};

use crate::controller::camera_controller::{CursorMode, CursorModeSink};
use crate::controller::input::{InputEvent, Key, MouseButton};

pub fn key_from_winit(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::Space => Key::Space,
        KeyCode::ShiftLeft => Key::ShiftLeft,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        _ => return None,
    })
}

pub fn mouse_button_from_winit(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        winit::event::MouseButton::Back => MouseButton::Other(3),
        winit::event::MouseButton::Forward => MouseButton::Other(4),
        winit::event::MouseButton::Other(n) => MouseButton::Other(n),
    }
}

/// Translate a window event into a store mutation, if it is one.
///
/// Cursor movement is deliberately absent: the frame loop polls it.
pub fn input_event_from_winit(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput {
            event: KeyEvent { physical_key: PhysicalKey::Code(code), state, .. },
            ..
        } => key_from_winit(*code).map(|key| InputEvent::Key {
            key,
            pressed: *state == ElementState::Pressed,
        }),
        WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::MouseButton {
            button: mouse_button_from_winit(*button),
            pressed: *state == ElementState::Pressed,
        }),
        WindowEvent::Focused(false) => Some(InputEvent::FocusLost),
        _ => None,
    }
}

/// Applies cursor mode commands to a winit window, skipping repeats.
pub struct WindowCursor<'a> {
    window: &'a Window,
    current: &'a mut Option<CursorMode>,
}

impl<'a> WindowCursor<'a> {
    /// `current` persists the last applied mode across frames.
    pub fn new(window: &'a Window, current: &'a mut Option<CursorMode>) -> Self {
        Self { window, current }
    }
}

impl CursorModeSink for WindowCursor<'_> {
    fn set_cursor_mode(&mut self, mode: CursorMode) {
        if *self.current == Some(mode) {
            return;
        }
        match mode {
            CursorMode::Normal => {
                if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
                    tracing::warn!("failed to release cursor: {e}");
                }
                self.window.set_cursor_visible(true);
            }
            CursorMode::Captured => {
                // Not every platform supports locking; confinement is close enough.
                let grabbed = self.window
                    .set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
                if let Err(e) = grabbed {
                    tracing::warn!("failed to capture cursor: {e}");
                }
                self.window.set_cursor_visible(false);
            }
        }
        tracing::debug!(?mode, "cursor mode applied");
        *self.current = Some(mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_map() {
        assert_eq!(key_from_winit(KeyCode::KeyW), Some(Key::W));
        assert_eq!(key_from_winit(KeyCode::ShiftLeft), Some(Key::ShiftLeft));
        assert_eq!(key_from_winit(KeyCode::Space), Some(Key::Space));
        assert_eq!(key_from_winit(KeyCode::ArrowLeft), Some(Key::ArrowLeft));
        assert_eq!(key_from_winit(KeyCode::KeyZ), None);
        assert_eq!(key_from_winit(KeyCode::Escape), None);
    }

    #[test]
    fn mouse_buttons_map() {
        assert_eq!(mouse_button_from_winit(winit::event::MouseButton::Left), MouseButton::Left);
        assert_eq!(mouse_button_from_winit(winit::event::MouseButton::Other(9)), MouseButton::Other(9));
    }

    #[test]
    fn focus_loss_is_translated() {
        assert_eq!(input_event_from_winit(&WindowEvent::Focused(false)), Some(InputEvent::FocusLost));
        assert_eq!(input_event_from_winit(&WindowEvent::Focused(true)), None);
    }
}
