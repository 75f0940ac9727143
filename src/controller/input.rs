//! Platform-agnostic input handling system
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use glam::Vec2;

/// Keyboard keys the sandbox understands.
///
/// Kept independent of the windowing backend; see `controller::platform` for
/// the winit mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    ShiftLeft,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key { key: Key, pressed: bool },
    MouseButton { button: MouseButton, pressed: bool },
    FocusLost,
}

/// Point-in-time copy of everything the store tracks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub keys: HashMap<Key, bool>,
    pub mouse_buttons: HashMap<MouseButton, bool>,
    pub cursor_position: Vec2,
    pub previous_cursor_position: Vec2,
    cursor_sampled: bool,
}

impl InputSnapshot {
    pub fn mouse_delta(&self) -> Vec2 {
        self.cursor_position - self.previous_cursor_position
    }
}

/// Read side of the input state, as seen by the camera controller.
pub trait InputSource {
    fn is_key_pressed(&self, key: Key) -> bool;
    fn is_mouse_button_pressed(&self, button: MouseButton) -> bool;
    fn mouse_delta(&self) -> Vec2;
}

/// Shared input state store.
///
/// Event callbacks write key and button state as it arrives; the frame loop
/// calls [`InputStore::update_cursor_position`] exactly once per frame. The
/// mouse delta is the difference between the last two cursor samples and is
/// not reset when read, so it stays valid for the whole frame.
///
/// All access goes through an `RwLock`: any number of readers, one writer.
#[derive(Debug, Default)]
pub struct InputStore {
    state: RwLock<InputSnapshot>,
}

impl InputStore {
    pub fn new() -> Self {
        Self::default()
    }

    // The snapshot only holds flags and floats, so a poisoned lock still
    // guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, InputSnapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, InputSnapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_key(&self, key: Key, pressed: bool) {
        self.write().keys.insert(key, pressed);
    }

    pub fn set_mouse_button(&self, button: MouseButton, pressed: bool) {
        self.write().mouse_buttons.insert(button, pressed);
    }

    /// Shift the current cursor sample into the previous slot and store a new one.
    ///
    /// The very first sample seeds both slots so the initial delta is zero
    /// instead of a jump from the origin.
    pub fn update_cursor_position(&self, x: f32, y: f32) {
        let mut state = self.write();
        let position = Vec2::new(x, y);
        state.previous_cursor_position = if state.cursor_sampled {
            state.cursor_position
        } else {
            position
        };
        state.cursor_position = position;
        state.cursor_sampled = true;
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.read().keys.get(&key).copied().unwrap_or(false)
    }

    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.read().mouse_buttons.get(&button).copied().unwrap_or(false)
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.read().mouse_delta()
    }

    pub fn cursor_position(&self) -> Vec2 {
        self.read().cursor_position
    }

    pub fn snapshot(&self) -> InputSnapshot {
        self.read().clone()
    }

    /// Release every key and mouse button. Cursor samples are kept.
    pub fn clear(&self) {
        let mut state = self.write();
        state.keys.clear();
        state.mouse_buttons.clear();
    }

    /// Process an input event and update state
    pub fn process_event(&self, event: &InputEvent) {
        match *event {
            InputEvent::Key { key, pressed } => self.set_key(key, pressed),
            InputEvent::MouseButton { button, pressed } => self.set_mouse_button(button, pressed),
            InputEvent::FocusLost => {
                tracing::debug!("focus lost, releasing held input");
                self.clear();
            }
        }
    }
}

impl InputSource for InputStore {
    fn is_key_pressed(&self, key: Key) -> bool {
        InputStore::is_key_pressed(self, key)
    }

    fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        InputStore::is_mouse_button_pressed(self, button)
    }

    fn mouse_delta(&self) -> Vec2 {
        InputStore::mouse_delta(self)
    }
}

/// Latest OS cursor position, polled by the frame loop once per frame.
///
/// While the cursor is free it follows absolute cursor-moved positions. A
/// captured cursor stays put on screen, so raw motion deltas are integrated
/// into a virtual position instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorTracker {
    position: Vec2,
    captured: bool,
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        if !self.captured {
            self.position = Vec2::new(x as f32, y as f32);
        }
    }

    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        if self.captured {
            self.position += Vec2::new(dx as f32, dy as f32);
        }
    }

    pub fn set_captured(&mut self, captured: bool) {
        self.captured = captured;
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn unknown_keys_and_buttons_read_released() {
        let store = InputStore::new();
        assert!(!store.is_key_pressed(Key::W));
        assert!(!store.is_key_pressed(Key::ArrowLeft));
        assert!(!store.is_mouse_button_pressed(MouseButton::Left));
        assert!(!store.is_mouse_button_pressed(MouseButton::Other(7)));
    }

    #[test]
    fn last_write_wins() {
        let store = InputStore::new();
        store.set_key(Key::W, true);
        store.set_key(Key::W, true);
        assert!(store.is_key_pressed(Key::W));
        store.set_key(Key::W, false);
        assert!(!store.is_key_pressed(Key::W));

        store.set_mouse_button(MouseButton::Right, true);
        assert!(store.is_mouse_button_pressed(MouseButton::Right));
        assert!(!store.is_mouse_button_pressed(MouseButton::Left));
    }

    #[test]
    fn delta_between_two_samples() {
        let store = InputStore::new();
        store.update_cursor_position(5.0, 5.0);
        store.update_cursor_position(8.0, 9.0);
        assert_eq!(store.mouse_delta(), Vec2::new(3.0, 4.0));
        assert_eq!(store.cursor_position(), Vec2::new(8.0, 9.0));
    }

    #[test]
    fn first_sample_has_no_delta() {
        let store = InputStore::new();
        assert_eq!(store.mouse_delta(), Vec2::ZERO);
        store.update_cursor_position(300.0, 200.0);
        assert_eq!(store.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn delta_survives_repeated_reads() {
        let store = InputStore::new();
        store.update_cursor_position(0.0, 0.0);
        store.update_cursor_position(2.0, -1.0);
        assert_eq!(store.mouse_delta(), Vec2::new(2.0, -1.0));
        assert_eq!(store.mouse_delta(), Vec2::new(2.0, -1.0));

        // Same position polled on the next frame: no movement.
        store.update_cursor_position(2.0, -1.0);
        assert_eq!(store.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let store = InputStore::new();
        store.process_event(&InputEvent::Key { key: Key::D, pressed: true });
        store.process_event(&InputEvent::MouseButton { button: MouseButton::Left, pressed: true });
        store.update_cursor_position(10.0, 10.0);

        store.process_event(&InputEvent::FocusLost);

        assert!(!store.is_key_pressed(Key::D));
        assert!(!store.is_mouse_button_pressed(MouseButton::Left));
        assert_eq!(store.cursor_position(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn snapshot_is_detached() {
        let store = InputStore::new();
        store.set_key(Key::A, true);
        let snap = store.snapshot();
        store.set_key(Key::A, false);
        assert_eq!(snap.keys.get(&Key::A), Some(&true));
        assert!(!store.is_key_pressed(Key::A));
    }

    #[test]
    fn shared_between_threads() {
        let store = Arc::new(InputStore::new());
        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..100 {
                    store.set_key(Key::Space, i % 2 == 0);
                    store.update_cursor_position(i as f32, 0.0);
                }
            })
        };
        for _ in 0..100 {
            let _ = store.is_key_pressed(Key::Space);
            let _ = store.mouse_delta();
        }
        writer.join().unwrap();
        assert!(!store.is_key_pressed(Key::Space));
        assert_eq!(store.mouse_delta(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn tracker_follows_absolute_position_when_free() {
        let mut tracker = CursorTracker::new();
        tracker.on_cursor_moved(120.0, 80.0);
        tracker.on_raw_motion(50.0, 50.0);
        assert_eq!(tracker.position(), Vec2::new(120.0, 80.0));
    }

    #[test]
    fn tracker_integrates_motion_when_captured() {
        let mut tracker = CursorTracker::new();
        tracker.on_cursor_moved(100.0, 100.0);
        tracker.set_captured(true);
        tracker.on_raw_motion(3.0, -2.0);
        tracker.on_raw_motion(1.0, 1.0);
        tracker.on_cursor_moved(300.0, 300.0);
        assert_eq!(tracker.position(), Vec2::new(104.0, 99.0));
    }
}
