use glam::{Quat, Vec3};

use crate::config::{CameraConfig, KeyBindings};
use crate::controller::input::{InputSource, MouseButton};
use crate::model::camera::{Camera, LookMode, MIN_UP_ANGLE, WORLD_UP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    /// Visible and free to leave the window.
    Normal,
    /// Hidden and locked to the window so motion is unbounded.
    Captured,
}

/// Receives cursor mode commands from the camera controller.
pub trait CursorModeSink {
    fn set_cursor_mode(&mut self, mode: CursorMode);
}

/// Handles camera movement and orientation
#[derive(Debug, Clone)]
pub struct CameraController {
    pub move_speed: f32,
    pub rotation_speed: f32,
    pub look_button: MouseButton,
    pub bindings: KeyBindings,
}

impl CameraController {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            move_speed: config.move_speed,
            rotation_speed: config.rotation_speed,
            look_button: config.look_button,
            bindings: config.bindings,
        }
    }

    /// Advance the camera by one frame.
    ///
    /// Nothing moves unless the look button is held. Matrices and the uniform
    /// are only rebuilt when the pose actually changed; returns whether it did.
    pub fn update<I, S>(&self, camera: &mut Camera, input: &I, cursor: &mut S) -> bool
    where
        I: InputSource + ?Sized,
        S: CursorModeSink + ?Sized,
    {
        if !input.is_mouse_button_pressed(self.look_button) {
            cursor.set_cursor_mode(CursorMode::Normal);
            self.set_look_mode(camera, LookMode::Inactive);
            return false;
        }
        cursor.set_cursor_mode(CursorMode::Captured);
        self.set_look_mode(camera, LookMode::Active);

        let moved = self.apply_movement(camera, input);
        let rotated = self.apply_look(camera, input);

        if moved || rotated {
            camera.refresh();
        }
        moved || rotated
    }

    fn set_look_mode(&self, camera: &mut Camera, mode: LookMode) {
        if camera.look_mode != mode {
            tracing::debug!(from = ?camera.look_mode, to = ?mode, "look mode changed");
            camera.look_mode = mode;
        }
    }

    fn apply_movement<I: InputSource + ?Sized>(&self, camera: &mut Camera, input: &I) -> bool {
        let right = camera.right();
        let b = &self.bindings;
        let axes = [
            (b.forward, camera.direction),
            (b.backward, -camera.direction),
            (b.right, right),
            (b.left, -right),
            (b.up, WORLD_UP),
            (b.down, -WORLD_UP),
        ];

        let start = camera.position;
        for (key, axis) in axes {
            if input.is_key_pressed(key) {
                camera.position += axis * self.move_speed;
            }
        }
        camera.position != start
    }

    fn apply_look<I: InputSource + ?Sized>(&self, camera: &mut Camera, input: &I) -> bool {
        let delta = input.mouse_delta();
        if delta == glam::Vec2::ZERO {
            return false;
        }

        let pitch = delta.y * self.rotation_speed;
        let yaw = delta.x * self.rotation_speed;
        let yaw_rot = Quat::from_axis_angle(WORLD_UP, -yaw);

        let right = camera.right();
        let rotated = if right == Vec3::ZERO {
            yaw_rot * camera.direction
        } else {
            let q = (Quat::from_axis_angle(right, -pitch) * yaw_rot).normalize();
            let candidate = (q * camera.direction).normalize();
            let near_pole = candidate.dot(WORLD_UP).abs() > MIN_UP_ANGLE.cos();
            // Yaw turns the right vector too, so compare against the turned one.
            let flipped = candidate.cross(WORLD_UP).dot(yaw_rot * right) <= 0.0;
            if near_pole || flipped {
                // Too close to vertical or over the top: keep the yaw, drop the pitch.
                yaw_rot * camera.direction
            } else {
                candidate
            }
        };

        let Some(direction) = rotated.try_normalize() else {
            return false;
        };
        let changed = direction != camera.direction;
        camera.direction = direction;
        changed
    }
}
