use glam::Vec3;

use crate::controller::input::{Key, MouseButton};

/// Key mapping configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyBindings {
    pub forward: Key,
    pub backward: Key,
    pub left: Key,
    pub right: Key,
    pub up: Key,
    pub down: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: Key::W,
            backward: Key::S,
            left: Key::A,
            right: Key::D,
            up: Key::Space,
            down: Key::ShiftLeft,
        }
    }
}

impl KeyBindings {
    /// Arrow keys for the horizontal axes, Space and Shift for vertical.
    pub fn arrows() -> Self {
        Self {
            forward: Key::ArrowUp,
            backward: Key::ArrowDown,
            left: Key::ArrowLeft,
            right: Key::ArrowRight,
            ..Self::default()
        }
    }

    pub fn keys(&self) -> [Key; 6] {
        [self.forward, self.backward, self.left, self.right, self.up, self.down]
    }
}

/// Everything the camera needs at construction. Fixed for the session.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub position: Vec3,
    pub direction: Vec3,
    /// World units per frame per held key. Not scaled by frame time.
    pub move_speed: f32,
    /// Radians per pixel of mouse movement.
    pub rotation_speed: f32,
    pub look_button: MouseButton,
    pub bindings: KeyBindings,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y: std::f32::consts::FRAC_PI_4,
            z_near: 1.0,
            z_far: 100.0,
            position: Vec3::new(0.0, 0.0, 3.0),
            direction: Vec3::new(0.0, 0.0, -1.0),
            move_speed: 0.1,
            rotation_speed: 0.002,
            look_button: MouseButton::Left,
            bindings: KeyBindings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "freelook".to_string(),
            width: 600,
            height: 600,
        }
    }
}

impl WindowConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cfg = CameraConfig::default();
        assert_eq!(cfg.position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(cfg.direction, Vec3::NEG_Z);
        assert_eq!(cfg.look_button, MouseButton::Left);
    }

    #[test]
    fn binding_sets_do_not_overlap() {
        for bindings in [KeyBindings::default(), KeyBindings::arrows()] {
            let keys = bindings.keys();
            for (i, a) in keys.iter().enumerate() {
                assert!(!keys[i + 1..].contains(a), "{a:?} bound twice");
            }
        }
        assert_eq!(KeyBindings::arrows().up, Key::Space);
    }

    #[test]
    fn aspect_ratio_never_divides_by_zero() {
        let cfg = WindowConfig { width: 800, height: 0, ..WindowConfig::default() };
        assert_eq!(cfg.aspect_ratio(), 800.0);
        assert_eq!(WindowConfig::default().aspect_ratio(), 1.0);
    }
}
