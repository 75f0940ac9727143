use std::sync::Arc;

use glam::Vec2;

use crate::config::CameraConfig;
use crate::controller::camera_controller::{CameraController, CursorModeSink};
use crate::controller::input::{InputStore, Key};
use crate::model::camera::{Camera, CameraError, CameraUniform};

/// Per-frame sequencing of the camera core.
///
/// Owns the camera and hands out the shared input store to whoever feeds it
/// events. [`FrameLoop::tick`] samples the cursor, updates the camera and
/// returns the uniform to upload, in that order.
pub struct FrameLoop {
    input: Arc<InputStore>,
    camera: Camera,
    camera_controller: CameraController,
    frame: u64,
}

impl FrameLoop {
    pub fn new(config: &CameraConfig, aspect: f32) -> Result<Self, CameraError> {
        Ok(Self {
            input: Arc::new(InputStore::new()),
            camera: Camera::new(config, aspect)?,
            camera_controller: CameraController::new(config),
            frame: 0,
        })
    }

    pub fn input(&self) -> Arc<InputStore> {
        Arc::clone(&self.input)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Run one frame of the camera core and return the uniform for upload.
    pub fn tick<S>(&mut self, cursor_position: Vec2, cursor: &mut S) -> CameraUniform
    where
        S: CursorModeSink + ?Sized,
    {
        self.input.update_cursor_position(cursor_position.x, cursor_position.y);

        let changed = self.camera_controller.update(&mut self.camera, self.input.as_ref(), cursor);
        if changed && tracing::enabled!(tracing::Level::TRACE) {
            let held = self.held_keys();
            tracing::trace!(
                frame = self.frame,
                position = ?self.camera.position(),
                direction = ?self.camera.direction(),
                ?held,
                "camera moved"
            );
        }

        self.frame += 1;
        self.camera.uniform()
    }

    /// Bound keys currently held, read from one consistent snapshot.
    pub fn held_keys(&self) -> Vec<Key> {
        let snapshot = self.input.snapshot();
        self.camera_controller
            .bindings
            .keys()
            .into_iter()
            .filter(|key| snapshot.keys.get(key).copied().unwrap_or(false))
            .collect()
    }
}
