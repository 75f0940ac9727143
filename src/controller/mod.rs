// CONTROLLER: Input, camera control, and update loop
pub mod input;
pub mod camera_controller;
pub mod frame_loop;
#[cfg(not(target_arch = "wasm32"))]
pub mod platform;

pub use input::{CursorTracker, InputEvent, InputSnapshot, InputSource, InputStore, Key, MouseButton};
pub use camera_controller::{CameraController, CursorMode, CursorModeSink};
pub use frame_loop::FrameLoop;
