// MODEL: Camera state and GPU-facing data
pub mod camera;

pub use camera::{Camera, CameraError, CameraUniform, LookMode};
