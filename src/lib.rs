//! Minimal rendering sandbox built around a free-look camera.
//!
//! Input events land in a shared [`controller::InputStore`]; once per frame the
//! [`controller::FrameLoop`] samples the cursor, lets the
//! [`controller::CameraController`] move the [`model::Camera`], and hands the
//! packed [`model::CameraUniform`] to the renderer.

pub mod config;
pub mod logging;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;
