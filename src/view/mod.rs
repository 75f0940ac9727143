// VIEW: Rendering and graphics
pub mod render;
pub mod gpu_init;

pub use render::QuadRenderer;
pub use gpu_init::{GpuContext, GpuInitError};
