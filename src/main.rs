use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use freelook::config::{CameraConfig, KeyBindings, WindowConfig};
use freelook::controller::platform::{self, WindowCursor};
use freelook::controller::{CursorMode, CursorTracker, FrameLoop};
use freelook::logging;
use freelook::view::{GpuContext, QuadRenderer};

#[derive(Parser)]
#[command(name = "freelook", about = "Free-look camera sandbox: hold the left mouse button, then WASD/Space/Shift and mouse")]
struct Cli {
    /// Window width in pixels
    #[arg(long, default_value_t = 600)]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 45.0)]
    fov: f32,

    /// Move with the arrow keys instead of WASD
    #[arg(long)]
    arrows: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

struct Graphics {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: QuadRenderer,
}

struct App {
    window_config: WindowConfig,
    camera_config: CameraConfig,
    frame_loop: Option<FrameLoop>,
    graphics: Option<Graphics>,
    cursor: CursorTracker,
    cursor_mode: Option<CursorMode>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(window_config: WindowConfig, camera_config: CameraConfig) -> Self {
        Self {
            window_config,
            camera_config,
            frame_loop: None,
            graphics: None,
            cursor: CursorTracker::new(),
            cursor_mode: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title(&self.window_config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.window_config.width,
                self.window_config.height,
            ));
        let window = Arc::new(event_loop.create_window(attributes)?);
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let gpu = pollster::block_on(GpuContext::new(&instance, window.clone(), size.width, size.height))?;

        // The projection is built once from the startup size and never rebuilt.
        let aspect = size.width as f32 / size.height.max(1) as f32;
        let frame_loop = FrameLoop::new(&self.camera_config, aspect)?;
        let renderer = QuadRenderer::new(&gpu, &frame_loop.camera().uniform());

        tracing::info!(width = size.width, height = size.height, "window ready");
        window.request_redraw();

        self.frame_loop = Some(frame_loop);
        self.graphics = Some(Graphics { window, gpu, renderer });
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("startup failed: {e:#}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let (Some(frame_loop), Some(graphics)) = (&mut self.frame_loop, &mut self.graphics) else {
            return;
        };

        if let Some(input_event) = platform::input_event_from_winit(&event) {
            frame_loop.input().process_event(&input_event);
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                graphics.gpu.resize(size.width, size.height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::RedrawRequested => {
                let uniform = {
                    let mut sink = WindowCursor::new(&graphics.window, &mut self.cursor_mode);
                    frame_loop.tick(self.cursor.position(), &mut sink)
                };
                self.cursor.set_captured(self.cursor_mode == Some(CursorMode::Captured));

                match graphics.renderer.render(&graphics.gpu, &uniform) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        graphics.gpu.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("GPU out of memory, exiting");
                        event_loop.exit();
                    }
                    Err(e) => tracing::warn!("surface error: {e}"),
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.cursor.on_raw_motion(delta.0, delta.1);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = &self.graphics {
            graphics.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(if cli.verbose { "debug" } else { "info" });
    tracing::info!("freelook starting");

    let window_config = WindowConfig {
        width: cli.width,
        height: cli.height,
        ..WindowConfig::default()
    };
    let camera_config = CameraConfig {
        fov_y: cli.fov.to_radians(),
        bindings: if cli.arrows { KeyBindings::arrows() } else { KeyBindings::default() },
        ..CameraConfig::default()
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(window_config, camera_config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
