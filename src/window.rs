//! Window and event loop.
//!
//! [`Viewer`] builds the scene, opens a window and drives one frame per
//! redraw:
//!
//! ```ignore
//! use orrery::prelude::*;
//!
//! Viewer::new(SceneConfig::default()).run()?;
//! ```
//!
//! Controls: WASD to move, mouse to look, wheel to zoom, Space to pause,
//! Escape to quit.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::KeyCode,
    window::{CursorGrabMode, Window, WindowId},
};

use crate::config::SceneConfig;
use crate::error::AppError;
use crate::frame::{FrameContext, Orrery};
use crate::gpu::{Camera, GpuState, Movement};
use crate::input::Input;
use crate::time::FrameTimer;

const MOVEMENT_KEYS: [(KeyCode, Movement); 4] = [
    (KeyCode::KeyW, Movement::Forward),
    (KeyCode::KeyS, Movement::Backward),
    (KeyCode::KeyA, Movement::Left),
    (KeyCode::KeyD, Movement::Right),
];

/// Interactive viewer for a scene.
///
/// Window size, camera and starting clock state all come from the
/// [`SceneConfig`].
pub struct Viewer {
    config: SceneConfig,
}

impl Viewer {
    pub fn new(config: SceneConfig) -> Self {
        Self { config }
    }

    /// Build the scene and run until the window is closed.
    ///
    /// Scene errors are reported before any window opens.
    pub fn run(self) -> Result<(), AppError> {
        let orrery = self.config.build()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(orrery, self.config);
        event_loop.run_app(&mut app)?;
        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct App {
    config: SceneConfig,
    orrery: Orrery,
    camera: Camera,
    input: Input,
    timer: FrameTimer,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    error: Option<AppError>,
}

impl App {
    fn new(orrery: Orrery, config: SceneConfig) -> Self {
        Self {
            camera: Camera::new(&config.camera),
            config,
            orrery,
            input: Input::new(),
            timer: FrameTimer::new(),
            window: None,
            gpu_state: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        grab_cursor(&window);

        let gpu_state = pollster::block_on(GpuState::new(window.clone(), self.orrery.bodies()))?;
        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        self.timer = FrameTimer::new();
        Ok(())
    }

    fn apply_input(&mut self, dt: f32) {
        if self.input.key_pressed(KeyCode::Space) {
            let clock = self.orrery.clock_mut();
            clock.toggle_pause();
            log::debug!(
                "Simulation {} at t = {:.2}s",
                if clock.is_paused() { "paused" } else { "resumed" },
                clock.elapsed()
            );
        }

        for (key, movement) in MOVEMENT_KEYS {
            if self.input.key_held(key) {
                self.camera.process_keyboard(movement, dt);
            }
        }

        let mouse = self.input.mouse_delta();
        self.camera.process_mouse(mouse.x, -mouse.y);
        self.camera.process_scroll(self.input.scroll_delta());
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.timer.tick();
        self.apply_input(dt);
        self.input.end_frame();

        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };

        gpu_state.set_view_proj(self.camera.view_proj(gpu_state.aspect()));
        let ctx = FrameContext {
            view_position: self.camera.position,
        };
        self.orrery.frame(dt, &ctx, gpu_state);

        match gpu_state.present() {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("{}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.input.handle_window_event(&event) {
            if self.input.key_pressed(KeyCode::Escape) {
                event_loop.exit();
            }
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::Focused(true) => {
                if let Some(window) = &self.window {
                    grab_cursor(window);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.input.handle_mouse_motion(dx, dy);
        }
    }
}

/// Hide the cursor and keep it in the window for mouse look.
fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(e) = grabbed {
        log::warn!("Could not grab cursor: {}", e);
    }
    window.set_cursor_visible(false);
}
