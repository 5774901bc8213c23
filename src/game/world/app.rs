use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::engine::graphics::renderer::{Frame, Renderer};
use crate::engine::graphics::screenshot;
use crate::engine::input::{Command, InputHandler};
use crate::engine::window::WindowManager;
use crate::error::Error;
use crate::game::player::Controller;
use crate::game::state::{hud, BannerKind, GameState};
use crate::game::world::scene::{Scene, SceneKind};

const SCREENSHOT_BANNER_SECONDS: f32 = 2.0;
/// Longest step a single frame may advance the simulation by.
const MAX_FRAME_SECONDS: f32 = 0.1;

/// Seconds between two frames, capped so stalls do not teleport anything.
fn frame_delta(elapsed: Duration) -> f32 {
    elapsed.as_secs_f32().min(MAX_FRAME_SECONDS)
}

/// Surface and renderer, alive once the window exists.
struct Gpu {
    surface: wgpu::Surface<'static>,
    renderer: Renderer,
}

pub struct App {
    window_manager: WindowManager,
    gpu: Option<Gpu>,
    scene: Scene,
    controller: Controller,
    input_handler: InputHandler,
    state: GameState,
    start: Instant,
    last_frame: Instant,
    screenshot_requested: bool,
}

impl App {
    pub fn new(kind: SceneKind) -> Self {
        let now = Instant::now();
        Self {
            window_manager: WindowManager::new(),
            gpu: None,
            scene: Scene::build(kind),
            controller: Controller::for_scene(kind),
            input_handler: InputHandler::new(),
            state: GameState::new(),
            start: now,
            last_frame: now,
            screenshot_requested: false,
        }
    }

    async fn init_wgpu(window: Arc<Window>) -> Result<Gpu, Error> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(Error::NoAdapter)?;
        info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: adapter.features() & wgpu::Features::POLYGON_MODE_LINE,
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        let renderer = Renderer::new(device, queue, &surface, &adapter, size);
        Ok(Gpu { surface, renderer })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.input_handler.set_window_height(new_size.height);
        if let Some(gpu) = &mut self.gpu {
            gpu.renderer.resize(new_size, &gpu.surface);
        }
    }

    fn handle_command(&mut self, command: Command, event_loop: &ActiveEventLoop) {
        match command {
            Command::Quit => {
                info!("Exiting");
                event_loop.exit();
            }
            Command::Screenshot => self.screenshot_requested = true,
            Command::ToggleFullscreen => {
                let fullscreen = self.state.toggle_fullscreen();
                self.window_manager.set_fullscreen(fullscreen);
            }
            Command::ToggleMouseLock => {
                let locked = self.state.toggle_mouse_lock();
                self.window_manager.set_cursor_locked(locked);
            }
            Command::SetRenderMode(mode) => self.state.set_render_mode(mode),
            Command::Primary => self.controller.primary(&self.scene, &mut self.state),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = frame_delta(now.duration_since(self.last_frame));
        self.last_frame = now;
        let elapsed = now.duration_since(self.start).as_secs_f32();

        self.controller.update(&mut self.input_handler, dt, elapsed);
        self.scene.animate(elapsed);
        if let Some(fps) = self.state.tick(dt) {
            debug!("FPS: {}", fps);
        }

        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let hud = self.state.hud(&self.scene.hud);
        let overlay = gpu
            .renderer
            .prepare_overlay(self.window_manager.scale_factor(), |ctx| hud::draw(ctx, &hud));

        let mut draws = self.scene.draw_list();
        if let Some(avatar) = self.controller.avatar() {
            draws.push(avatar.primitive, avatar.instance());
        }
        let camera = self.controller.camera();
        let frame = Frame {
            globals: self
                .scene
                .lighting
                .globals(camera.view_proj(gpu.renderer.aspect()), camera.position),
            draws: &draws,
            clear_color: self.scene.lighting.sky.0,
            mode: self.state.render_mode,
            overlay: Some(&overlay),
        };

        match gpu.renderer.render(&gpu.surface, &frame) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                gpu.renderer.reconfigure(&gpu.surface);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("{}", Error::Surface(wgpu::SurfaceError::OutOfMemory));
                event_loop.exit();
                return;
            }
            Err(e) => warn!("Render error: {:?}", e),
        }

        if std::mem::take(&mut self.screenshot_requested) {
            let name = screenshot::timestamped_file_name(self.scene.screenshot_prefix);
            let result = gpu
                .renderer
                .capture(&frame)
                .and_then(|image| screenshot::save(&image, &name));
            match result {
                Ok(()) => self.state.show(
                    BannerKind::Notice,
                    format!("Screenshot saved: {name}"),
                    SCREENSHOT_BANNER_SECONDS,
                ),
                Err(e) => {
                    error!("Screenshot failed: {}", e);
                    self.state
                        .show(BannerKind::Failure, "Screenshot failed", SCREENSHOT_BANNER_SECONDS);
                }
            }
        }

        self.window_manager.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        let window = match self.window_manager.create_window(event_loop, self.scene.title) {
            Ok(window) => window,
            Err(e) => {
                error!("{}", e);
                event_loop.exit();
                return;
            }
        };
        self.input_handler.set_window_height(window.inner_size().height);

        match pollster::block_on(Self::init_wgpu(window)) {
            Ok(gpu) => {
                self.state.wireframe_fallback = !gpu.renderer.supports_wireframe();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                error!("{}", e);
                event_loop.exit();
                return;
            }
        }

        self.controller.reset_preset(&self.scene, &mut self.state);
        if self.controller.locks_cursor_by_default() {
            self.state.mouse_locked = true;
            self.window_manager.set_cursor_locked(true);
        }
        info!(
            "{}: {} props, {} animated",
            self.scene.title,
            self.scene.props.len(),
            self.scene.animated_count()
        );
        // Startup time is not part of the first frame.
        self.last_frame = Instant::now();
        self.window_manager.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical_size) => self.resize(physical_size),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    let pressed = event.state == ElementState::Pressed;
                    if let Some(command) = self.input_handler.handle_keyboard_input_event(keycode, pressed) {
                        self.handle_command(command, event_loop);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input_handler
                    .handle_mouse_button(button, state == ElementState::Pressed);
            }
            WindowEvent::Focused(focused) => {
                self.input_handler.set_focused(focused);
                if self.state.mouse_locked {
                    self.window_manager
                        .set_cursor_locked(self.state.cursor_grab_for_focus(focused));
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: winit::event::DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input_handler.handle_mouse_motion(delta);
        }
    }
}

/// Opens a window on `kind` and runs until it closes.
pub fn run(kind: SceneKind) -> Result<(), Error> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(kind);
    event_loop.run_app(&mut app)?;
    Ok(())
}
