//! Simulation builder and runner

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::canvas::Canvas;
use crate::error::AppError;
use crate::gpu::GpuState;
use crate::panel::{settings_panel, PanelAction, PanelState};
use crate::scene::draw_world;
use crate::settings::Settings;
use crate::time::FrameClock;
use crate::world::World;

const DEFAULT_TITLE: &str = "ballbox";
const DEFAULT_WINDOW_SIZE: (u32, u32) = (1100, 1050);

/// The demo, configured through method chaining.
///
/// ```ignore
/// Simulation::new()
///     .with_settings(Settings { gravity: 4.0, ..Settings::default() })
///     .with_seed(7)
///     .run()?;
/// ```
pub struct Simulation {
    settings: Settings,
    seed: Option<u64>,
    window_size: (u32, u32),
    title: String,
}

impl Simulation {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            seed: None,
            window_size: DEFAULT_WINDOW_SIZE,
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Initial panel values.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings.clamped();
        self
    }

    /// Seed ball colors so runs look the same.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Build the world this simulation starts with.
    pub fn build_world(&self) -> World {
        match self.seed {
            Some(seed) => World::with_seed(self.settings, seed),
            None => World::new(self.settings),
        }
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    config: Simulation,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    world: World,
    canvas: Canvas,
    panel: PanelState,
    clock: FrameClock,
    /// Startup failure, reported once the loop exits.
    error: Option<AppError>,
}

impl App {
    fn new(config: Simulation) -> Self {
        let world = config.build_world();
        let panel = PanelState::new(*world.settings());
        Self {
            config,
            window: None,
            gpu_state: None,
            world,
            canvas: Canvas::new(0, 0),
            panel,
            clock: FrameClock::new(),
            error: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu_state = pollster::block_on(GpuState::new(window.clone()))?;

        let (width, height) = canvas_size(window.inner_size(), window.scale_factor());
        self.canvas.resize(width, height);
        log::info!(
            "Window ready ({}x{} points, scale {})",
            width,
            height,
            window.scale_factor()
        );
        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    /// Follow the window after a resize or a DPI change.
    fn resize_canvas(&mut self, physical_size: PhysicalSize<u32>, scale_factor: f64) {
        let (width, height) = canvas_size(physical_size, scale_factor);
        if width > 0 && height > 0 && (width, height) != (self.canvas.width(), self.canvas.height()) {
            self.canvas.resize(width, height);
        }
    }

    fn apply(&mut self, action: PanelAction) {
        apply_action(&mut self.world, action);
        self.panel.settings = *self.world.settings();
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match event.physical_key {
            PhysicalKey::Code(KeyCode::Space) => self.apply(PanelAction::ToggleRunning),
            PhysicalKey::Code(KeyCode::KeyR) => self.apply(PanelAction::Reset),
            PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.clone() else {
            return;
        };
        if self.gpu_state.is_none() {
            return;
        }

        let dt = self.clock.tick();
        self.world.sync_settings();
        self.world.step(dt);

        self.panel.running = self.world.is_running();
        self.panel.fps = self.clock.fps();

        let (actions, ui) = match &mut self.gpu_state {
            Some(gpu_state) => {
                gpu_state.egui.begin_frame(&window);
                let actions = settings_panel(&gpu_state.egui.ctx, &mut self.panel);
                (actions, gpu_state.egui.end_frame(&window))
            }
            None => return,
        };

        apply_and_draw(&mut self.world, &mut self.canvas, actions);
        self.panel.settings = *self.world.settings();

        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };
        match gpu_state.render(&self.canvas, &ui) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

fn apply_action(world: &mut World, action: PanelAction) {
    match action {
        PanelAction::ToggleRunning => {
            world.toggle_running();
            log::debug!("Running: {}", world.is_running());
        }
        PanelAction::SettingsChanged(settings) => world.set_settings(settings),
        PanelAction::Reset => world.reset(),
    }
}

/// Actions land before drawing so a toggle or reset shows this frame.
fn apply_and_draw(world: &mut World, canvas: &mut Canvas, actions: Vec<PanelAction>) {
    for action in actions {
        apply_action(world, action);
    }
    draw_world(canvas, world);
}

/// Canvas size in logical pixels, the unit the world's coordinates use.
fn canvas_size(physical_size: PhysicalSize<u32>, scale_factor: f64) -> (u32, u32) {
    let logical: LogicalSize<u32> = physical_size.to_logical(scale_factor);
    (logical.width, logical.height)
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let consumed = match (&self.window, &mut self.gpu_state) {
            (Some(window), Some(gpu_state)) => gpu_state.egui.on_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                if let Some(window) = &self.window {
                    let scale_factor = window.scale_factor();
                    self.resize_canvas(physical_size, scale_factor);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let physical_size = window.inner_size();
                    self.resize_canvas(physical_size, scale_factor);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let wants_keyboard = self
                    .gpu_state
                    .as_ref()
                    .is_some_and(|gpu| gpu.egui.wants_keyboard_input());
                if !consumed && !wants_keyboard {
                    self.on_key(event_loop, &event);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let deadline = self.clock.next_frame_deadline();
        if Instant::now() >= deadline {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
        }
    }
}
