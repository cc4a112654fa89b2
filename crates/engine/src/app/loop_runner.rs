use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::input::{nav_slot_for_key, ActionStates, HeldKeys};
use super::metrics::MetricsAccumulator;
use super::pacing::{slow_frame_delay, FramePacer};
use super::{Canvas, InputSnapshot, Renderer, Scene, Vec2};

pub const SLOW_FRAME_ENV_VAR: &str = "EXPLORER_SLOW_FRAME_MS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Road Explorer".to_string(),
            window_width: 1280,
            window_height: 720,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(5),
            simulated_slow_frame_ms: 0,
            max_render_fps: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize drawing surface: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Runs `scene` until the window closes.
///
/// The window and drawing surface are created before the scene loads; if
/// either is missing the scene never starts.
pub fn run_app(config: LoopConfig, mut scene: Box<dyn Scene>) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut pacer = FramePacer::new(&config, Instant::now());
    let fixed_dt_seconds = pacer.fixed_dt().as_secs_f32();
    let slow_frame = slow_frame_delay(config.simulated_slow_frame_ms);
    let metrics_interval = if config.metrics_log_interval.is_zero() {
        Duration::from_secs(5)
    } else {
        config.metrics_log_interval
    };
    let viewport = renderer.viewport();
    let mut input = InputCollector::new(viewport.width, viewport.height);
    let mut canvas = Canvas::new(viewport);

    scene.load();
    info!(
        tps = config.target_tps.max(1),
        max_frame_delta_ms = pacer.max_frame_delta().as_millis() as u64,
        max_ticks_per_frame = pacer.max_ticks_per_frame(),
        slow_frame_ms = slow_frame.as_millis() as u64,
        render_cap = %pacer.render_cap_label(),
        "loop_started"
    );

    let mut metrics = MetricsAccumulator::new(metrics_interval, Instant::now());
    let mut shown_title: Option<String> = None;
    let mut unloaded = false;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(size) => {
                    input.set_window_size(size.width, size.height);
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "surface_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::Focused(false) => input.release_all_keys(),
                WindowEvent::CursorMoved { position, .. } => {
                    input.set_cursor_position_px(position.x as f32, position.y as f32);
                }
                WindowEvent::CursorLeft { .. } => input.clear_cursor_position(),
                WindowEvent::MouseInput { state, button, .. } => {
                    input.handle_mouse_input(button, state);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        input.handle_key(code, event.state);
                    }
                }
                WindowEvent::RedrawRequested => {
                    if !slow_frame.is_zero() {
                        thread::sleep(slow_frame);
                    }

                    let frame_start = Instant::now();
                    let budget = pacer.begin_frame(frame_start);
                    for _ in 0..budget.ticks {
                        scene.update(fixed_dt_seconds, &input.snapshot_for_tick());
                        metrics.record_tick();
                    }
                    if !budget.dropped_backlog.is_zero() {
                        metrics.record_dropped_backlog(budget.dropped_backlog);
                        warn!(
                            dropped_backlog_ms = budget.dropped_backlog.as_millis() as u64,
                            max_ticks_per_frame = pacer.max_ticks_per_frame(),
                            "tick_backlog_dropped"
                        );
                    }

                    let delay = pacer.present_delay(Instant::now());
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    canvas.reset(renderer.viewport());
                    scene.render(&mut canvas);
                    if let Err(error) = renderer.render(&canvas) {
                        warn!(error = %error, "surface_present_failed");
                        window_target.exit();
                    }
                    pacer.mark_presented(Instant::now());

                    let title = scene.window_title();
                    if title != shown_title {
                        window.set_title(title.as_deref().unwrap_or(&config.window_title));
                        shown_title = title;
                    }

                    metrics.record_frame(budget.raw_dt, budget.clamped);
                    if let Some(snapshot) = metrics.maybe_snapshot(frame_start) {
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            avg_frame_ms = snapshot.avg_frame_ms,
                            worst_frame_ms = snapshot.worst_frame_ms,
                            clamped_frames = snapshot.clamped_frames,
                            dropped_backlog_ms = snapshot.dropped_backlog_ms,
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => window.request_redraw(),
            Event::LoopExiting => {
                if !unloaded {
                    scene.unload();
                    unloaded = true;
                }
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Default, Clone, Copy)]
struct PointerState {
    position: Option<Vec2>,
    left_down: bool,
    /// Left button went down since the last tick snapshot.
    clicked: bool,
}

/// Folds window events into per-tick [`InputSnapshot`]s. Press edges, clicks
/// and nav slots are latched until the next snapshot so a tap between two
/// ticks is never lost.
#[derive(Debug, Default)]
struct InputCollector {
    keys: HeldKeys,
    pressed_since_tick: ActionStates,
    nav_slot: Option<u8>,
    pointer: PointerState,
    window_size: (u32, u32),
}

impl InputCollector {
    fn new(width: u32, height: u32) -> Self {
        Self {
            window_size: (width, height),
            ..Self::default()
        }
    }

    fn handle_key(&mut self, code: KeyCode, state: ElementState) {
        let down = state == ElementState::Pressed;
        if let Some(slot) = nav_slot_for_key(code).filter(|_| down) {
            self.nav_slot = Some(slot);
            return;
        }

        let was_down = self.keys.actions();
        let Some(action) = self.keys.apply(code, down) else {
            return;
        };
        if self.keys.actions().is_down(action) && !was_down.is_down(action) {
            self.pressed_since_tick.set(action, true);
        }
    }

    fn release_all_keys(&mut self) {
        self.keys.release_all();
        self.pointer.left_down = false;
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let (width, height) = self.window_size;
        InputSnapshot::new(
            self.keys.actions(),
            std::mem::take(&mut self.pressed_since_tick),
            self.pointer.position,
            std::mem::take(&mut self.pointer.clicked),
            self.nav_slot.take(),
            width,
            height,
        )
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    fn set_cursor_position_px(&mut self, x: f32, y: f32) {
        self.pointer.position = Some(Vec2::new(x, y));
    }

    fn clear_cursor_position(&mut self) {
        self.pointer.position = None;
    }

    fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        let down = state == ElementState::Pressed;
        if down && !self.pointer.left_down {
            self.pointer.clicked = true;
        }
        self.pointer.left_down = down;
    }
}
