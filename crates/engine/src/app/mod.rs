mod input;
mod loop_runner;
mod metrics;
mod pacing;
mod rendering;
mod scene;

pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    glyph_advance, line_advance, screen_to_world, text_width, world_to_screen, Canvas, ColorStop,
    DrawCommand, Glow, Paint, Renderer, Space, StrokeStyle, Viewport, GLYPH_HEIGHT, GLYPH_WIDTH,
};
pub use scene::{InputSnapshot, Scene, Vec2};
