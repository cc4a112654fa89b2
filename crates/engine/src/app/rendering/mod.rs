mod canvas;
mod raster;
mod renderer;
mod text;
mod transform;

pub use canvas::{Canvas, ColorStop, DrawCommand, Glow, Paint, Space, StrokeStyle};
pub use renderer::Renderer;
pub use text::{glyph_advance, line_advance, text_width, GLYPH_HEIGHT, GLYPH_WIDTH};
pub use transform::{screen_to_world, world_to_screen, Viewport};
