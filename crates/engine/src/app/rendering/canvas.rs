use crate::app::Vec2;

use super::transform::{world_to_screen, Viewport};

/// Coordinate space a draw command is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    /// World units, mapped through the canvas camera offset and world scale.
    World,
    /// Window pixels, origin top-left.
    Screen,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: [u8; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid([u8; 4]),
    /// Gradient along the stroke direction; stops sorted by `offset` in `[0, 1]`.
    LinearGradient(Vec<ColorStop>),
}

impl Paint {
    pub fn sample(&self, t: f32) -> [u8; 4] {
        match self {
            Paint::Solid(color) => *color,
            Paint::LinearGradient(stops) => sample_gradient(stops, t),
        }
    }
}

fn sample_gradient(stops: &[ColorStop], t: f32) -> [u8; 4] {
    let Some(first) = stops.first() else {
        return [0, 0, 0, 0];
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if t <= to.offset {
            let span = (to.offset - from.offset).max(f32::EPSILON);
            let local = ((t - from.offset) / span).clamp(0.0, 1.0);
            return lerp_color(from.color, to.color, local);
        }
    }
    stops.last().map_or(first.color, |stop| stop.color)
}

fn lerp_color(from: [u8; 4], to: [u8; 4], t: f32) -> [u8; 4] {
    let mut out = [0u8; 4];
    for channel in 0..4 {
        let a = from[channel] as f32;
        let b = to[channel] as f32;
        out[channel] = (a + (b - a) * t).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub radius: f32,
    pub color: [u8; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub paint: Paint,
    pub glow: Option<Glow>,
    /// `(on, off)` dash lengths in the stroke's own space.
    pub dash: Option<(f32, f32)>,
}

impl StrokeStyle {
    pub fn solid(width: f32, color: [u8; 4]) -> Self {
        Self {
            width,
            paint: Paint::Solid(color),
            glow: None,
            dash: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill {
        color: [u8; 4],
    },
    Stroke {
        space: Space,
        from: Vec2,
        to: Vec2,
        style: StrokeStyle,
    },
    Disc {
        space: Space,
        center: Vec2,
        radius: f32,
        color: [u8; 4],
    },
    Rect {
        space: Space,
        origin: Vec2,
        size: Vec2,
        color: [u8; 4],
    },
    RectOutline {
        space: Space,
        origin: Vec2,
        size: Vec2,
        color: [u8; 4],
    },
    Text {
        space: Space,
        origin: Vec2,
        text: String,
        color: [u8; 4],
        scale: i32,
    },
}

/// Draw commands for one presented frame, painted in push order.
#[derive(Debug, Clone)]
pub struct Canvas {
    viewport: Viewport,
    camera_offset: Vec2,
    world_scale: f32,
    commands: Vec<DrawCommand>,
}

impl Canvas {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            camera_offset: Vec2::ZERO,
            world_scale: 1.0,
            commands: Vec::new(),
        }
    }

    pub(crate) fn reset(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.commands.clear();
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_camera(&mut self, camera_offset: Vec2, world_scale: f32) {
        self.camera_offset = camera_offset;
        self.world_scale = if world_scale.is_finite() && world_scale > 0.0 {
            world_scale
        } else {
            1.0
        };
    }

    pub fn camera_offset(&self) -> Vec2 {
        self.camera_offset
    }

    pub fn world_scale(&self) -> f32 {
        self.world_scale
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub(crate) fn to_screen(&self, space: Space, point: Vec2) -> Vec2 {
        match space {
            Space::World => {
                world_to_screen(point, self.camera_offset, self.world_scale, self.viewport)
            }
            Space::Screen => point,
        }
    }

    pub(crate) fn length_to_screen(&self, space: Space, length: f32) -> f32 {
        match space {
            Space::World => length * self.world_scale,
            Space::Screen => length,
        }
    }

    pub fn fill(&mut self, color: [u8; 4]) {
        self.commands.push(DrawCommand::Fill { color });
    }

    pub fn stroke(&mut self, space: Space, from: Vec2, to: Vec2, style: StrokeStyle) {
        self.commands.push(DrawCommand::Stroke {
            space,
            from,
            to,
            style,
        });
    }

    pub fn disc(&mut self, space: Space, center: Vec2, radius: f32, color: [u8; 4]) {
        self.commands.push(DrawCommand::Disc {
            space,
            center,
            radius,
            color,
        });
    }

    pub fn rect(&mut self, space: Space, origin: Vec2, size: Vec2, color: [u8; 4]) {
        self.commands.push(DrawCommand::Rect {
            space,
            origin,
            size,
            color,
        });
    }

    pub fn rect_outline(&mut self, space: Space, origin: Vec2, size: Vec2, color: [u8; 4]) {
        self.commands.push(DrawCommand::RectOutline {
            space,
            origin,
            size,
            color,
        });
    }

    pub fn text(
        &mut self,
        space: Space,
        origin: Vec2,
        text: impl Into<String>,
        color: [u8; 4],
        scale: i32,
    ) {
        self.commands.push(DrawCommand::Text {
            space,
            origin,
            text: text.into(),
            color,
            scale: scale.max(1),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops() -> Vec<ColorStop> {
        vec![
            ColorStop {
                offset: 0.0,
                color: [0, 0, 0, 255],
            },
            ColorStop {
                offset: 0.5,
                color: [200, 100, 0, 255],
            },
            ColorStop {
                offset: 1.0,
                color: [0, 0, 200, 0],
            },
        ]
    }

    #[test]
    fn gradient_hits_stops_exactly() {
        let paint = Paint::LinearGradient(stops());
        assert_eq!(paint.sample(0.0), [0, 0, 0, 255]);
        assert_eq!(paint.sample(0.5), [200, 100, 0, 255]);
        assert_eq!(paint.sample(1.0), [0, 0, 200, 0]);
    }

    #[test]
    fn gradient_interpolates_between_stops() {
        let paint = Paint::LinearGradient(stops());
        assert_eq!(paint.sample(0.25), [100, 50, 0, 255]);
    }

    #[test]
    fn empty_gradient_is_transparent() {
        assert_eq!(Paint::LinearGradient(Vec::new()).sample(0.3), [0, 0, 0, 0]);
    }

    #[test]
    fn world_points_follow_camera_and_scale() {
        let viewport = Viewport {
            width: 800,
            height: 600,
        };
        let mut canvas = Canvas::new(viewport);
        canvas.set_camera(Vec2::new(-100.0, -50.0), 2.0);

        let screen = canvas.to_screen(Space::World, Vec2::new(500.0, 350.0));
        assert_eq!(screen, Vec2::new(400.0, 300.0));
        assert_eq!(canvas.to_screen(Space::Screen, screen), screen);
        assert_eq!(canvas.length_to_screen(Space::World, 3.0), 6.0);
    }

    #[test]
    fn invalid_scale_falls_back_to_identity() {
        let mut canvas = Canvas::new(Viewport {
            width: 10,
            height: 10,
        });
        canvas.set_camera(Vec2::ZERO, 0.0);
        assert_eq!(canvas.world_scale(), 1.0);
    }
}
