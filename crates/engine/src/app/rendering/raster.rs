use crate::app::Vec2;

use super::canvas::{Canvas, DrawCommand, StrokeStyle};
use super::text::draw_text;
use super::transform::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelRect {
    x_min: i32,
    x_max: i32,
    y_min: i32,
    y_max: i32,
}

impl PixelRect {
    /// Clipped, inclusive pixel bounds of a float box; `None` when off-screen.
    fn clipped(min: Vec2, max: Vec2, viewport: Viewport) -> Option<Self> {
        let x_min = (min.x.floor() as i32).max(0);
        let y_min = (min.y.floor() as i32).max(0);
        let x_max = (max.x.ceil() as i32).min(viewport.width as i32 - 1);
        let y_max = (max.y.ceil() as i32).min(viewport.height as i32 - 1);
        (x_min <= x_max && y_min <= y_max).then_some(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}

pub(crate) fn rasterize(frame: &mut [u8], canvas: &Canvas) {
    let viewport = canvas.viewport();
    if viewport.is_empty() {
        return;
    }

    for command in canvas.commands() {
        match command {
            DrawCommand::Fill { color } => fill_frame(frame, *color),
            DrawCommand::Stroke {
                space,
                from,
                to,
                style,
            } => {
                let a = canvas.to_screen(*space, *from);
                let b = canvas.to_screen(*space, *to);
                let scale = canvas.length_to_screen(*space, 1.0);
                stroke_segment(frame, viewport, a, b, style, scale);
            }
            DrawCommand::Disc {
                space,
                center,
                radius,
                color,
            } => {
                let center = canvas.to_screen(*space, *center);
                let radius = canvas.length_to_screen(*space, *radius);
                fill_disc(frame, viewport, center, radius, *color);
            }
            DrawCommand::Rect {
                space,
                origin,
                size,
                color,
            } => {
                let origin = canvas.to_screen(*space, *origin);
                let size = *size * canvas.length_to_screen(*space, 1.0);
                fill_rect(frame, viewport, origin, size, *color);
            }
            DrawCommand::RectOutline {
                space,
                origin,
                size,
                color,
            } => {
                let origin = canvas.to_screen(*space, *origin);
                let size = *size * canvas.length_to_screen(*space, 1.0);
                outline_rect(frame, viewport, origin, size, *color);
            }
            DrawCommand::Text {
                space,
                origin,
                text,
                color,
                scale,
            } => {
                let origin = canvas.to_screen(*space, *origin);
                draw_text(
                    frame,
                    viewport,
                    origin.x.round() as i32,
                    origin.y.round() as i32,
                    text,
                    *color,
                    *scale,
                );
            }
        }
    }
}

fn fill_frame(frame: &mut [u8], color: [u8; 4]) {
    let opaque = [color[0], color[1], color[2], 255];
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&opaque);
    }
}

/// Source-over blend of `color` into the frame, scaled by `coverage`.
pub(crate) fn blend_pixel(
    frame: &mut [u8],
    viewport: Viewport,
    x: i32,
    y: i32,
    color: [u8; 4],
    coverage: f32,
) {
    if x < 0 || y < 0 || x >= viewport.width as i32 || y >= viewport.height as i32 {
        return;
    }
    let alpha = (color[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let Some(pixel_offset) = (y as usize)
        .checked_mul(viewport.width as usize)
        .and_then(|row| row.checked_add(x as usize))
    else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(pixel) = frame.get_mut(byte_offset..byte_offset + 4) else {
        return;
    };
    for channel in 0..3 {
        let src = color[channel] as f32;
        let dst = pixel[channel] as f32;
        pixel[channel] = (src * alpha + dst * (1.0 - alpha)).round().clamp(0.0, 255.0) as u8;
    }
    pixel[3] = 255;
}

fn fill_rect(frame: &mut [u8], viewport: Viewport, origin: Vec2, size: Vec2, color: [u8; 4]) {
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    let max = Vec2::new(origin.x + size.x - 1.0, origin.y + size.y - 1.0);
    let Some(rect) = PixelRect::clipped(origin, max, viewport) else {
        return;
    };
    for y in rect.y_min..=rect.y_max {
        for x in rect.x_min..=rect.x_max {
            blend_pixel(frame, viewport, x, y, color, 1.0);
        }
    }
}

fn outline_rect(frame: &mut [u8], viewport: Viewport, origin: Vec2, size: Vec2, color: [u8; 4]) {
    if size.x <= 1.0 || size.y <= 1.0 {
        return;
    }
    let right = origin.x + size.x - 1.0;
    let bottom = origin.y + size.y - 1.0;
    fill_rect(frame, viewport, origin, Vec2::new(size.x, 1.0), color);
    fill_rect(frame, viewport, Vec2::new(origin.x, bottom), Vec2::new(size.x, 1.0), color);
    fill_rect(frame, viewport, origin, Vec2::new(1.0, size.y), color);
    fill_rect(frame, viewport, Vec2::new(right, origin.y), Vec2::new(1.0, size.y), color);
}

fn fill_disc(frame: &mut [u8], viewport: Viewport, center: Vec2, radius: f32, color: [u8; 4]) {
    if radius <= 0.0 {
        return;
    }
    let reach = Vec2::new(radius + 1.0, radius + 1.0);
    let Some(rect) = PixelRect::clipped(center - reach, center + reach, viewport) else {
        return;
    };
    for y in rect.y_min..=rect.y_max {
        for x in rect.x_min..=rect.x_max {
            let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let coverage = radius + 0.5 - sample.distance(center);
            if coverage > 0.0 {
                blend_pixel(frame, viewport, x, y, color, coverage);
            }
        }
    }
}

/// Strokes `a -> b` with round caps. Width, glow radius and dash lengths in
/// `style` are multiplied by `scale` to reach pixels.
fn stroke_segment(
    frame: &mut [u8],
    viewport: Viewport,
    a: Vec2,
    b: Vec2,
    style: &StrokeStyle,
    scale: f32,
) {
    let width = style.width * scale;
    if width <= 0.0 {
        return;
    }
    let half = width * 0.5;
    let glow = style.glow.map(|glow| (glow.radius * scale, glow.color));
    let reach = half + glow.map_or(0.0, |(radius, _)| radius) + 1.0;
    let min = Vec2::new(a.x.min(b.x) - reach, a.y.min(b.y) - reach);
    let max = Vec2::new(a.x.max(b.x) + reach, a.y.max(b.y) + reach);
    let Some(rect) = PixelRect::clipped(min, max, viewport) else {
        return;
    };

    let ab = b - a;
    let length_sq = ab.x * ab.x + ab.y * ab.y;
    let length = length_sq.sqrt();
    let dash = style
        .dash
        .map(|(on, off)| (on * scale, off * scale))
        .filter(|(on, off)| *on > 0.0 && on + off > 0.0);
    // Hairlines keep their colour but lose opacity in proportion to width.
    let thin_factor = width.min(1.0);

    for y in rect.y_min..=rect.y_max {
        for x in rect.x_min..=rect.x_max {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let t = if length_sq > 0.0 {
                (((p.x - a.x) * ab.x + (p.y - a.y) * ab.y) / length_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            if let Some((on, off)) = dash {
                if (t * length) % (on + off) > on {
                    continue;
                }
            }
            let distance = p.distance(a + ab * t);
            if distance <= half + 0.5 {
                let coverage = (half + 0.5 - distance).min(1.0) * thin_factor;
                blend_pixel(frame, viewport, x, y, style.paint.sample(t), coverage);
            } else if let Some((radius, color)) = glow {
                let falloff = 1.0 - (distance - half) / radius.max(f32::EPSILON);
                if falloff > 0.0 {
                    blend_pixel(frame, viewport, x, y, color, falloff * falloff * 0.5);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::rendering::canvas::{Glow, Space};

    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn viewport() -> Viewport {
        Viewport {
            width: 32,
            height: 32,
        }
    }

    fn blank_frame() -> Vec<u8> {
        vec![0u8; 32 * 32 * 4]
    }

    fn pixel(frame: &[u8], x: usize, y: usize) -> [u8; 4] {
        let offset = (y * 32 + x) * 4;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn half_alpha_blend_mixes_evenly() {
        let mut frame = blank_frame();
        blend_pixel(&mut frame, viewport(), 1, 1, [200, 100, 50, 255], 0.5);
        assert_eq!(pixel(&frame, 1, 1), [100, 50, 25, 255]);
    }

    #[test]
    fn blend_outside_viewport_is_ignored() {
        let mut frame = blank_frame();
        blend_pixel(&mut frame, viewport(), -1, 3, WHITE, 1.0);
        blend_pixel(&mut frame, viewport(), 32, 3, WHITE, 1.0);
        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn horizontal_stroke_covers_its_centerline_only() {
        let mut frame = blank_frame();
        stroke_segment(
            &mut frame,
            viewport(),
            Vec2::new(4.0, 10.5),
            Vec2::new(20.0, 10.5),
            &StrokeStyle::solid(3.0, WHITE),
            1.0,
        );
        assert_eq!(pixel(&frame, 12, 10), WHITE);
        assert_eq!(pixel(&frame, 12, 20), [0, 0, 0, 0]);
    }

    #[test]
    fn dashed_stroke_leaves_gaps() {
        let mut frame = blank_frame();
        let style = StrokeStyle {
            dash: Some((4.0, 4.0)),
            ..StrokeStyle::solid(1.0, WHITE)
        };
        stroke_segment(
            &mut frame,
            viewport(),
            Vec2::new(0.0, 5.5),
            Vec2::new(32.0, 5.5),
            &style,
            1.0,
        );
        assert_eq!(pixel(&frame, 1, 5), WHITE);
        assert_eq!(pixel(&frame, 6, 5), [0, 0, 0, 0]);
    }

    #[test]
    fn glow_tints_pixels_beyond_the_stroke_width() {
        let mut frame = blank_frame();
        let style = StrokeStyle {
            glow: Some(Glow {
                radius: 6.0,
                color: [0, 200, 255, 255],
            }),
            ..StrokeStyle::solid(2.0, WHITE)
        };
        stroke_segment(
            &mut frame,
            viewport(),
            Vec2::new(4.0, 16.5),
            Vec2::new(28.0, 16.5),
            &style,
            1.0,
        );
        let glow_pixel = pixel(&frame, 16, 19);
        assert!(glow_pixel[2] > 0);
        assert!(glow_pixel[2] < 255);
    }

    #[test]
    fn canvas_fill_then_disc_in_world_space() {
        let mut canvas = Canvas::new(viewport());
        canvas.set_camera(Vec2::new(6.0, 6.0), 1.0);
        canvas.fill([10, 20, 30, 255]);
        canvas.disc(Space::World, Vec2::new(10.0, 10.0), 3.0, WHITE);

        let mut frame = blank_frame();
        rasterize(&mut frame, &canvas);

        assert_eq!(pixel(&frame, 16, 16), WHITE);
        assert_eq!(pixel(&frame, 0, 0), [10, 20, 30, 255]);
    }
}
