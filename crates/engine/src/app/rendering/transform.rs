use crate::app::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn center(&self) -> Vec2 {
        Vec2 {
            x: self.width as f32 * 0.5,
            y: self.height as f32 * 0.5,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Maps a world point to window pixels.
///
/// The camera offset translates the world layer; the world scale is applied
/// around the viewport center, so an offset of `center - p` puts `p` at the
/// center regardless of scale.
pub fn world_to_screen(
    world: Vec2,
    camera_offset: Vec2,
    world_scale: f32,
    viewport: Viewport,
) -> Vec2 {
    let center = viewport.center();
    (world + camera_offset - center) * world_scale + center
}

pub fn screen_to_world(
    screen: Vec2,
    camera_offset: Vec2,
    world_scale: f32,
    viewport: Viewport,
) -> Vec2 {
    let center = viewport.center();
    (screen - center) * world_scale.recip() + center - camera_offset
}
