use engine::Vec2;

use super::ambient::Particle;
use super::avatar::Facing;
use super::trail::TrailSegment;
use crate::app::world_map::PointOfInterest;

/// Everything the simulation shows, so the core runs without a window.
pub(crate) trait RenderTarget {
    fn set_avatar_transform(&mut self, position: Vec2, facing: Facing, moving: bool);
    fn set_camera_transform(&mut self, offset: Vec2);
    fn clear_surface(&mut self);
    fn draw_roads(&mut self);
    fn draw_trail_segment(&mut self, segment: &TrailSegment);
    fn show_prompt(&mut self, title: &str);
    fn hide_prompt(&mut self);
    fn open_detail(&mut self, point: &PointOfInterest);
    fn close_detail(&mut self);
    fn draw_ambient(&mut self, particles: &[Particle]);
    fn show_error(&mut self, message: &str);
}
