//! Simulation core: one [`SimContext`] owns every piece of per-tick state and
//! reports what changed through a [`RenderTarget`].

mod ambient;
mod avatar;
mod camera;
mod easing;
mod input;
mod movement;
mod proximity;
mod render_target;
mod roads;
mod trail;
mod travel;

#[cfg(test)]
mod tests;

use engine::{screen_to_world, InputSnapshot, Vec2, Viewport};
use tracing::{debug, info};

use super::config::ExplorerConfig;
use super::world_map::WorldMap;
use ambient::AmbientField;
use camera::CameraFollower;
use input::InputTracker;
use movement::Movement;
use proximity::{ProximityChange, ProximityDetector};
use trail::Trail;
use travel::{TravelController, TravelEvent};

pub(crate) use ambient::Particle;
pub(crate) use avatar::{AvatarState, Facing};
pub(crate) use render_target::RenderTarget;
pub(crate) use roads::{RoadNetwork, RoadSegment};
pub(crate) use trail::TrailSegment;
pub(crate) use travel::TravelState;

pub(crate) struct SimContext {
    avatar: AvatarState,
    input: InputTracker,
    movement: Movement,
    camera: CameraFollower,
    trail: Trail,
    proximity: ProximityDetector,
    travel: TravelController,
    ambient: AmbientField,
    roads: RoadNetwork,
    map: WorldMap,
    body_center_offset: Vec2,
    world_scale: f32,
    viewport: Viewport,
    detail_open: Option<usize>,
}

impl SimContext {
    pub(crate) fn new(config: &ExplorerConfig, map: WorldMap, viewport: Viewport) -> Self {
        Self {
            avatar: AvatarState::new(config.avatar_spawn.to_vec2()),
            input: InputTracker::default(),
            movement: Movement::new(config.avatar_speed),
            camera: CameraFollower::new(config.camera_smoothing),
            trail: Trail::new(config.trail_max_len, config.trail_fade_per_tick),
            proximity: ProximityDetector::new(config.interaction_radius),
            travel: TravelController::new(config.roads.vertical_x, config.travel.clone()),
            ambient: AmbientField::new(
                config.ambient_particle_count,
                config.ambient_seed,
                viewport,
            ),
            roads: RoadNetwork::from_config(&config.roads),
            map,
            body_center_offset: config.body_center_offset.to_vec2(),
            world_scale: config.world_scale,
            viewport,
            detail_open: None,
        }
    }

    /// Runs one tick: input, movement or travel, camera, trail, proximity,
    /// ambient effects, then the avatar and camera transforms.
    pub(crate) fn tick(&mut self, dt: f32, input: &InputSnapshot, target: &mut dyn RenderTarget) {
        self.sync_viewport(input);
        self.handle_input(input, target);

        if self.travel.is_active() {
            if let Some(TravelEvent::Arrived) = self.travel.advance(dt, &mut self.avatar) {
                info!(
                    x = self.avatar.position.x,
                    y = self.avatar.position.y,
                    "travel_arrived"
                );
            }
        } else {
            self.movement.step(&mut self.avatar, &self.input, &self.roads);
        }

        self.camera.follow(self.avatar.position, self.viewport.center());

        self.trail
            .update(self.avatar.position, self.input.any_directional_held());
        target.clear_surface();
        target.draw_roads();
        for segment in self.trail.segments() {
            target.draw_trail_segment(&segment);
        }

        self.update_proximity(target);

        self.ambient.update(self.viewport);
        target.draw_ambient(self.ambient.particles());

        target.set_avatar_transform(self.avatar.position, self.avatar.facing, self.avatar.moving);
        target.set_camera_transform(self.camera.offset());
    }

    /// Starts scripted travel to the point at `index`. Unknown indices are
    /// ignored.
    pub(crate) fn travel_to_point(&mut self, index: usize) -> bool {
        let Some(point) = self.map.get(index) else {
            debug!(index, "travel_target_missing");
            return false;
        };
        self.movement.clear_pointer_target();
        let stages = self
            .travel
            .travel_to(point.interaction_point, &mut self.avatar);
        info!(id = %point.poi.id, stages, "travel_started");
        true
    }

    #[cfg(test)]
    pub(crate) fn avatar(&self) -> &AvatarState {
        &self.avatar
    }

    #[cfg(test)]
    pub(crate) fn camera_offset(&self) -> Vec2 {
        self.camera.offset()
    }

    pub(crate) fn nearby(&self) -> Option<usize> {
        self.proximity.current()
    }

    pub(crate) fn travel_state(&self) -> TravelState {
        self.travel.state()
    }

    pub(crate) fn map(&self) -> &WorldMap {
        &self.map
    }

    fn sync_viewport(&mut self, input: &InputSnapshot) {
        let (width, height) = input.window_size();
        if width > 0 && height > 0 {
            self.viewport = Viewport { width, height };
        }
    }

    fn handle_input(&mut self, snapshot: &InputSnapshot, target: &mut dyn RenderTarget) {
        let outcome = self
            .input
            .apply_snapshot(snapshot, self.proximity.current().is_some());

        if outcome.directional_pressed {
            self.movement.clear_pointer_target();
        }
        if outcome.close_detail && self.detail_open.take().is_some() {
            target.close_detail();
        }
        if outcome.trigger_interact {
            if let Some(index) = self.proximity.current() {
                if let Some(point) = self.map.get(index) {
                    target.open_detail(&point.poi);
                    self.detail_open = Some(index);
                    info!(id = %point.poi.id, "detail_opened");
                }
            }
        }

        if let Some(slot) = snapshot.nav_slot_pressed() {
            self.travel_to_point(usize::from(slot));
        }

        if snapshot.left_click_pressed() && !self.avatar.is_traveling() {
            if let Some(cursor) = snapshot.cursor_position_px() {
                let world = screen_to_world(
                    cursor,
                    self.camera.offset(),
                    self.world_scale,
                    self.viewport,
                );
                self.movement.set_pointer_target(world);
                debug!(x = world.x, y = world.y, "pointer_target_set");
            }
        }
    }

    fn update_proximity(&mut self, target: &mut dyn RenderTarget) {
        let center = self.avatar.center(self.body_center_offset);
        match self.proximity.update(center, self.map.points()) {
            Some(ProximityChange::Entered(index)) => {
                if let Some(point) = self.map.get(index) {
                    target.show_prompt(&point.poi.title);
                    info!(id = %point.poi.id, "proximity_entered");
                }
            }
            Some(ProximityChange::Left) => {
                target.hide_prompt();
                debug!("proximity_left");
            }
            None => {}
        }
    }
}
