use engine::Vec2;

use super::avatar::{AvatarState, Facing};
use super::input::{ControlKey, InputTracker};
use super::roads::RoadNetwork;

/// Candidate per-tick displacement from held directional keys. Opposing keys
/// cancel; a diagonal is rescaled so its length equals `speed`.
pub(crate) fn keyboard_displacement(input: &InputTracker, speed: f32) -> Vec2 {
    let mut delta = Vec2::ZERO;
    if input.is_held(ControlKey::Left) {
        delta.x -= speed;
    }
    if input.is_held(ControlKey::Right) {
        delta.x += speed;
    }
    if input.is_held(ControlKey::Up) {
        delta.y -= speed;
    }
    if input.is_held(ControlKey::Down) {
        delta.y += speed;
    }
    if delta.x != 0.0 && delta.y != 0.0 {
        delta = delta * (speed / delta.length());
    }
    delta
}

/// Commits as much of `candidate` as the roads allow: the full move, else the
/// x component alone, else the y component alone, else nothing.
pub(crate) fn resolve_move(roads: &RoadNetwork, position: Vec2, candidate: Vec2) -> Vec2 {
    if candidate.is_zero() {
        return Vec2::ZERO;
    }
    if roads.contains(position + candidate) {
        return candidate;
    }
    let x_only = Vec2::new(candidate.x, 0.0);
    if candidate.x != 0.0 && roads.contains(position + x_only) {
        return x_only;
    }
    let y_only = Vec2::new(0.0, candidate.y);
    if candidate.y != 0.0 && roads.contains(position + y_only) {
        return y_only;
    }
    Vec2::ZERO
}

/// A pointer step that closes less than this fraction of `speed` on the
/// target ends the walk; sliding along a road edge toward an off-road target
/// would otherwise creep forever.
const MIN_POINTER_PROGRESS: f32 = 0.01;

/// Keyboard-mode movement, plus the free-form pointer target a click sets.
#[derive(Debug, Clone)]
pub(crate) struct Movement {
    speed: f32,
    pointer_target: Option<Vec2>,
}

impl Movement {
    pub(crate) fn new(speed: f32) -> Self {
        Self {
            speed,
            pointer_target: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn pointer_target(&self) -> Option<Vec2> {
        self.pointer_target
    }

    pub(crate) fn set_pointer_target(&mut self, target: Vec2) {
        self.pointer_target = Some(target);
    }

    pub(crate) fn clear_pointer_target(&mut self) {
        self.pointer_target = None;
    }

    /// Advances the avatar one tick. Does nothing during scripted travel.
    pub(crate) fn step(
        &mut self,
        avatar: &mut AvatarState,
        input: &InputTracker,
        roads: &RoadNetwork,
    ) {
        if avatar.is_traveling() {
            return;
        }

        if input.any_directional_held() {
            self.pointer_target = None;
            let candidate = keyboard_displacement(input, self.speed);
            self.commit(avatar, roads, candidate);
            return;
        }

        let Some(target) = self.pointer_target else {
            avatar.moving = false;
            return;
        };
        let remaining = target - avatar.position;
        let distance = remaining.length();
        let arriving = distance <= self.speed;
        let candidate = if arriving {
            remaining
        } else {
            remaining * (self.speed / distance)
        };
        let committed = self.commit(avatar, roads, candidate);
        let progress = distance - target.distance(avatar.position);
        let stalled = progress < self.speed * MIN_POINTER_PROGRESS;
        if committed.is_zero() || stalled || (arriving && committed == candidate) {
            self.pointer_target = None;
        }
    }

    /// Applies the legal part of `candidate` and returns the displacement that
    /// actually landed, which is zero once the step falls below float precision.
    fn commit(&mut self, avatar: &mut AvatarState, roads: &RoadNetwork, candidate: Vec2) -> Vec2 {
        if let Some(facing) = Facing::toward(candidate.x) {
            avatar.facing = facing;
        }
        let before = avatar.position;
        avatar.position += resolve_move(roads, before, candidate);
        let landed = avatar.position - before;
        avatar.moving = !landed.is_zero();
        landed
    }
}
