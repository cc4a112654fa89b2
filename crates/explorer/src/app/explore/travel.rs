use std::collections::VecDeque;

use engine::Vec2;

use super::avatar::{AvatarState, Facing, MovementMode};
use super::easing::Easing;
use crate::app::config::TravelConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TravelState {
    Idle,
    AligningToVertical,
    TravelingVertical,
    AligningToHorizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn read(self, position: Vec2) -> f32 {
        match self {
            Axis::X => position.x,
            Axis::Y => position.y,
        }
    }

    fn write(self, position: &mut Vec2, value: f32) {
        match self {
            Axis::X => position.x = value,
            Axis::Y => position.y = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Stage {
    state: TravelState,
    axis: Axis,
    target: f32,
    duration: f32,
    easing: Easing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveStage {
    stage: Stage,
    start: f32,
    elapsed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TravelEvent {
    Arrived,
}

/// Staged road-following travel: onto the vertical road, along it to the
/// destination's y, then across to the destination's x.
#[derive(Debug, Clone)]
pub(crate) struct TravelController {
    vertical_road_x: f32,
    config: TravelConfig,
    active: Option<ActiveStage>,
    pending: VecDeque<Stage>,
}

impl TravelController {
    pub(crate) fn new(vertical_road_x: f32, config: TravelConfig) -> Self {
        Self {
            vertical_road_x,
            config,
            active: None,
            pending: VecDeque::new(),
        }
    }

    pub(crate) fn state(&self) -> TravelState {
        self.active
            .map_or(TravelState::Idle, |active| active.stage.state)
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.is_some()
    }

    #[cfg(test)]
    pub(crate) fn remaining_stages(&self) -> usize {
        self.pending.len() + usize::from(self.active.is_some())
    }

    /// Drops the current plan and hands control back to the keyboard.
    pub(crate) fn cancel(&mut self, avatar: &mut AvatarState) {
        if self.active.take().is_some() {
            avatar.mode = MovementMode::Keyboard;
            avatar.moving = false;
        }
        self.pending.clear();
    }

    /// Replaces any plan in flight with one computed from the avatar's
    /// current position. Returns the number of stages scheduled; with zero
    /// stages the avatar's mode is left untouched.
    pub(crate) fn travel_to(&mut self, destination: Vec2, avatar: &mut AvatarState) -> usize {
        self.cancel(avatar);

        let tolerance = self.config.tolerance;
        let mut projected = avatar.position;
        let candidates = [
            Stage {
                state: TravelState::AligningToVertical,
                axis: Axis::X,
                target: self.vertical_road_x,
                duration: self.config.align_vertical_seconds,
                easing: Easing::QuadInOut,
            },
            Stage {
                state: TravelState::TravelingVertical,
                axis: Axis::Y,
                target: destination.y,
                duration: self.config.vertical_seconds,
                easing: Easing::CubicInOut,
            },
            Stage {
                state: TravelState::AligningToHorizontal,
                axis: Axis::X,
                target: destination.x,
                duration: self.config.align_horizontal_seconds,
                easing: Easing::QuadInOut,
            },
        ];
        for stage in candidates {
            if (stage.axis.read(projected) - stage.target).abs() > tolerance {
                self.pending.push_back(stage);
                stage.axis.write(&mut projected, stage.target);
            }
        }

        let scheduled = self.pending.len();
        if self.activate_next(avatar) {
            avatar.mode = MovementMode::ScriptedTravel;
            avatar.moving = true;
        }
        scheduled
    }

    /// Advances the plan by `dt` seconds. Time left over when a stage
    /// finishes carries into the next one.
    pub(crate) fn advance(&mut self, dt: f32, avatar: &mut AvatarState) -> Option<TravelEvent> {
        let mut budget = dt.max(0.0);
        loop {
            let active = self.active.as_mut()?;
            active.elapsed += budget;
            let stage = active.stage;
            let progress = if stage.duration > 0.0 {
                (active.elapsed / stage.duration).min(1.0)
            } else {
                1.0
            };
            let value = active.start + (stage.target - active.start) * stage.easing.apply(progress);
            stage.axis.write(&mut avatar.position, value);

            if progress < 1.0 {
                return None;
            }
            stage.axis.write(&mut avatar.position, stage.target);
            budget = (active.elapsed - stage.duration).max(0.0);
            self.active = None;
            if !self.activate_next(avatar) {
                avatar.mode = MovementMode::Keyboard;
                avatar.moving = false;
                return Some(TravelEvent::Arrived);
            }
        }
    }

    fn activate_next(&mut self, avatar: &mut AvatarState) -> bool {
        let Some(stage) = self.pending.pop_front() else {
            return false;
        };
        let start = stage.axis.read(avatar.position);
        if stage.axis == Axis::X {
            if let Some(facing) = Facing::toward(stage.target - start) {
                avatar.facing = facing;
            }
        }
        self.active = Some(ActiveStage {
            stage,
            start,
            elapsed: 0.0,
        });
        true
    }
}
