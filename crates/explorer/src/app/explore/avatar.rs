use engine::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Facing {
    #[default]
    Left,
    Right,
}

impl Facing {
    pub(crate) fn toward(delta_x: f32) -> Option<Self> {
        if delta_x > 0.0 {
            Some(Self::Right)
        } else if delta_x < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum MovementMode {
    #[default]
    Keyboard,
    ScriptedTravel,
}

/// The avatar record. Written each tick by exactly one of the movement
/// controller or the travel controller, selected by `mode`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AvatarState {
    pub(crate) position: Vec2,
    pub(crate) facing: Facing,
    pub(crate) mode: MovementMode,
    pub(crate) moving: bool,
}

impl AvatarState {
    pub(crate) fn new(position: Vec2) -> Self {
        Self {
            position,
            facing: Facing::default(),
            mode: MovementMode::Keyboard,
            moving: false,
        }
    }

    pub(crate) fn center(&self, body_center_offset: Vec2) -> Vec2 {
        self.position + body_center_offset
    }

    pub(crate) fn is_traveling(&self) -> bool {
        self.mode == MovementMode::ScriptedTravel
    }
}
