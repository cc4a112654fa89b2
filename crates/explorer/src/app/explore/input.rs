use engine::{InputAction, InputSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlKey {
    Up,
    Down,
    Left,
    Right,
    Interact,
    CloseDetail,
}

impl ControlKey {
    const ALL: [ControlKey; 6] = [
        ControlKey::Up,
        ControlKey::Down,
        ControlKey::Left,
        ControlKey::Right,
        ControlKey::Interact,
        ControlKey::CloseDetail,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    fn action(self) -> InputAction {
        match self {
            ControlKey::Up => InputAction::MoveUp,
            ControlKey::Down => InputAction::MoveDown,
            ControlKey::Left => InputAction::MoveLeft,
            ControlKey::Right => InputAction::MoveRight,
            ControlKey::Interact => InputAction::Interact,
            ControlKey::CloseDetail => InputAction::CloseDetail,
        }
    }

    pub(crate) fn is_directional(self) -> bool {
        matches!(
            self,
            ControlKey::Up | ControlKey::Down | ControlKey::Left | ControlKey::Right
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct KeyOutcome {
    /// Interact went down while something was nearby.
    pub(crate) trigger_interact: bool,
    pub(crate) close_detail: bool,
    /// Navigation keys would scroll a hosting page; nothing scrolls natively.
    pub(crate) suppress_default: bool,
    pub(crate) directional_pressed: bool,
}

impl KeyOutcome {
    fn merge(self, other: KeyOutcome) -> KeyOutcome {
        KeyOutcome {
            trigger_interact: self.trigger_interact || other.trigger_interact,
            close_detail: self.close_detail || other.close_detail,
            suppress_default: self.suppress_default || other.suppress_default,
            directional_pressed: self.directional_pressed || other.directional_pressed,
        }
    }
}

/// Held state per control key.
#[derive(Debug, Clone, Default)]
pub(crate) struct InputTracker {
    held: [bool; 6],
}

impl InputTracker {
    pub(crate) fn on_key_down(&mut self, key: ControlKey, nearby: bool) -> KeyOutcome {
        let was_held = std::mem::replace(&mut self.held[key.index()], true);
        KeyOutcome {
            trigger_interact: key == ControlKey::Interact && !was_held && nearby,
            close_detail: key == ControlKey::CloseDetail,
            suppress_default: key.is_directional() || key == ControlKey::Interact,
            directional_pressed: key.is_directional() && !was_held,
        }
    }

    pub(crate) fn on_key_up(&mut self, key: ControlKey) {
        self.held[key.index()] = false;
    }

    pub(crate) fn is_held(&self, key: ControlKey) -> bool {
        self.held[key.index()]
    }

    pub(crate) fn any_directional_held(&self) -> bool {
        ControlKey::ALL
            .into_iter()
            .filter(|key| key.is_directional())
            .any(|key| self.is_held(key))
    }

    /// Folds one tick's snapshot into the tracker. A key tapped and released
    /// between ticks is reported as a down followed by an up.
    pub(crate) fn apply_snapshot(&mut self, snapshot: &InputSnapshot, nearby: bool) -> KeyOutcome {
        let mut outcome = KeyOutcome::default();
        for key in ControlKey::ALL {
            let action = key.action();
            if snapshot.was_pressed(action) || (snapshot.is_down(action) && !self.is_held(key)) {
                outcome = outcome.merge(self.on_key_down(key, nearby));
            }
            if !snapshot.is_down(action) && self.is_held(key) {
                self.on_key_up(key);
            }
        }
        outcome
    }
}
