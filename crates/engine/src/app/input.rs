use std::collections::HashSet;

use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Interact,
    CloseDetail,
}

const ACTION_COUNT: usize = 6;

const MOVE_UP_KEYS: &[KeyCode] = &[KeyCode::KeyW, KeyCode::ArrowUp];
const MOVE_DOWN_KEYS: &[KeyCode] = &[KeyCode::KeyS, KeyCode::ArrowDown];
const MOVE_LEFT_KEYS: &[KeyCode] = &[KeyCode::KeyA, KeyCode::ArrowLeft];
const MOVE_RIGHT_KEYS: &[KeyCode] = &[KeyCode::KeyD, KeyCode::ArrowRight];
const INTERACT_KEYS: &[KeyCode] = &[KeyCode::Space];
const CLOSE_DETAIL_KEYS: &[KeyCode] = &[KeyCode::Escape];

const NAV_SLOT_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    pub const ALL: [InputAction; ACTION_COUNT] = [
        InputAction::MoveUp,
        InputAction::MoveDown,
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::Interact,
        InputAction::CloseDetail,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Interact => 4,
            InputAction::CloseDetail => 5,
        }
    }

    fn bound_keys(self) -> &'static [KeyCode] {
        match self {
            InputAction::MoveUp => MOVE_UP_KEYS,
            InputAction::MoveDown => MOVE_DOWN_KEYS,
            InputAction::MoveLeft => MOVE_LEFT_KEYS,
            InputAction::MoveRight => MOVE_RIGHT_KEYS,
            InputAction::Interact => INTERACT_KEYS,
            InputAction::CloseDetail => CLOSE_DETAIL_KEYS,
        }
    }

    fn for_key(key: KeyCode) -> Option<InputAction> {
        Self::ALL
            .into_iter()
            .find(|action| action.bound_keys().contains(&key))
    }
}

pub(crate) fn nav_slot_for_key(key: KeyCode) -> Option<u8> {
    NAV_SLOT_KEYS
        .iter()
        .position(|candidate| *candidate == key)
        .map(|index| index as u8)
}

/// Physical keys currently held, folded into per-action state.
///
/// An action stays down while any of its bound keys is held, so releasing
/// `W` does not cancel a held `ArrowUp`.
#[derive(Debug, Clone, Default)]
pub(crate) struct HeldKeys {
    held: HashSet<KeyCode>,
    actions: ActionStates,
}

impl HeldKeys {
    pub(crate) fn apply(&mut self, key: KeyCode, is_pressed: bool) -> Option<InputAction> {
        let action = InputAction::for_key(key)?;
        if is_pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
        let still_down = action
            .bound_keys()
            .iter()
            .any(|bound| self.held.contains(bound));
        self.actions.set(action, still_down);
        Some(action)
    }

    pub(crate) fn actions(&self) -> ActionStates {
        self.actions
    }

    pub(crate) fn release_all(&mut self) {
        self.held.clear();
        self.actions = ActionStates::default();
    }
}
