//! Keyboard input mapping
//!
//! Key events arrive asynchronously and only update a held-key table
//! (last write wins per key). Once per frame the mapper folds that table into
//! a `Controls` signal. Arrow keys and WASD are coalesced; Space and Escape
//! toggle pause once per press.

use std::collections::HashMap;

use crate::sim::Controls;

/// Logical action a key is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Accelerate,
    Brake,
    SteerLeft,
    SteerRight,
    TogglePause,
}

impl Action {
    /// Fixed bindings, keyed by `KeyboardEvent.key`
    pub fn for_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Action::Accelerate),
            "ArrowDown" | "s" | "S" => Some(Action::Brake),
            "ArrowLeft" | "a" | "A" => Some(Action::SteerLeft),
            "ArrowRight" | "d" | "D" => Some(Action::SteerRight),
            " " | "Escape" => Some(Action::TogglePause),
            _ => None,
        }
    }
}

/// What the event source should do with a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyResponse {
    /// Recognized binding; suppress the platform default action
    pub handled: bool,
}

/// Table key for `key`: single characters fold to lowercase so Shift
/// changing between key-down and key-up still releases the key
fn table_key(key: &str) -> String {
    if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

/// Latest held state of every key seen so far
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashMap<String, bool>,
    /// Toggle-key down edges since the last sample
    toggle_presses: u32,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) -> KeyResponse {
        let was_held = self.held.insert(table_key(key), true).unwrap_or(false);
        let action = Action::for_key(key);
        if action == Some(Action::TogglePause) && !was_held {
            self.toggle_presses += 1;
        }
        KeyResponse {
            handled: action.is_some(),
        }
    }

    pub fn key_up(&mut self, key: &str) -> KeyResponse {
        self.held.insert(table_key(key), false);
        KeyResponse {
            handled: Action::for_key(key).is_some(),
        }
    }

    /// Forget every held key (window lost focus, key-ups will not arrive)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.get(&table_key(key)).copied().unwrap_or(false)
    }

    fn action_held(&self, action: Action) -> bool {
        self.held
            .iter()
            .any(|(key, held)| *held && Action::for_key(key) == Some(action))
    }
}

/// Folds the held-key table into a per-tick control signal
#[derive(Debug, Clone, Default)]
pub struct InputMapper;

impl InputMapper {
    pub fn new() -> Self {
        Self
    }

    /// Read the current snapshot and consume pending toggle presses
    ///
    /// Two presses inside one frame toggle twice, i.e. cancel out.
    pub fn sample(&mut self, keyboard: &mut KeyboardState) -> Controls {
        let presses = std::mem::take(&mut keyboard.toggle_presses);
        Controls {
            accelerate: keyboard.action_held(Action::Accelerate),
            brake: keyboard.action_held(Action::Brake),
            steer_left: keyboard.action_held(Action::SteerLeft),
            steer_right: keyboard.action_held(Action::SteerRight),
            toggle_pause: presses % 2 == 1,
        }
    }
}
