//! Per-key state tracking

use std::time::Instant;

use indexmap::IndexMap;

use super::keys::{KeyCode, ScanCode};

/// State of one physical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyState {
    pub is_down: bool,
    /// When the key last changed between up and down
    pub last_transition: Option<Instant>,
    /// Scancode reported with the last transition
    pub scancode: ScanCode,
}

/// Result of applying a raw observation to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Up -> Down
    Pressed,
    /// Down -> Down
    Held,
    /// Down -> Up
    Released,
    /// Up -> Up
    Unchanged,
}

/// Table of key states, iterated in the order keys were first observed
///
/// Records are never removed; [`KeyStateTable::reset`] returns them to up.
#[derive(Debug, Clone, Default)]
pub struct KeyStateTable {
    keys: IndexMap<KeyCode, KeyState>,
}

impl KeyStateTable {
    /// Creates an empty table; records are created on first transition
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with an up record for every named key
    pub fn with_known_keys() -> Self {
        let keys = KeyCode::KNOWN
            .iter()
            .map(|key| (*key, KeyState::default()))
            .collect();
        Self { keys }
    }

    /// Applies a physical observation and reports the resulting transition
    pub fn apply(
        &mut self,
        key: KeyCode,
        scancode: ScanCode,
        pressed: bool,
        at: Instant,
    ) -> Transition {
        if pressed {
            let state = self.keys.entry(key).or_default();
            if state.is_down {
                Transition::Held
            } else {
                state.is_down = true;
                state.last_transition = Some(at);
                state.scancode = scancode;
                Transition::Pressed
            }
        } else {
            match self.keys.get_mut(&key) {
                Some(state) if state.is_down => {
                    state.is_down = false;
                    state.last_transition = Some(at);
                    state.scancode = scancode;
                    Transition::Released
                }
                _ => Transition::Unchanged,
            }
        }
    }

    /// State of a key, if it has a record
    pub fn get(&self, key: KeyCode) -> Option<KeyState> {
        self.keys.get(&key).copied()
    }

    /// Returns true if the key is currently down
    pub fn is_down(&self, key: KeyCode) -> bool {
        self.keys.get(&key).is_some_and(|state| state.is_down)
    }

    /// Keys currently down, in first-observed order
    pub fn held(&self) -> Vec<KeyCode> {
        self.keys
            .iter()
            .filter(|(_, state)| state.is_down)
            .map(|(key, _)| *key)
            .collect()
    }

    /// Returns every record to up without removing it
    pub fn reset(&mut self) {
        for state in self.keys.values_mut() {
            *state = KeyState::default();
        }
    }

    /// Number of tracked keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
