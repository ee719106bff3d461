//! Normalized key events and raw backend transitions

use std::fmt;
use std::time::Instant;

use super::keys::{KeyCode, ScanCode};
use super::modifiers::ModifierSet;

/// Kind of a normalized key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEventKind {
    /// Key went from up to down
    Down,
    /// Key went from down to up
    Up,
    /// Key is still held and the backend reported it again
    Repeat,
}

impl fmt::Display for KeyEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Down => "down",
            Self::Up => "up",
            Self::Repeat => "repeat",
        };
        f.write_str(name)
    }
}

/// Immutable snapshot of one dispatched key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub key: KeyCode,
    pub scancode: ScanCode,
    /// Modifier state at the instant the event occurred
    pub mods: ModifierSet,
    pub timestamp: Instant,
}

/// One observation handed over by the input backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyTransition {
    pub key: KeyCode,
    pub scancode: ScanCode,
    pub mods: ModifierSet,
    /// Physical state of the key after the transition
    pub pressed: bool,
    /// Backend flagged this press as its own auto-repeat
    pub native_repeat: bool,
}

impl RawKeyTransition {
    /// A press observation
    pub fn press(key: KeyCode, scancode: ScanCode, mods: ModifierSet) -> Self {
        Self {
            key,
            scancode,
            mods,
            pressed: true,
            native_repeat: false,
        }
    }

    /// A press observation the backend marked as auto-repeat
    pub fn repeat(key: KeyCode, scancode: ScanCode, mods: ModifierSet) -> Self {
        Self {
            native_repeat: true,
            ..Self::press(key, scancode, mods)
        }
    }

    /// A release observation
    pub fn release(key: KeyCode, scancode: ScanCode, mods: ModifierSet) -> Self {
        Self {
            key,
            scancode,
            mods,
            pressed: false,
            native_repeat: false,
        }
    }
}
