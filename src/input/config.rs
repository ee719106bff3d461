//! Keyboard dispatch settings

use serde::{Deserialize, Serialize};

/// What the backend adapter does when the window loses keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusLostPolicy {
    /// Dispatch an up event for every key still held
    #[default]
    ReleaseHeld,
    /// Return every key to up without dispatching anything
    Reset,
    /// Leave key state as it is
    Ignore,
}

/// Keyboard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Create a state record for every named key up front
    pub eager_key_table: bool,
    /// Catch listener panics instead of unwinding through the input loop
    pub isolate_panics: bool,
    /// Policy applied when the window loses focus
    pub focus_lost: FocusLostPolicy,
    /// Drop the synthetic presses winit reports when focus is gained
    pub ignore_synthetic_presses: bool,
    /// Log every dispatched event at debug level
    pub log_events: bool,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            eager_key_table: false,
            isolate_panics: true,
            focus_lost: FocusLostPolicy::ReleaseHeld,
            ignore_synthetic_presses: true,
            log_events: true,
        }
    }
}
