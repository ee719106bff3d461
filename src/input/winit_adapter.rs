//! Raw keyboard input collection from winit events

use tracing::{debug, trace};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::PhysicalKey;

use super::config::{FocusLostPolicy, KeyboardConfig};
use super::dispatcher::KeyEventDispatcher;
use super::events::{KeyEvent, RawKeyTransition};
use super::keys::{KeyCode, ScanCode};
use super::modifiers::ModifierSet;

/// One keyboard observation extracted from a winit event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub physical: PhysicalKey,
    pub scancode: ScanCode,
    pub pressed: bool,
    /// winit marked this press as auto-repeat
    pub repeat: bool,
    /// winit generated this event itself (focus changes)
    pub synthetic: bool,
}

/// Feeds winit keyboard, modifier and focus events into a dispatcher
pub struct WinitKeyboardAdapter {
    dispatcher: KeyEventDispatcher,
    held: ModifierSet,
    locks: ModifierSet,
    focus_lost: FocusLostPolicy,
    ignore_synthetic_presses: bool,
}

impl WinitKeyboardAdapter {
    /// Creates an adapter owning a new dispatcher built from the same settings
    pub fn new(config: &KeyboardConfig) -> Self {
        Self::with_dispatcher(KeyEventDispatcher::with_config(config), config)
    }

    /// Wraps an existing dispatcher
    pub fn with_dispatcher(dispatcher: KeyEventDispatcher, config: &KeyboardConfig) -> Self {
        Self {
            dispatcher,
            held: ModifierSet::empty(),
            locks: ModifierSet::empty(),
            focus_lost: config.focus_lost,
            ignore_synthetic_presses: config.ignore_synthetic_presses,
        }
    }

    /// Handle a winit window event
    ///
    /// Returns the key event dispatched for it, if any.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Option<KeyEvent> {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.handle_modifiers(ModifierSet::from(modifiers.state()));
                None
            }

            WindowEvent::KeyboardInput {
                event,
                is_synthetic,
                ..
            } => self.handle_key_input(KeyInput {
                physical: event.physical_key,
                scancode: scancode_of(event.physical_key),
                pressed: event.state == ElementState::Pressed,
                repeat: event.repeat,
                synthetic: *is_synthetic,
            }),

            WindowEvent::Focused(focused) => {
                self.handle_focus(*focused);
                None
            }

            _ => None,
        }
    }

    /// Records the held modifiers reported by the backend
    pub fn handle_modifiers(&mut self, mods: ModifierSet) {
        self.held = mods & ModifierSet::HELD;
    }

    /// Converts one key observation and dispatches it
    pub fn handle_key_input(&mut self, input: KeyInput) -> Option<KeyEvent> {
        if input.synthetic && input.pressed && self.ignore_synthetic_presses {
            trace!(physical = ?input.physical, "Ignoring synthetic key press");
            return None;
        }

        let key = KeyCode::from(input.physical);

        // Lock bits flip once per press cycle, before the press is dispatched
        if input.pressed
            && !self.dispatcher.is_down(key)
            && let Some(lock) = key.lock_modifier()
        {
            self.locks.toggle(lock);
        }

        let raw = RawKeyTransition {
            key,
            scancode: input.scancode,
            mods: self.modifiers(),
            pressed: input.pressed,
            native_repeat: input.repeat,
        };
        self.dispatcher.dispatch_raw(raw)
    }

    /// Applies the focus-lost policy when focus goes away
    pub fn handle_focus(&mut self, focused: bool) {
        if focused {
            return;
        }

        debug!(policy = ?self.focus_lost, "Window lost focus");
        let mods = self.modifiers();
        match self.focus_lost {
            FocusLostPolicy::ReleaseHeld => {
                self.dispatcher.release_all_held(mods);
            }
            FocusLostPolicy::Reset => self.dispatcher.reset(),
            FocusLostPolicy::Ignore => {}
        }
        // Held modifiers are stale once focus is gone; winit reports fresh
        // ones when focus returns. Lock toggles can change elsewhere too.
        self.held = ModifierSet::empty();
        self.locks = ModifierSet::empty();
    }

    /// Current modifier state: held keys plus lock toggles
    ///
    /// winit 0.30 does not report lock state, so the lock bits are inferred
    /// from presses this window sees. They start clear and are cleared again
    /// whenever focus is lost, so a lock that was already on when the window
    /// gained focus reads as off until it is pressed.
    pub fn modifiers(&self) -> ModifierSet {
        self.held | self.locks
    }

    pub fn dispatcher(&self) -> &KeyEventDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut KeyEventDispatcher {
        &mut self.dispatcher
    }
}

#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
fn scancode_of(physical: PhysicalKey) -> ScanCode {
    use winit::platform::scancode::PhysicalKeyExtScancode;

    ScanCode(physical.to_scancode().unwrap_or(0))
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
fn scancode_of(_physical: PhysicalKey) -> ScanCode {
    ScanCode(0)
}
