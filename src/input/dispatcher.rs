//! Key event classification and fan-out

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{debug, error, info, trace};

use super::config::KeyboardConfig;
use super::events::{KeyEvent, KeyEventKind, RawKeyTransition};
use super::fault::{ListenerFault, panic_message};
use super::keys::{KeyCode, ScanCode};
use super::listener::{SharedListener, deliver};
use super::modifiers::ModifierSet;
use super::registry::{ListenerRegistration, ListenerRegistry};
use super::state::{KeyState, KeyStateTable, Transition};
use crate::diagnostics::FaultSink;

/// Turns raw key transitions into down/up/repeat events and delivers them
///
/// The dispatcher is the only owner of key state. Each dispatch takes a
/// snapshot of the listener registry and calls every listener in it, in
/// registration order, before returning.
pub struct KeyEventDispatcher {
    states: KeyStateTable,
    registry: ListenerRegistry,
    fault_sink: Option<Box<dyn FaultSink>>,
    isolate_panics: bool,
    log_events: bool,
}

impl KeyEventDispatcher {
    /// Creates a dispatcher with default settings
    pub fn new() -> Self {
        Self::with_config(&KeyboardConfig::default())
    }

    /// Creates a dispatcher from keyboard settings
    pub fn with_config(config: &KeyboardConfig) -> Self {
        let states = if config.eager_key_table {
            KeyStateTable::with_known_keys()
        } else {
            KeyStateTable::new()
        };

        Self {
            states,
            registry: ListenerRegistry::new(),
            fault_sink: None,
            isolate_panics: config.isolate_panics,
            log_events: config.log_events,
        }
    }

    /// Installs the collaborator that receives listener faults
    pub fn set_fault_sink(&mut self, sink: impl FaultSink + 'static) {
        self.fault_sink = Some(Box::new(sink));
    }

    /// Handle to the listener registry
    ///
    /// Listeners may keep this handle to change registrations from inside
    /// their callbacks.
    pub fn registry(&self) -> ListenerRegistry {
        self.registry.clone()
    }

    /// Adds a listener at the end of the dispatch order
    ///
    /// Returns false if it was already registered.
    pub fn register_listener(&self, listener: SharedListener) -> bool {
        self.registry.register(listener)
    }

    /// Removes a listener, returning false if it was not registered
    pub fn unregister_listener(&self, listener: &SharedListener) -> bool {
        self.registry.unregister(listener)
    }

    /// Handles a press or release reported by the backend
    ///
    /// Returns the dispatched event, or `None` for a release of a key that
    /// was already up.
    pub fn on_raw_transition(
        &mut self,
        key: KeyCode,
        scancode: ScanCode,
        mods: ModifierSet,
        is_pressed_now: bool,
    ) -> Option<KeyEvent> {
        let raw = if is_pressed_now {
            RawKeyTransition::press(key, scancode, mods)
        } else {
            RawKeyTransition::release(key, scancode, mods)
        };
        self.dispatch_raw(raw)
    }

    /// Handles a raw observation timestamped now
    pub fn dispatch_raw(&mut self, raw: RawKeyTransition) -> Option<KeyEvent> {
        self.dispatch_raw_at(raw, Instant::now())
    }

    /// Handles a raw observation with an explicit timestamp
    pub fn dispatch_raw_at(&mut self, raw: RawKeyTransition, at: Instant) -> Option<KeyEvent> {
        let kind = match self.states.apply(raw.key, raw.scancode, raw.pressed, at) {
            Transition::Pressed => {
                if raw.native_repeat {
                    debug!(key = ?raw.key, "Repeat reported for a key that was up, treating as press");
                }
                KeyEventKind::Down
            }
            Transition::Held => {
                if !raw.native_repeat {
                    trace!(key = ?raw.key, "Press reported for a key already down, treating as repeat");
                }
                KeyEventKind::Repeat
            }
            Transition::Released => KeyEventKind::Up,
            Transition::Unchanged => {
                trace!(key = ?raw.key, "Release reported for a key already up, ignored");
                return None;
            }
        };

        // Down and repeat include the triggering modifier's own bit
        let mods = match kind {
            KeyEventKind::Down | KeyEventKind::Repeat => {
                raw.mods | raw.key.held_modifier().unwrap_or_default()
            }
            KeyEventKind::Up => raw.mods,
        };

        let event = KeyEvent {
            kind,
            key: raw.key,
            scancode: raw.scancode,
            mods,
            timestamp: at,
        };
        self.fan_out(&event);
        Some(event)
    }

    /// Dispatches an up event for every held key, in first-pressed order
    ///
    /// Returns the number of up events dispatched.
    pub fn release_all_held(&mut self, mods: ModifierSet) -> usize {
        let held = self.states.held();
        if held.is_empty() {
            return 0;
        }

        info!(count = held.len(), "Releasing held keys");
        let at = Instant::now();
        let mut released = 0;
        for key in held {
            let scancode = self
                .states
                .get(key)
                .map(|state| state.scancode)
                .unwrap_or_default();
            if self
                .dispatch_raw_at(RawKeyTransition::release(key, scancode, mods), at)
                .is_some()
            {
                released += 1;
            }
        }
        released
    }

    /// Returns every key to up without dispatching anything
    pub fn reset(&mut self) {
        let held = self.states.held().len();
        self.states.reset();
        info!(held, "Keyboard state reset");
    }

    /// Returns true if the key is currently down
    pub fn is_down(&self, key: KeyCode) -> bool {
        self.states.is_down(key)
    }

    /// Copy of a key's state, if the key has been seen
    pub fn key_state(&self, key: KeyCode) -> Option<KeyState> {
        self.states.get(key)
    }

    /// Keys currently down, in first-observed order
    pub fn held_keys(&self) -> Vec<KeyCode> {
        self.states.held()
    }

    /// Number of keys with a state record
    pub fn tracked_key_count(&self) -> usize {
        self.states.len()
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    fn fan_out(&mut self, event: &KeyEvent) {
        if self.log_events {
            debug!(
                kind = %event.kind,
                key = ?event.key,
                scancode = %event.scancode,
                mods = ?event.mods,
                "Dispatching key event"
            );
        }

        let listeners = self.registry.snapshot();
        for registration in &listeners {
            if let Err(fault) = self.invoke(registration, event) {
                self.report_fault(fault);
            }
        }
    }

    fn invoke(
        &self,
        registration: &ListenerRegistration,
        event: &KeyEvent,
    ) -> Result<(), ListenerFault> {
        let Ok(mut listener) = registration.listener.try_borrow_mut() else {
            let name = self
                .registry
                .name_of(&registration.listener)
                .unwrap_or_else(|| registration.name());
            return Err(ListenerFault::Busy {
                listener: name,
                kind: event.kind,
                key: event.key,
            });
        };

        let result = if self.isolate_panics {
            panic::catch_unwind(AssertUnwindSafe(|| deliver(&mut *listener, event)))
        } else {
            deliver(&mut *listener, event);
            Ok(())
        };

        if registration.needs_name() {
            self.registry.remember_name(&registration.listener, listener.name());
        }

        result.map_err(|payload| ListenerFault::Panicked {
            listener: listener.name().to_string(),
            kind: event.kind,
            key: event.key,
            message: panic_message(payload.as_ref()),
        })
    }

    fn report_fault(&mut self, fault: ListenerFault) {
        error!(listener = %fault.listener(), error = %fault, "Keyboard listener fault");
        if let Some(sink) = self.fault_sink.as_mut() {
            sink.report(&fault);
        }
    }
}

impl Default for KeyEventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
