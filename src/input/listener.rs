//! Listener capability and stock listeners

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use super::events::{KeyEvent, KeyEventKind};
use super::keys::{KeyCode, ScanCode};
use super::modifiers::ModifierSet;

/// Component that wants to hear about keyboard input
///
/// Handlers are called synchronously from the input loop, in registration
/// order. They must return promptly; nothing else is dispatched until they do.
pub trait KeyboardListener {
    /// Name of this listener for logs and fault reports
    fn name(&self) -> &str {
        "listener"
    }

    /// Called once when a key goes from up to down
    fn key_down(&mut self, key: KeyCode, scancode: ScanCode, mods: ModifierSet);

    /// Called once when a key goes from down to up
    fn key_up(&mut self, key: KeyCode, scancode: ScanCode, mods: ModifierSet);

    /// Called for every repeat while a key is held
    fn key_repeat(&mut self, key: KeyCode, scancode: ScanCode, mods: ModifierSet);
}

/// Listener reference held by the registry
///
/// Identity is the address of the shared allocation.
pub type SharedListener = Rc<RefCell<dyn KeyboardListener>>;

/// Wraps a listener for registration, keeping a typed handle for the caller
pub fn shared<L: KeyboardListener + 'static>(listener: L) -> Rc<RefCell<L>> {
    Rc::new(RefCell::new(listener))
}

/// Routes an event to the handler matching its kind
pub(crate) fn deliver(listener: &mut dyn KeyboardListener, event: &KeyEvent) {
    match event.kind {
        KeyEventKind::Down => listener.key_down(event.key, event.scancode, event.mods),
        KeyEventKind::Up => listener.key_up(event.key, event.scancode, event.mods),
        KeyEventKind::Repeat => listener.key_repeat(event.key, event.scancode, event.mods),
    }
}

/// Listener backed by a closure receiving every event kind
pub struct FnListener<F> {
    name: String,
    callback: F,
}

impl<F> FnListener<F> {
    pub fn new(name: impl Into<String>, callback: F) -> Self
    where
        F: FnMut(KeyEventKind, KeyCode, ScanCode, ModifierSet),
    {
        Self {
            name: name.into(),
            callback,
        }
    }
}

impl<F> KeyboardListener for FnListener<F>
where
    F: FnMut(KeyEventKind, KeyCode, ScanCode, ModifierSet),
{
    fn name(&self) -> &str {
        &self.name
    }

    fn key_down(&mut self, key: KeyCode, scancode: ScanCode, mods: ModifierSet) {
        (self.callback)(KeyEventKind::Down, key, scancode, mods);
    }

    fn key_up(&mut self, key: KeyCode, scancode: ScanCode, mods: ModifierSet) {
        (self.callback)(KeyEventKind::Up, key, scancode, mods);
    }

    fn key_repeat(&mut self, key: KeyCode, scancode: ScanCode, mods: ModifierSet) {
        (self.callback)(KeyEventKind::Repeat, key, scancode, mods);
    }
}

/// Logs every event it receives
#[derive(Debug, Default)]
pub struct TracingListener;

impl KeyboardListener for TracingListener {
    fn name(&self) -> &str {
        "tracing"
    }

    fn key_down(&mut self, key: KeyCode, scancode: ScanCode, mods: ModifierSet) {
        debug!(?key, %scancode, ?mods, "Key down");
    }

    fn key_up(&mut self, key: KeyCode, scancode: ScanCode, mods: ModifierSet) {
        debug!(?key, %scancode, ?mods, "Key up");
    }

    fn key_repeat(&mut self, key: KeyCode, scancode: ScanCode, mods: ModifierSet) {
        debug!(?key, %scancode, ?mods, "Key repeat");
    }
}

/// One call received by a [`RecordingListener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedCall {
    pub kind: KeyEventKind,
    pub key: KeyCode,
    pub scancode: ScanCode,
    pub mods: ModifierSet,
}

/// Stores every call in arrival order
#[derive(Debug, Default)]
pub struct RecordingListener {
    name: String,
    calls: Vec<RecordedCall>,
}

impl RecordingListener {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    /// Number of calls of one kind
    pub fn count(&self, kind: KeyEventKind) -> usize {
        self.calls.iter().filter(|call| call.kind == kind).count()
    }

    /// Drains the recorded calls
    pub fn take_calls(&mut self) -> Vec<RecordedCall> {
        std::mem::take(&mut self.calls)
    }

    fn record(&mut self, kind: KeyEventKind, key: KeyCode, scancode: ScanCode, mods: ModifierSet) {
        self.calls.push(RecordedCall {
            kind,
            key,
            scancode,
            mods,
        });
    }
}

impl KeyboardListener for RecordingListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn key_down(&mut self, key: KeyCode, scancode: ScanCode, mods: ModifierSet) {
        self.record(KeyEventKind::Down, key, scancode, mods);
    }

    fn key_up(&mut self, key: KeyCode, scancode: ScanCode, mods: ModifierSet) {
        self.record(KeyEventKind::Up, key, scancode, mods);
    }

    fn key_repeat(&mut self, key: KeyCode, scancode: ScanCode, mods: ModifierSet) {
        self.record(KeyEventKind::Repeat, key, scancode, mods);
    }
}
