//! Keyboard input dispatch
//!
//! Turns raw key transitions from the windowing backend into a typed event
//! stream and delivers it to registered listeners:
//! - Tracks the up/down state of every key it has seen
//! - Classifies each observation as down, up or repeat
//! - Drops releases for keys that are already up
//! - Calls listeners synchronously, in registration order
//! - Contains listener faults so one listener cannot starve the others
//!
//! # Architecture
//!
//! ```text
//! Raw Input (winit) → WinitKeyboardAdapter → RawKeyTransition
//!                                                  ↓
//!                                         KeyEventDispatcher
//!                                    (KeyStateTable → KeyEvent)
//!                                                  ↓
//!                                      ListenerRegistry snapshot
//!                                                  ↓
//!                                          KeyboardListeners
//!                                       (in registration order)
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use key_dispatch::input::{
//!     KeyCode, KeyEventDispatcher, ModifierSet, RecordingListener, ScanCode, shared,
//! };
//!
//! let mut dispatcher = KeyEventDispatcher::new();
//! let recorder = shared(RecordingListener::new("recorder"));
//! dispatcher.register_listener(recorder.clone());
//!
//! dispatcher.on_raw_transition(KeyCode::A, ScanCode(30), ModifierSet::empty(), true);
//! dispatcher.on_raw_transition(KeyCode::A, ScanCode(30), ModifierSet::empty(), false);
//!
//! assert_eq!(recorder.borrow().calls().len(), 2);
//! ```

mod config;
mod dispatcher;
mod events;
mod fault;
mod keys;
mod listener;
mod modifiers;
mod registry;
mod state;
mod winit_adapter;

// Re-export public API
pub use config::{FocusLostPolicy, KeyboardConfig};
pub use dispatcher::KeyEventDispatcher;
pub use events::{KeyEvent, KeyEventKind, RawKeyTransition};
pub use fault::ListenerFault;
pub use keys::{KeyCode, ScanCode};
pub use listener::{
    FnListener, KeyboardListener, RecordedCall, RecordingListener, SharedListener,
    TracingListener, shared,
};
pub use modifiers::ModifierSet;
pub use registry::{ListenerRegistration, ListenerRegistry};
pub use state::{KeyState, KeyStateTable, Transition};
pub use winit_adapter::{KeyInput, WinitKeyboardAdapter};
