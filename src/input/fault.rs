//! Listener fault type

use std::any::Any;

use thiserror::Error;

use super::events::KeyEventKind;
use super::keys::KeyCode;

/// A listener failed while handling a dispatched event
///
/// Faults are contained by the dispatcher: the faulting listener stays
/// registered and the remaining listeners still receive the event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListenerFault {
    #[error("listener '{listener}' panicked handling key {kind} of {key:?}: {message}")]
    Panicked {
        listener: String,
        kind: KeyEventKind,
        key: KeyCode,
        message: String,
    },

    #[error("listener '{listener}' was already borrowed when key {kind} of {key:?} arrived")]
    Busy {
        listener: String,
        kind: KeyEventKind,
        key: KeyCode,
    },
}

impl ListenerFault {
    /// Name of the listener that faulted
    pub fn listener(&self) -> &str {
        match self {
            Self::Panicked { listener, .. } | Self::Busy { listener, .. } => listener,
        }
    }

    pub fn kind(&self) -> KeyEventKind {
        match self {
            Self::Panicked { kind, .. } | Self::Busy { kind, .. } => *kind,
        }
    }

    pub fn key(&self) -> KeyCode {
        match self {
            Self::Panicked { key, .. } | Self::Busy { key, .. } => *key,
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked { .. })
    }
}

/// Extracts the message carried by a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
