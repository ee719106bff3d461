//! Ordered listener registry

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use super::listener::SharedListener;

/// A registered listener and its position in dispatch order
#[derive(Clone)]
pub struct ListenerRegistration {
    pub listener: SharedListener,
    /// Monotonic sequence number assigned at registration
    pub order: u64,
    /// Last name read from the listener; `None` until it has been readable
    name: Option<String>,
}

impl ListenerRegistration {
    /// Listener name, read now when the listener is free
    ///
    /// Falls back to the last name seen while the listener is borrowed.
    pub fn name(&self) -> String {
        match self.listener.try_borrow() {
            Ok(listener) => listener.name().to_string(),
            Err(_) => self.name.clone().unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        }
    }

    pub(crate) fn needs_name(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(Default)]
struct RegistryInner {
    entries: Vec<ListenerRegistration>,
    next_order: u64,
}

/// Shared handle to the ordered set of keyboard listeners
///
/// Cloning the handle shares the same registry, so a listener may keep a
/// clone and register or unregister from inside its own callback. Such
/// changes take effect from the next dispatched event. A listener holding a
/// clone of the registry it is registered in keeps both alive until it is
/// unregistered.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

fn same_listener(a: &SharedListener, b: &SharedListener) -> bool {
    Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

const UNKNOWN_NAME: &str = "<unnamed>";

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener to the dispatch order
    ///
    /// Returns false without changing anything if the listener is already
    /// registered; it keeps its original position.
    pub fn register(&self, listener: SharedListener) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner
            .entries
            .iter()
            .any(|entry| same_listener(&entry.listener, &listener))
        {
            return false;
        }

        let order = inner.next_order;
        inner.next_order += 1;
        // A listener registering itself from its own callback is borrowed
        // here; its name is filled in after its next delivery
        let name = listener
            .try_borrow()
            .ok()
            .map(|listener| listener.name().to_string());
        let registration = ListenerRegistration {
            listener,
            order,
            name,
        };
        info!(listener = %registration.name(), order, "Keyboard listener registered");
        inner.entries.push(registration);
        true
    }

    /// Removes a listener, returning false if it was not registered
    pub fn unregister(&self, listener: &SharedListener) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(index) = inner
            .entries
            .iter()
            .position(|entry| same_listener(&entry.listener, listener))
        else {
            return false;
        };

        let removed = inner.entries.remove(index);
        info!(
            listener = %removed.name(),
            order = removed.order,
            "Keyboard listener unregistered"
        );
        true
    }

    pub fn contains(&self, listener: &SharedListener) -> bool {
        self.inner
            .borrow()
            .entries
            .iter()
            .any(|entry| same_listener(&entry.listener, listener))
    }

    /// Current name of a registered listener
    pub fn name_of(&self, listener: &SharedListener) -> Option<String> {
        self.inner
            .borrow()
            .entries
            .iter()
            .find(|entry| same_listener(&entry.listener, listener))
            .map(ListenerRegistration::name)
    }

    /// Stores a name read from the listener for use while it is borrowed
    pub(crate) fn remember_name(&self, listener: &SharedListener, name: &str) {
        let mut inner = self.inner.borrow_mut();
        if let Some(entry) = inner
            .entries
            .iter_mut()
            .find(|entry| same_listener(&entry.listener, listener))
        {
            entry.name = Some(name.to_string());
        }
    }

    /// Copy of the current dispatch order
    ///
    /// The copy shares the listeners but not the ordering, so registry
    /// changes made while iterating it do not affect it.
    pub fn snapshot(&self) -> Vec<ListenerRegistration> {
        self.inner.borrow().entries.clone()
    }

    /// Listener names in dispatch order (for debugging)
    pub fn names(&self) -> Vec<String> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(ListenerRegistration::name)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }
}
