//! Fault collection

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::input::ListenerFault;

/// Receives listener faults from the dispatcher
pub trait FaultSink {
    fn report(&mut self, fault: &ListenerFault);
}

/// Lets the caller keep a handle to a sink installed in a dispatcher
impl<S: FaultSink + ?Sized> FaultSink for Rc<RefCell<S>> {
    fn report(&mut self, fault: &ListenerFault) {
        self.borrow_mut().report(fault);
    }
}

/// Fault counters for one listener
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultCounts {
    pub panicked: usize,
    pub busy: usize,
}

impl FaultCounts {
    pub fn total(&self) -> usize {
        self.panicked + self.busy
    }
}

/// Keeps every reported fault, grouped by listener in first-fault order
#[derive(Debug, Default)]
pub struct FaultLog {
    faults: Vec<ListenerFault>,
    per_listener: IndexMap<String, FaultCounts>,
}

impl FaultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All faults in arrival order
    pub fn faults(&self) -> &[ListenerFault] {
        &self.faults
    }

    /// Counters for one listener
    pub fn counts(&self, listener: &str) -> FaultCounts {
        self.per_listener
            .get(listener)
            .copied()
            .unwrap_or_default()
    }

    /// Per-listener counters in first-fault order
    pub fn per_listener(&self) -> impl Iterator<Item = (&str, FaultCounts)> {
        self.per_listener
            .iter()
            .map(|(name, counts)| (name.as_str(), *counts))
    }

    /// Most recent fault for one listener
    pub fn last_fault(&self, listener: &str) -> Option<&ListenerFault> {
        self.faults
            .iter()
            .rev()
            .find(|fault| fault.listener() == listener)
    }

    pub fn len(&self) -> usize {
        self.faults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn clear(&mut self) {
        self.faults.clear();
        self.per_listener.clear();
    }
}

impl FaultSink for FaultLog {
    fn report(&mut self, fault: &ListenerFault) {
        let counts = self
            .per_listener
            .entry(fault.listener().to_string())
            .or_default();
        if fault.is_panic() {
            counts.panicked += 1;
        } else {
            counts.busy += 1;
        }
        self.faults.push(fault.clone());
    }
}
