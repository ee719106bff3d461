//! Diagnostics for keyboard dispatch
//!
//! The dispatcher hands every [`ListenerFault`](crate::input::ListenerFault)
//! to a [`FaultSink`]. [`FaultLog`] keeps them for inspection and
//! [`format_fault_report`] renders a summary table.
//!
//! # Example
//!
//! ```no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use key_dispatch::diagnostics::{FaultLog, format_fault_report};
//! use key_dispatch::input::KeyEventDispatcher;
//!
//! let log = Rc::new(RefCell::new(FaultLog::new()));
//! let mut dispatcher = KeyEventDispatcher::new();
//! dispatcher.set_fault_sink(log.clone());
//!
//! // ... dispatch input ...
//!
//! println!("{}", format_fault_report(&log.borrow()));
//! ```

pub mod reporter;
pub mod sink;

pub use reporter::{format_fault_report, print_fault_report};
pub use sink::{FaultCounts, FaultLog, FaultSink};
