//! Key Dispatch
//!
//! Keyboard input dispatch for winit applications: raw key transitions in,
//! ordered down/up/repeat events out.

/// Demo application - configuration, window and event loop handler
pub mod app;

/// Build-time information (target, optimization level, compiler)
pub mod build_info;

/// Listener fault collection and reporting
pub mod diagnostics;

/// Key state tracking, event classification and listener fan-out
pub mod input;
