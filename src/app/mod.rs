//! Demo application
//!
//! Opens a window and feeds its keyboard input through the dispatcher.

pub mod config;
mod runner;

pub use config::{AppConfig, WindowConfig};
pub use runner::App;
