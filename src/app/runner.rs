//! Main application handler for the key echo window

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use super::config::AppConfig;
use crate::build_info;
use crate::diagnostics::{FaultLog, format_fault_report};
use crate::input::{KeyCode, KeyEventKind, TracingListener, WinitKeyboardAdapter, shared};

/// Window that logs every key event it receives
pub struct App {
    config: AppConfig,
    window: Option<Window>,
    keyboard: WinitKeyboardAdapter,
    faults: Rc<RefCell<FaultLog>>,
    presses: usize,
}

impl App {
    /// Creates the application with the provided configuration
    pub fn new(config: AppConfig) -> Self {
        info!(profile = %config.profile, build = %build_info::version_string(), "Starting key echo");
        info!(?config.keyboard, "Keyboard configuration");

        let mut keyboard = WinitKeyboardAdapter::new(&config.keyboard);
        let faults = Rc::new(RefCell::new(FaultLog::new()));
        keyboard.dispatcher_mut().set_fault_sink(faults.clone());
        keyboard
            .dispatcher()
            .register_listener(shared(TracingListener));

        Self {
            config,
            window: None,
            keyboard,
            faults,
            presses: 0,
        }
    }

    /// Creates the application with configuration loaded from environment
    pub fn from_env() -> Self {
        let config = AppConfig::load_from_env().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using default configuration");
            AppConfig::default()
        });
        Self::new(config)
    }

    /// Faults reported by listeners so far
    pub fn fault_report(&self) -> String {
        format_fault_report(&self.faults.borrow())
    }

    /// The window only sees keys while focused, so it asks for focus on creation
    fn window_attributes(&self) -> WindowAttributes {
        let window = &self.config.window;
        let fullscreen = window.fullscreen.then_some(Fullscreen::Borderless(None));

        Window::default_attributes()
            .with_title(window.title.as_str())
            .with_inner_size(LogicalSize::new(window.width, window.height))
            .with_resizable(window.resizable)
            .with_decorations(window.decorated)
            .with_fullscreen(fullscreen)
            .with_active(true)
    }

    fn shut_down(&self, event_loop: &ActiveEventLoop) {
        info!(presses = self.presses, "Exiting");
        if !self.faults.borrow().is_empty() {
            warn!("Listener faults during session:\n{}", self.fault_report());
        }
        event_loop.exit();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match event_loop.create_window(self.window_attributes()) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    window.width = size.width,
                    window.height = size.height,
                    "Window created successfully"
                );
                self.window = Some(window);
            }
            Err(e) => {
                error!(error = %e, "Failed to create window");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Feed the keyboard adapter first so it sees every raw event
        if let Some(key_event) = self.keyboard.handle_window_event(&event) {
            if key_event.kind == KeyEventKind::Down {
                self.presses += 1;
            }
            if key_event.kind == KeyEventKind::Down && key_event.key == KeyCode::Escape {
                self.shut_down(event_loop);
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested");
                self.shut_down(event_loop);
            }
            WindowEvent::RedrawRequested => {
                if let Some(window) = &self.window {
                    window.pre_present_notify();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::WindowConfig;

    #[test]
    fn test_window_attributes_follow_config() {
        let app = App::new(AppConfig {
            window: WindowConfig {
                title: "echo".to_string(),
                fullscreen: true,
                resizable: false,
                ..WindowConfig::default()
            },
            ..AppConfig::default()
        });

        let attributes = app.window_attributes();
        assert_eq!(attributes.title, "echo");
        assert!(!attributes.resizable);
        assert!(attributes.active);
        assert_eq!(attributes.fullscreen, Some(Fullscreen::Borderless(None)));
    }
}
