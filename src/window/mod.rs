//! Video window for TPlayer
//!
//! The engine draws straight into a plain winit window. This module owns
//! that window, turns its input into control actions, and runs the event
//! loop that also drives the terminal controls and the position poll.

use crate::player::RenderTarget;
use crate::utils::error::{Result, TPlayerError};
use winit::event_loop::EventLoop;

mod app;
pub mod events;
mod winit_window;

pub use app::PlayerApp;
pub use events::EventHandler;
pub use winit_window::WinitSurface;

/// A window the engine can render into
pub trait VideoSurface: RenderTarget {
    /// Set the window title
    fn set_title(&mut self, title: &str);

    /// Switch between windowed and fullscreen
    fn toggle_fullscreen(&mut self);
}

/// Run the event loop until the user quits
pub fn run(app: &mut PlayerApp) -> Result<()> {
    let event_loop = build_event_loop()?;
    event_loop
        .run_app(app)
        .map_err(|e| TPlayerError::Internal(format!("Event loop error: {}", e)))
}

fn build_event_loop() -> Result<EventLoop<()>> {
    let mut builder = EventLoop::builder();

    // Wayland surfaces cannot be handed to the engine
    #[cfg(target_os = "linux")]
    {
        use winit::platform::x11::EventLoopBuilderExtX11;
        builder.with_x11();
    }

    builder
        .build()
        .map_err(|e| TPlayerError::RenderTarget(format!("Failed to create event loop: {}", e)))
}
