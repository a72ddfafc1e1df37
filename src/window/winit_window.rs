//! Winit-backed video surface

use crate::player::{handle_of, RenderHandle, RenderTarget};
use crate::utils::config::WindowConfig;
use crate::utils::error::{Result, TPlayerError};
use crate::window::VideoSurface;
use log::{info, warn};
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, Window, WindowId};

/// The native video window. It only exists once the event loop has
/// resumed; until then the title is remembered and binding fails.
pub struct WinitSurface {
    window: Option<Window>,
    title: String,
    width: u32,
    height: u32,
    fullscreen: bool,
}

impl WinitSurface {
    pub fn new(config: &WindowConfig) -> Self {
        Self {
            window: None,
            title: config.title.clone(),
            width: config.width,
            height: config.height,
            fullscreen: config.fullscreen,
        }
    }

    /// Open the window
    pub fn create(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        if self.window.is_some() {
            return Ok(());
        }

        let mut attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(self.width as f64, self.height as f64));
        if self.fullscreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = event_loop
            .create_window(attributes)
            .map_err(|e| TPlayerError::RenderTarget(format!("Failed to create video window: {}", e)))?;

        info!("Video window created ({}x{})", self.width, self.height);
        self.window = Some(window);
        Ok(())
    }

    pub fn is_created(&self) -> bool {
        self.window.is_some()
    }

    pub fn id(&self) -> Option<WindowId> {
        self.window.as_ref().map(Window::id)
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

impl RenderTarget for WinitSurface {
    fn render_handle(&self) -> Result<RenderHandle> {
        let window = self
            .window
            .as_ref()
            .ok_or_else(|| TPlayerError::RenderTarget("Video window not created yet".to_string()))?;
        handle_of(window)
    }
}

impl VideoSurface for WinitSurface {
    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        if let Some(window) = &self.window {
            window.set_title(title);
        }
    }

    fn toggle_fullscreen(&mut self) {
        let Some(window) = &self.window else {
            warn!("Video window not created yet");
            return;
        };

        if window.fullscreen().is_some() {
            window.set_fullscreen(None);
        } else {
            window.set_fullscreen(Some(Fullscreen::Borderless(window.current_monitor())));
        }
    }
}
