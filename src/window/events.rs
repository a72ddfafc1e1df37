//! Event handling for the video window
//!
//! Converts winit window events into control actions. A single click on
//! the video toggles playback, a double click toggles fullscreen. The
//! single-click action is held back until the double-click window has
//! passed, so a double click never pauses the video.

use crate::ui::input::{SEEK_STEP, VOLUME_STEP};
use crate::ui::Action;
use std::time::{Duration, Instant};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Second click within this window counts as a double click
pub const DOUBLE_CLICK: Duration = Duration::from_millis(400);

/// Event handler for converting winit events to actions
#[derive(Debug, Default)]
pub struct EventHandler {
    /// Time of a click that may still become a double click
    last_click: Option<Instant>,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a winit window event
    pub fn handle_event(&mut self, event: &WindowEvent, now: Instant) -> Option<Action> {
        match event {
            WindowEvent::CloseRequested => Some(Action::Quit),

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return None;
                }
                match event.physical_key {
                    PhysicalKey::Code(code) => key_action(code),
                    _ => None,
                }
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.click(now),

            WindowEvent::MouseWheel { delta, .. } => wheel_action(*delta),

            _ => None,
        }
    }

    /// Register a left click. A second click inside the window yields
    /// fullscreen at once; a first click waits for [`Self::expire_click`].
    pub fn click(&mut self, now: Instant) -> Option<Action> {
        match self.last_click.take() {
            Some(previous) if now.duration_since(previous) < DOUBLE_CLICK => Some(Action::ToggleFullscreen),
            _ => {
                self.last_click = Some(now);
                None
            }
        }
    }

    /// Resolve a pending click into play/pause once no second click came
    pub fn expire_click(&mut self, now: Instant) -> Option<Action> {
        let previous = self.last_click?;
        if now.duration_since(previous) < DOUBLE_CLICK {
            return None;
        }

        self.last_click = None;
        Some(Action::TogglePlayPause)
    }

    /// When a pending click turns into a single click
    pub fn click_deadline(&self) -> Option<Instant> {
        self.last_click.map(|at| at + DOUBLE_CLICK)
    }
}

/// Keys understood by the video window
pub fn key_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Space => Some(Action::TogglePlayPause),
        KeyCode::KeyF => Some(Action::ToggleFullscreen),
        KeyCode::KeyS => Some(Action::Stop),
        KeyCode::ArrowLeft => Some(Action::SeekBy(-SEEK_STEP)),
        KeyCode::ArrowRight => Some(Action::SeekBy(SEEK_STEP)),
        KeyCode::ArrowUp => Some(Action::VolumeBy(VOLUME_STEP)),
        KeyCode::ArrowDown => Some(Action::VolumeBy(-VOLUME_STEP)),
        KeyCode::KeyQ => Some(Action::Quit),
        _ => None,
    }
}

/// Scroll up raises the volume, scroll down lowers it
fn wheel_action(delta: MouseScrollDelta) -> Option<Action> {
    let y = match delta {
        MouseScrollDelta::LineDelta(_, y) => y as f64,
        MouseScrollDelta::PixelDelta(pos) => pos.y / 120.0,
    };

    if y > 0.0 {
        Some(Action::VolumeBy(VOLUME_STEP))
    } else if y < 0.0 {
        Some(Action::VolumeBy(-VOLUME_STEP))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_close_requested_quits() {
        let mut handler = EventHandler::new();
        assert_eq!(
            handler.handle_event(&WindowEvent::CloseRequested, Instant::now()),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_double_click_only_toggles_fullscreen() {
        let mut handler = EventHandler::new();
        let start = Instant::now();

        assert_eq!(handler.click(start), None);
        assert_eq!(handler.expire_click(start + Duration::from_millis(100)), None);
        assert_eq!(
            handler.click(start + Duration::from_millis(200)),
            Some(Action::ToggleFullscreen)
        );

        // nothing left to turn into play/pause
        assert_eq!(handler.click_deadline(), None);
        assert_eq!(handler.expire_click(start + Duration::from_secs(2)), None);
    }

    #[test]
    fn test_single_click_resolves_after_window() {
        let mut handler = EventHandler::new();
        let start = Instant::now();

        assert_eq!(handler.click(start), None);
        assert_eq!(handler.click_deadline(), Some(start + DOUBLE_CLICK));
        assert_eq!(handler.expire_click(start + DOUBLE_CLICK), Some(Action::TogglePlayPause));
        assert_eq!(handler.expire_click(start + Duration::from_secs(2)), None);

        // a late second click starts a new single click
        assert_eq!(handler.click(start + Duration::from_secs(3)), None);
        assert_eq!(handler.click(start + Duration::from_secs(10)), None);
        assert_eq!(
            handler.expire_click(start + Duration::from_secs(10) + DOUBLE_CLICK),
            Some(Action::TogglePlayPause)
        );
    }

    #[test]
    fn test_key_conversion() {
        assert_eq!(key_action(KeyCode::Space), Some(Action::TogglePlayPause));
        assert_eq!(key_action(KeyCode::KeyF), Some(Action::ToggleFullscreen));
        assert_eq!(key_action(KeyCode::ArrowLeft), Some(Action::SeekBy(-SEEK_STEP)));
        assert_eq!(key_action(KeyCode::KeyZ), None);
    }

    #[test]
    fn test_wheel_changes_volume() {
        assert_eq!(
            wheel_action(MouseScrollDelta::LineDelta(0.0, 1.0)),
            Some(Action::VolumeBy(VOLUME_STEP))
        );
        assert_eq!(
            wheel_action(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -240.0))),
            Some(Action::VolumeBy(-VOLUME_STEP))
        );
        assert_eq!(wheel_action(MouseScrollDelta::LineDelta(3.0, 0.0)), None);
    }
}
