//! Playback module for TPlayer
//!
//! `VideoService` is the only thing the UI talks to. It wraps a
//! `NativePlayer` engine, which does the actual decoding and rendering,
//! and turns engine failures into log lines and sentinel values.

mod mpv;
mod render_target;
mod video_service;

pub use mpv::{find_mpv_binary, IpcChannel, MpvPlayer};
pub use render_target::{handle_of, RenderHandle, RenderTarget};
pub use video_service::VideoService;

use crate::utils::error::Result;

/// Native playback engine interface
///
/// Implementations own the decoder and the video output. Time values are
/// milliseconds; `-1` means the engine does not know the value yet.
#[cfg_attr(test, mockall::automock)]
pub trait NativePlayer {
    /// Render into the given platform window
    ///
    /// # Arguments
    ///
    /// * `handle` - Native window the engine draws into
    ///
    /// # Returns
    ///
    /// Returns an error if the engine cannot use the window
    fn set_window(&mut self, handle: RenderHandle) -> Result<()>;

    /// Replace the current media, paused
    ///
    /// # Arguments
    ///
    /// * `locator` - `file://` path or network URL of the media
    ///
    /// # Returns
    ///
    /// Returns an error if the engine rejects the media
    fn load(&mut self, locator: &str) -> Result<()>;

    /// Start or resume playback of the loaded media
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self) -> Result<()>;

    /// Stop playback
    fn stop(&mut self) -> Result<()>;

    /// Whether media is currently advancing
    fn is_playing(&mut self) -> Result<bool>;

    /// Seek within the loaded media
    ///
    /// # Arguments
    ///
    /// * `position` - Fraction of the media length (0.0 - 1.0)
    fn set_position(&mut self, position: f64) -> Result<()>;

    /// Current fraction of the media length (0.0 - 1.0)
    fn position(&mut self) -> Result<f64>;

    /// Set the output volume
    ///
    /// # Arguments
    ///
    /// * `volume` - Volume level (0 - 100)
    fn set_volume(&mut self, volume: i32) -> Result<()>;

    /// Current volume (0 - 100)
    fn volume(&mut self) -> Result<i32>;

    /// Elapsed time in milliseconds, `-1` if unknown
    fn time(&mut self) -> Result<i64>;

    /// Media length in milliseconds, `-1` if unknown
    fn length(&mut self) -> Result<i64>;

    /// Release the engine. No other call is valid afterwards.
    fn shutdown(&mut self) -> Result<()>;
}

/// Playback state as reported through state-change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No playback in progress
    Stopped,

    /// Currently playing
    Playing,

    /// Playback paused
    Paused,
}

impl PlaybackState {
    /// Name used in notifications and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Stopped => "stopped",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
        }
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback slots invoked synchronously from `VideoService` methods
#[derive(Default)]
pub struct StateCallbacks {
    /// Normalized position (0.0 - 1.0)
    pub on_position_change: Option<Box<dyn FnMut(f64)>>,

    /// Current and total time in milliseconds
    pub on_time_change: Option<Box<dyn FnMut(i64, i64)>>,

    /// New playback state
    pub on_state_change: Option<Box<dyn FnMut(PlaybackState)>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_state_names() {
        assert_eq!(PlaybackState::Playing.as_str(), "playing");
        assert_eq!(PlaybackState::Paused.to_string(), "paused");
        assert_eq!(PlaybackState::Stopped.as_str(), "stopped");
        assert_ne!(PlaybackState::Stopped, PlaybackState::Playing);
    }
}
