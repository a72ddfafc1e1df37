//! Transport controls: play/pause, stop, position slider, volume.

use crate::player::PlaybackState;
use crate::utils::clamp;

/// Label on the play button when not playing
pub const PLAY_LABEL: &str = "Play";

/// Label on the play button while playing
pub const PAUSE_LABEL: &str = "Pause";

/// Time label shown when nothing is known
pub const DEFAULT_TIME_LABEL: &str = "00:00 / 00:00";

/// State of the transport control widgets
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanel {
    /// Slider upper bound; lower bound is 0
    range: i32,

    /// Slider value
    position: i32,

    /// User is holding the position slider
    pressed: bool,

    time_label: String,
    play_label: &'static str,

    /// Volume (0 - 100)
    volume: i32,

    /// Transport buttons accept input
    enabled: bool,
}

impl ControlPanel {
    pub fn new(range: i32, volume: i32) -> Self {
        Self {
            range: range.max(1),
            position: 0,
            pressed: false,
            time_label: DEFAULT_TIME_LABEL.to_string(),
            play_label: PLAY_LABEL,
            volume: clamp(volume, 0, 100),
            enabled: false,
        }
    }

    pub fn range(&self) -> i32 {
        self.range
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    /// Move the slider, clamped to `0..=range`
    pub fn set_position(&mut self, value: i32) {
        self.position = clamp(value, 0, self.range);
    }

    /// Slider position as a 0.0 - 1.0 ratio
    pub fn position_ratio(&self) -> f64 {
        self.position as f64 / self.range as f64
    }

    /// Begin a slider drag
    pub fn press(&mut self) {
        self.pressed = true;
    }

    /// End a slider drag, returning the value the user settled on
    pub fn release(&mut self) -> i32 {
        self.pressed = false;
        self.position
    }

    /// Whether the user is currently dragging the position slider
    pub fn is_position_slider_pressed(&self) -> bool {
        self.pressed
    }

    pub fn time_label(&self) -> &str {
        &self.time_label
    }

    /// Show `current / total`
    pub fn set_time(&mut self, current: &str, total: &str) {
        self.time_label = format!("{} / {}", current, total);
    }

    pub fn play_label(&self) -> &'static str {
        self.play_label
    }

    /// Follow a playback state notification
    pub fn on_state_change(&mut self, state: PlaybackState) {
        self.play_label = match state {
            PlaybackState::Playing => PAUSE_LABEL,
            PlaybackState::Paused | PlaybackState::Stopped => PLAY_LABEL,
        };
    }

    pub fn volume(&self) -> i32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: i32) {
        self.volume = clamp(volume, 0, 100);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Back to the idle display; volume is kept
    pub fn reset_controls(&mut self) {
        self.position = 0;
        self.pressed = false;
        self.time_label = DEFAULT_TIME_LABEL.to_string();
        self.play_label = PLAY_LABEL;
    }
}
