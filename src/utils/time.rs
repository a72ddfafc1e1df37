//! Millisecond durations as clock strings.
//!
//! Negative inputs are the engine's "unknown" sentinel and render as zero.

/// Format milliseconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_short(milliseconds: i64) -> String {
    if milliseconds < 0 {
        return "00:00".to_string();
    }

    let seconds = milliseconds / 1000;
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format milliseconds as `HH:MM:SS`.
pub fn format_long(milliseconds: i64) -> String {
    let (hours, minutes, seconds) = time_components(milliseconds);
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Split milliseconds into `(hours, minutes, seconds)`.
pub fn time_components(milliseconds: i64) -> (i64, i64, i64) {
    if milliseconds < 0 {
        return (0, 0, 0);
    }

    let seconds = milliseconds / 1000;
    let minutes = seconds / 60;

    (minutes / 60, minutes % 60, seconds % 60)
}
