//! Video discovery for TPlayer
//!
//! Produces lists of playable items either from a local directory
//! (`FileManager`) or from the links on a web page (`UrlScanner`).
//! Both fail soft: problems are logged and the offending entry, or the
//! whole scan, yields nothing.

mod file_manager;
mod url_scanner;

pub use file_manager::FileManager;
pub use url_scanner::{extract_video_links, filename_from_link, UrlScanner, VideoInfo};

/// Recognized video file suffixes, matched case-insensitively
pub const VIDEO_EXTENSIONS: [&str; 9] = [
    ".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm", ".m4v", ".3gp",
];

/// Type tag used when a name carries no extension
pub const FALLBACK_TYPE: &str = "VIDEO";

/// A discovered, playable item.
///
/// `locator` is the identity of the record and what gets handed to the
/// player; discovery never emits a record with an empty locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    /// Display filename
    pub name: String,

    /// `file://` path or absolute URL
    pub locator: String,

    /// Human-readable size, empty when unknown
    pub size_display: String,

    /// Uppercased extension
    pub type_tag: String,
}

impl VideoRecord {
    /// Build a record, rejecting an empty locator
    pub fn new(name: impl Into<String>, locator: impl Into<String>, size_display: impl Into<String>) -> Option<Self> {
        let locator = locator.into();
        if locator.is_empty() {
            return None;
        }

        let name = name.into();
        let type_tag = type_from_name(&name);

        Some(Self {
            name,
            locator,
            size_display: size_display.into(),
            type_tag,
        })
    }
}

/// Whether `name` ends with one of [`VIDEO_EXTENSIONS`]
pub fn has_video_extension(name: &str) -> bool {
    let lower = name.to_lowercase();
    VIDEO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Format a byte count with base-1024 units and one decimal place
pub fn size_to_human(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} TB", size)
}

/// Uppercased text after the last `.`, or [`FALLBACK_TYPE`]
pub fn type_from_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_uppercase(),
        _ => FALLBACK_TYPE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_has_video_extension() {
        assert!(has_video_extension("clip.mp4"));
        assert!(has_video_extension("CLIP.MKV"));
        assert!(has_video_extension("phone.3gp"));
        assert!(!has_video_extension("notes.txt"));
        assert!(!has_video_extension("mp4"));
        assert!(!has_video_extension("movie.mp4.part"));
    }

    #[test]
    fn test_size_to_human_unit_boundaries() {
        assert_eq!(size_to_human(0), "0.0 B");
        assert_eq!(size_to_human(1023), "1023.0 B");
        assert_eq!(size_to_human(1024), "1.0 KB");
        assert_eq!(size_to_human(1536), "1.5 KB");
        assert_eq!(size_to_human(1024 * 1024 - 1), "1024.0 KB");
        assert_eq!(size_to_human(1024 * 1024), "1.0 MB");
        assert_eq!(size_to_human(5 * 1024 * 1024 * 1024), "5.0 GB");
        assert_eq!(size_to_human(3 * 1024u64.pow(4)), "3.0 TB");
        assert_eq!(size_to_human(2048 * 1024u64.pow(4)), "2048.0 TB");
    }

    proptest! {
        #[test]
        fn prop_size_picks_first_unit_below_1024(bytes in any::<u64>()) {
            let text = size_to_human(bytes);
            let (number, unit) = text.split_once(' ').unwrap();
            let units = ["B", "KB", "MB", "GB", "TB"];
            let k = units.iter().position(|u| *u == unit).unwrap() as i32;

            let scaled = bytes as f64 / 1024f64.powi(k);
            prop_assert!(k == 4 || scaled < 1024.0);
            prop_assert!(k == 0 || scaled >= 1.0);
            prop_assert_eq!(number, format!("{:.1}", scaled));
        }
    }

    #[test]
    fn test_type_from_name() {
        assert_eq!(type_from_name("a.mp4"), "MP4");
        assert_eq!(type_from_name("archive.tar.webm"), "WEBM");
        assert_eq!(type_from_name("README"), "VIDEO");
        assert_eq!(type_from_name("trailing."), "VIDEO");
    }

    #[test]
    fn test_record_rejects_empty_locator() {
        assert!(VideoRecord::new("a.mp4", "", "").is_none());

        let record = VideoRecord::new("a.mkv", "file:///tmp/a.mkv", "1.0 KB").unwrap();
        assert_eq!(record.type_tag, "MKV");
        assert_eq!(record.size_display, "1.0 KB");
    }
}
