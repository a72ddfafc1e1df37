//! Local directory scanning

use crate::discovery::{has_video_extension, size_to_human, VideoRecord};
use log::{debug, error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Lists video files on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileManager {
    last_directory: PathBuf,
}

impl FileManager {
    /// Start browsing from `start`, or the home directory
    pub fn new(start: Option<PathBuf>) -> Self {
        let last_directory = start
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self { last_directory }
    }

    /// Directory most recently browsed or scanned
    pub fn last_directory(&self) -> &Path {
        &self.last_directory
    }

    /// Record a browse location. Files remember their parent directory.
    pub fn remember(&mut self, path: &Path) {
        let dir = if path.is_dir() { Some(path) } else { path.parent() };
        if let Some(dir) = dir.filter(|d| !d.as_os_str().is_empty()) {
            self.last_directory = dir.to_path_buf();
        }
    }

    /// Collect the video files directly inside `directory`, sorted by name.
    ///
    /// A missing or unreadable directory yields an empty list. Entries
    /// whose metadata cannot be read are skipped.
    pub fn scan_directory(&mut self, directory: &Path) -> Vec<VideoRecord> {
        let mut videos = Vec::new();

        let directory = match directory.canonicalize() {
            Ok(dir) => dir,
            Err(e) => {
                error!("Directory does not exist: {} ({})", directory.display(), e);
                return videos;
            }
        };

        let entries = match fs::read_dir(&directory) {
            Ok(entries) => entries,
            Err(e) => {
                error!("Error scanning directory {}: {}", directory.display(), e);
                return videos;
            }
        };

        info!("Scanning directory for videos: {}", directory.display());

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    error!("Error reading directory entry: {}", e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            if !has_video_extension(&name) {
                continue;
            }

            match Self::file_record(&entry.path(), name) {
                Ok(Some(record)) => videos.push(record),
                Ok(None) => {}
                Err(e) => error!("Error processing file {}: {}", entry.path().display(), e),
            }
        }

        videos.sort_by(|a, b| a.name.cmp(&b.name));
        self.last_directory = directory;

        info!("Found {} video files in directory", videos.len());
        videos
    }

    /// Whether `path` is an existing regular file with a video extension
    pub fn is_valid_video_file(&self, path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }

        path.file_name()
            .map(|name| has_video_extension(&name.to_string_lossy()))
            .unwrap_or(false)
    }

    fn file_record(path: &Path, name: String) -> std::io::Result<Option<VideoRecord>> {
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            debug!("Skipping non-file entry: {}", path.display());
            return Ok(None);
        }

        let locator = format!("file://{}", path.display());
        Ok(VideoRecord::new(name, locator, size_to_human(metadata.len())))
    }
}
