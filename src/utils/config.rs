//! Configuration management for TPlayer
//!
//! Settings are read from TOML files and environment variables on top of
//! built-in defaults. Every section is optional in the file.

use crate::utils::error::{IntoPlayerError, Result, TPlayerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Video window configuration
    pub window: WindowConfig,

    /// Playback configuration
    pub player: PlayerConfig,

    /// HTTP settings used by the URL scanner
    pub network: NetworkConfig,

    /// General application settings
    pub general: GeneralConfig,
}

/// Video window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial window width
    pub width: u32,

    /// Initial window height
    pub height: u32,

    /// Base window title, extended with the playing item's name
    pub title: String,

    /// Start in fullscreen mode
    pub fullscreen: bool,
}

/// Playback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Volume applied when the engine starts (0 - 100)
    pub default_volume: i32,

    /// Position/time polling interval in milliseconds
    pub update_interval_ms: u64,

    /// Integer range of the position slider
    pub position_slider_range: i32,

    /// Explicit mpv binary; `PATH` is searched when unset
    pub mpv_binary: Option<PathBuf>,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Timeout for every GET/HEAD request, in seconds
    pub request_timeout_secs: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Pre-filled URL in the location input
    pub default_test_url: String,

    /// Video loaded by the "test sample" action
    pub sample_video_url: String,
}

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log file used while the terminal UI owns the screen
    pub log_file: Option<PathBuf>,

    /// Directory offered when browsing for local files
    pub last_directory: Option<PathBuf>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            title: "TPlayer - Video Player".to_string(),
            fullscreen: false,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: 50,
            update_interval_ms: 1000,
            position_slider_range: 1000,
            mpv_binary: None,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 5,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            default_test_url: "http://172.16.50.14/".to_string(),
            sample_video_url: "https://sample-videos.com/zip/10/mp4/SampleVideo_1280x720_1mb.mp4"
                .to_string(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
            last_directory: None,
        }
    }
}

impl Config {
    /// Load configuration from various sources
    ///
    /// Later sources override earlier ones:
    /// 1. Default values
    /// 2. User config file (`~/.config/tplayer/config.toml` on Linux)
    /// 3. The explicit file passed on the command line
    /// 4. Environment variables (`TPLAYER_*` prefix)
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                config = Self::from_file(&user_path)?;
            }
        }

        if let Some(path) = explicit {
            config = Self::from_file(path)?;
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Write this configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).config_err("Failed to create config directory")?;
        }

        let toml = toml::to_string_pretty(self).config_err("Failed to serialize config")?;
        std::fs::write(path, toml).config_err("Failed to write config file")?;

        Ok(())
    }

    /// Store `directory` as the last browsed directory in the user config
    /// file. Only that key changes; command-line, environment and
    /// `--config` values of the running session are not written.
    pub fn remember_last_directory(directory: &Path) -> Result<()> {
        Self::remember_last_directory_in(&Self::require_user_config_path()?, directory)
    }

    /// Same as [`Config::remember_last_directory`] for an explicit file
    pub fn remember_last_directory_in(path: &Path, directory: &Path) -> Result<()> {
        let mut stored = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };

        stored.general.last_directory = Some(directory.to_path_buf());
        stored.save_to(path)
    }

    /// Parse a TOML file; absent keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).config_err("Failed to read config file")?;
        toml::from_str(&contents).config_err("Failed to parse config file")
    }

    /// Apply `TPLAYER_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(volume) = lookup("TPLAYER_VOLUME") {
            self.player.default_volume = volume
                .parse()
                .map_err(|_| TPlayerError::Config("Invalid TPLAYER_VOLUME".to_string()))?;
        }

        if let Some(timeout) = lookup("TPLAYER_REQUEST_TIMEOUT") {
            self.network.request_timeout_secs = timeout
                .parse()
                .map_err(|_| TPlayerError::Config("Invalid TPLAYER_REQUEST_TIMEOUT".to_string()))?;
        }

        if let Some(log_level) = lookup("TPLAYER_LOG_LEVEL") {
            self.general.log_level = log_level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(TPlayerError::Config("Window dimensions must be non-zero".to_string()));
        }

        if !(0..=100).contains(&self.player.default_volume) {
            return Err(TPlayerError::Config("Volume must be between 0 and 100".to_string()));
        }

        if self.player.update_interval_ms == 0 {
            return Err(TPlayerError::Config("Update interval must be non-zero".to_string()));
        }

        if self.player.position_slider_range <= 0 {
            return Err(TPlayerError::Config("Position slider range must be positive".to_string()));
        }

        if self.network.request_timeout_secs == 0 {
            return Err(TPlayerError::Config("Request timeout must be non-zero".to_string()));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.general.log_level.as_str()) {
            return Err(TPlayerError::Config(format!(
                "Invalid log level '{}', must be one of: {:?}",
                self.general.log_level, valid_log_levels
            )));
        }

        Ok(())
    }

    /// Log file path, falling back to the user cache directory
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.general
            .log_file
            .clone()
            .or_else(|| dirs::cache_dir().map(|p| p.join("tplayer").join("tplayer.log")))
    }

    /// Get user config file path
    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tplayer").join("config.toml"))
    }

    fn require_user_config_path() -> Result<PathBuf> {
        Self::user_config_path()
            .ok_or_else(|| TPlayerError::Config("Cannot determine user config path".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.window.width, 1200);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.player.default_volume, 50);
        assert_eq!(config.player.update_interval_ms, 1000);
        assert_eq!(config.player.position_slider_range, 1000);
        assert_eq!(config.network.request_timeout_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.window.width = 0;
        assert!(config.validate().is_err());

        config.window.width = 1200;
        config.player.default_volume = 101;
        assert!(config.validate().is_err());

        config.player.default_volume = 30;
        config.network.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.network.request_timeout_secs = 5;
        config.general.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[player]\ndefault_volume = 80\n").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.player.default_volume, 80);
        assert_eq!(config.player.update_interval_ms, 1000);
        assert_eq!(config.window.title, "TPlayer - Video Player");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(|key| match key {
                "TPLAYER_VOLUME" => Some("75".to_string()),
                "TPLAYER_LOG_LEVEL" => Some("debug".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.player.default_volume, 75);
        assert_eq!(config.general.log_level, "debug");

        let bad = config.apply_overrides(|key| {
            (key == "TPLAYER_REQUEST_TIMEOUT").then(|| "soon".to_string())
        });
        assert!(matches!(bad, Err(TPlayerError::Config(_))));
    }

    #[test]
    fn test_remember_last_directory_keeps_stored_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tplayer").join("config.toml");

        // First run: no file yet, only defaults plus the directory
        Config::remember_last_directory_in(&path, Path::new("/videos/a")).unwrap();
        let stored = Config::from_file(&path).unwrap();
        assert_eq!(stored.general.last_directory.as_deref(), Some(Path::new("/videos/a")));
        assert_eq!(stored.general.log_level, "info");

        // A user-edited value survives, session overrides never reach the file
        let mut user = stored.clone();
        user.player.default_volume = 40;
        user.save_to(&path).unwrap();

        let mut session = Config::from_file(&path).unwrap();
        session
            .apply_overrides(|key| (key == "TPLAYER_LOG_LEVEL").then(|| "trace".to_string()))
            .unwrap();
        session.general.log_level = "debug".to_string();
        session.player.default_volume = 90;
        session.window.fullscreen = true;

        Config::remember_last_directory_in(&path, Path::new("/videos/b")).unwrap();
        let reloaded = Config::from_file(&path).unwrap();
        assert_eq!(reloaded.general.last_directory.as_deref(), Some(Path::new("/videos/b")));
        assert_eq!(reloaded.general.log_level, "info");
        assert_eq!(reloaded.player.default_volume, 40);
        assert!(!reloaded.window.fullscreen);
    }
}
