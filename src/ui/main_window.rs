//! Main window: wires discovery, the playback façade and the controls.
//!
//! Every user action lands on one of the handlers below. Handlers never
//! fail; problems are logged, and problems while starting a video are
//! additionally shown to the user as a modal error.

use crate::discovery::{filename_from_link, FileManager, UrlScanner};
use crate::player::VideoService;
use crate::ui::{ControlPanel, DebugConsole, FilePanel, SyncLoop, UrlInput};
use crate::utils::config::Config;
use crate::utils::error::TPlayerError;
use crate::window::VideoSurface;
use log::{error, info, warn};
use std::cell::{Ref, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

const FILE_SCHEME: &str = "file://";

pub struct MainWindow<S: VideoSurface> {
    /// Default window title
    title: String,
    sample_video_url: String,

    video: VideoService,
    files: FileManager,
    scanner: UrlScanner,
    surface: S,

    /// Shared with the façade's state-change callback
    controls: Rc<RefCell<ControlPanel>>,
    list: FilePanel,
    location: UrlInput,
    console: DebugConsole,
    sync: SyncLoop,

    /// Modal error waiting to be dismissed
    error: Option<String>,
    status: String,
    closed: bool,
}

impl<S: VideoSurface> MainWindow<S> {
    pub fn new(
        config: &Config,
        mut video: VideoService,
        files: FileManager,
        scanner: UrlScanner,
        mut surface: S,
        console: DebugConsole,
    ) -> Self {
        let volume = if video.is_initialized() {
            video.get_volume()
        } else {
            config.player.default_volume
        };
        let controls = Rc::new(RefCell::new(ControlPanel::new(
            config.player.position_slider_range,
            volume,
        )));

        let panel = Rc::clone(&controls);
        video.set_on_state_change(move |state| panel.borrow_mut().on_state_change(state));

        surface.set_title(&config.window.title);

        // First run has no remembered folder, offer the example page instead
        let location = match config.general.last_directory {
            Some(_) => UrlInput::new(files.last_directory().display().to_string()),
            None => UrlInput::new(config.network.default_test_url.clone()),
        };
        let status = if video.is_initialized() {
            "Ready".to_string()
        } else {
            format!(
                "Video engine unavailable: {}",
                video.initialization_error().unwrap_or("unknown error")
            )
        };

        Self {
            title: config.window.title.clone(),
            sample_video_url: config.network.sample_video_url.clone(),
            video,
            files,
            scanner,
            surface,
            controls,
            list: FilePanel::new(),
            location,
            console,
            sync: SyncLoop::new(Duration::from_millis(config.player.update_interval_ms)),
            error: None,
            status,
            closed: false,
        }
    }

    /// Handle what the user typed in the location input
    pub fn submit_location(&mut self) {
        let Some(value) = self.location.value().map(str::to_string) else {
            return;
        };
        self.open(&value);
    }

    /// Scan the location input: a URL as a web page, a path as a directory
    pub fn scan_location(&mut self) {
        let Some(value) = self.location.value().map(str::to_string) else {
            return;
        };

        if is_web_url(&value) {
            self.scan_url(&value);
        } else {
            self.open(&value);
        }
    }

    /// Open a directory, a video file or a URL
    pub fn open(&mut self, location: &str) {
        if self.location.text() != location {
            self.location.set_text(location);
        }

        if is_web_url(location) {
            self.load_from_url(location);
            return;
        }

        let path = PathBuf::from(location.strip_prefix(FILE_SCHEME).unwrap_or(location));
        if path.is_dir() {
            self.browse_directory(&path);
        } else if self.files.is_valid_video_file(&path) {
            self.browse_file(&path);
        } else {
            let err = TPlayerError::InvalidInput(format!("Not a video file or directory: {}", location));
            warn!("{}", err);
            self.status = err.to_string();
        }
    }

    /// List the videos in `directory`
    pub fn browse_directory(&mut self, directory: &Path) {
        let records = self.files.scan_directory(directory);
        self.status = format!("Found {} videos in {}", records.len(), directory.display());
        self.list
            .set_records(self.files.last_directory().display().to_string(), records);
    }

    /// Play a local video file
    pub fn browse_file(&mut self, path: &Path) {
        self.files.remember(path);
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.load_video(&format!("{}{}", FILE_SCHEME, path.display()), &name);
    }

    /// Scan a web page and list its video links
    pub fn scan_url(&mut self, url: &str) {
        let records = self.scanner.scan_url(url);
        if records.is_empty() {
            warn!("No videos found at {}", url);
            self.status = format!("No videos found at {}", url);
        } else {
            self.status = format!("Found {} videos at {}", records.len(), url);
        }
        self.list.set_records(url, records);
    }

    /// Play `url` if it is a video, otherwise scan it as a page
    pub fn load_from_url(&mut self, url: &str) {
        if self.scanner.is_direct_video(url) {
            self.load_video(url, &filename_from_link(url));
        } else {
            self.scan_url(url);
        }
    }

    /// Play the highlighted list entry
    pub fn play_selected(&mut self) {
        if let Some(record) = self.list.selected().cloned() {
            self.load_video(&record.locator, &record.name);
        }
    }

    pub fn load_sample_video(&mut self) {
        let url = self.sample_video_url.clone();
        info!("Loading sample video: {}", url);
        self.load_video(&url, &filename_from_link(&url));
    }

    /// Bind, load and play. Any failing step aborts the rest.
    pub fn load_video(&mut self, locator: &str, name: &str) -> bool {
        info!("Loading video: {}", locator);

        if !self.video.is_initialized() {
            let reason = self
                .video
                .initialization_error()
                .unwrap_or("unknown error")
                .to_string();
            self.show_error(format!("Video service not initialized: {}", reason));
            return false;
        }

        if !self.video.bind_render_target(&self.surface) {
            self.show_error("Failed to attach the video window".to_string());
            return false;
        }

        if !self.video.load(locator) {
            self.show_error(format!("Failed to load video: {}", name));
            return false;
        }

        if !self.video.play() {
            self.show_error(format!("Failed to play video: {}", name));
            return false;
        }

        self.sync.start(Instant::now());
        self.controls.borrow_mut().set_enabled(true);
        self.surface
            .set_title(&format!("{} - Playing: {}", self.title, name));
        self.status = format!("Playing: {}", name);
        true
    }

    pub fn toggle_play_pause(&mut self) {
        if !self.video.is_initialized() {
            return;
        }

        if self.video.current_locator().is_none() {
            self.play_selected();
        } else if self.video.is_playing() {
            self.video.pause();
            self.status = "Paused".to_string();
        } else if self.video.play() {
            if !self.sync.is_active() {
                self.sync.start(Instant::now());
            }
            self.status = "Playing".to_string();
        }
    }

    pub fn stop_video(&mut self) {
        self.video.stop();
        self.sync.stop();
        self.controls.borrow_mut().reset_controls();
        self.surface.set_title(&self.title);
        self.status = "Stopped".to_string();
    }

    /// Seek to a slider value
    pub fn set_video_position(&mut self, value: i32) {
        let ratio = {
            let mut controls = self.controls.borrow_mut();
            controls.set_position(value);
            controls.position_ratio()
        };
        self.video.set_position(ratio);
    }

    /// Move the slider by `delta` and seek there
    pub fn seek_by(&mut self, delta: i32) {
        let value = self.controls.borrow().position() + delta;
        self.set_video_position(value);
    }

    /// The user grabbed the position slider
    pub fn begin_seek(&mut self) {
        self.controls.borrow_mut().press();
    }

    /// Slider moved while held; the video follows on release
    pub fn drag_seek(&mut self, value: i32) {
        self.controls.borrow_mut().set_position(value);
    }

    pub fn end_seek(&mut self) {
        let value = self.controls.borrow_mut().release();
        self.set_video_position(value);
    }

    pub fn set_volume(&mut self, volume: i32) {
        let volume = {
            let mut controls = self.controls.borrow_mut();
            controls.set_volume(volume);
            controls.volume()
        };
        self.video.set_volume(volume);
    }

    pub fn change_volume(&mut self, delta: i32) {
        let volume = self.controls.borrow().volume() + delta;
        self.set_volume(volume);
    }

    pub fn toggle_fullscreen(&mut self) {
        self.surface.toggle_fullscreen();
    }

    /// Run the position/time poll if its interval has elapsed
    pub fn tick(&mut self, now: Instant) {
        if self.sync.due(now) {
            self.update_video_position();
        }
    }

    /// Push the current position and time into the controls
    pub fn update_video_position(&mut self) {
        if !self.video.is_initialized() {
            return;
        }
        if self.controls.borrow().is_position_slider_pressed() {
            return;
        }

        let position = self.video.get_position();
        let (current, total) = self.video.get_time_display();

        let mut controls = self.controls.borrow_mut();
        let value = (position * controls.range() as f64) as i32;
        controls.set_position(value);
        controls.set_time(&current, &total);
    }

    /// Release everything. Each step runs even if an earlier one failed.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }

        info!("Closing application");
        self.video.dispose();
        self.scanner.cleanup();
        if self.sync.is_active() {
            self.sync.stop();
        }
        self.closed = true;
    }

    pub fn show_error(&mut self, message: String) {
        error!("{}", message);
        self.status = message.clone();
        self.error = Some(message);
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn controls(&self) -> Ref<'_, ControlPanel> {
        self.controls.borrow()
    }

    pub fn list(&self) -> &FilePanel {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut FilePanel {
        &mut self.list
    }

    pub fn location(&self) -> &UrlInput {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut UrlInput {
        &mut self.location
    }

    pub fn console(&self) -> &DebugConsole {
        &self.console
    }

    pub fn video(&self) -> &VideoService {
        &self.video
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// When the event loop must wake for the next poll
    pub fn next_tick(&self) -> Option<Instant> {
        self.sync.next_deadline()
    }

    pub fn is_syncing(&self) -> bool {
        self.sync.is_active()
    }

    pub fn last_directory(&self) -> &Path {
        self.files.last_directory()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

fn is_web_url(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
