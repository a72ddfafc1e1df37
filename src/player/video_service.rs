//! Playback façade
//!
//! Engine construction is attempted exactly once. If it fails the
//! service stays uninitialized for the life of the process and every
//! operation logs and returns its failure sentinel.

use crate::player::{NativePlayer, PlaybackState, RenderTarget, StateCallbacks};
use crate::utils::error::{Result, TPlayerError};
use crate::utils::{clamp, format_short};
use log::{error, info};

/// Time display used whenever current or total time is unknown
const UNKNOWN_TIME: &str = "00:00";

/// Playback façade over a native engine
pub struct VideoService {
    player: Option<Box<dyn NativePlayer>>,
    initialization_error: Option<String>,
    current_locator: Option<String>,
    state: PlaybackState,
    callbacks: StateCallbacks,
}

impl VideoService {
    /// Construct the engine with `init` and apply the default volume
    ///
    /// # Arguments
    ///
    /// * `init` - Builds the native engine; called exactly once
    /// * `default_volume` - Volume applied after a successful build
    ///
    /// # Returns
    ///
    /// Always a service. A failed build leaves it permanently
    /// uninitialized, see [`VideoService::initialization_error`].
    pub fn new<F>(init: F, default_volume: i32) -> Self
    where
        F: FnOnce() -> Result<Box<dyn NativePlayer>>,
    {
        let mut service = Self {
            player: None,
            initialization_error: None,
            current_locator: None,
            state: PlaybackState::Stopped,
            callbacks: StateCallbacks::default(),
        };

        let started = init().and_then(|mut player| match player.set_volume(default_volume) {
            Ok(()) => Ok(player),
            Err(e) => {
                let _ = player.shutdown();
                Err(e)
            }
        });

        match started {
            Ok(player) => {
                service.player = Some(player);
                info!("Video engine initialized successfully");
            }
            Err(e) => {
                error!("Video engine initialization failed: {}", e);
                service.initialization_error = Some(e.to_string());
            }
        }

        service
    }

    pub fn is_initialized(&self) -> bool {
        self.player.is_some()
    }

    /// Why construction failed, if it did
    pub fn initialization_error(&self) -> Option<&str> {
        self.initialization_error.as_deref()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Locator of the loaded media
    pub fn current_locator(&self) -> Option<&str> {
        self.current_locator.as_deref()
    }

    pub fn set_on_state_change<F: FnMut(PlaybackState) + 'static>(&mut self, callback: F) {
        self.callbacks.on_state_change = Some(Box::new(callback));
    }

    pub fn set_on_position_change<F: FnMut(f64) + 'static>(&mut self, callback: F) {
        self.callbacks.on_position_change = Some(Box::new(callback));
    }

    pub fn set_on_time_change<F: FnMut(i64, i64) + 'static>(&mut self, callback: F) {
        self.callbacks.on_time_change = Some(Box::new(callback));
    }

    /// Direct video output into `target`'s window
    ///
    /// # Arguments
    ///
    /// * `target` - Surface providing the native window handle
    ///
    /// # Returns
    ///
    /// Returns `true` when the engine accepted the window
    pub fn bind_render_target(&mut self, target: &dyn RenderTarget) -> bool {
        let Some(player) = self.engine() else {
            return false;
        };

        match target.render_handle().and_then(|handle| player.set_window(handle)) {
            Ok(()) => {
                info!("Render target bound");
                true
            }
            Err(e) => {
                error!("Failed to bind render target: {}", e);
                false
            }
        }
    }

    /// Load media from a file path or URL without starting it
    ///
    /// # Arguments
    ///
    /// * `locator` - `file://` path or network URL
    ///
    /// # Returns
    ///
    /// Returns `true` when the media was accepted
    pub fn load(&mut self, locator: &str) -> bool {
        let Some(player) = self.engine() else {
            return false;
        };

        match player.load(locator) {
            Ok(()) => {
                info!("Media loaded: {}", locator);
                self.current_locator = Some(locator.to_string());
                self.state = PlaybackState::Stopped;
                true
            }
            Err(e) => {
                error!("Failed to load media: {}", e);
                false
            }
        }
    }

    /// Start playback; notifies `playing` on success
    pub fn play(&mut self) -> bool {
        let Some(player) = self.engine() else {
            return false;
        };

        match player.play() {
            Ok(()) => {
                info!("Video playback started");
                self.transition(PlaybackState::Playing);
                true
            }
            Err(e) => {
                error!("Failed to start playback: {}", e);
                false
            }
        }
    }

    pub fn pause(&mut self) {
        let Some(player) = self.engine() else {
            return;
        };

        match player.pause() {
            Ok(()) => {
                info!("Video playback paused");
                self.transition(PlaybackState::Paused);
            }
            Err(e) => error!("Failed to pause playback: {}", e),
        }
    }

    pub fn stop(&mut self) {
        let Some(player) = self.engine() else {
            return;
        };

        match player.stop() {
            Ok(()) => {
                info!("Video playback stopped");
                self.transition(PlaybackState::Stopped);
            }
            Err(e) => error!("Failed to stop playback: {}", e),
        }
    }

    pub fn is_playing(&mut self) -> bool {
        let Some(player) = self.player.as_mut() else {
            return false;
        };

        player.is_playing().unwrap_or_else(|e| {
            error!("Failed to check playing state: {}", e);
            false
        })
    }

    /// Seek to a fraction of the media; ignored when nothing is loaded
    ///
    /// # Arguments
    ///
    /// * `position` - Target fraction, clamped to 0.0 - 1.0
    pub fn set_position(&mut self, position: f64) {
        if self.current_locator.is_none() {
            return;
        }
        let Some(player) = self.engine() else {
            return;
        };

        if let Err(e) = player.set_position(clamp(position, 0.0, 1.0)) {
            error!("Failed to set position: {}", e);
        }
    }

    /// Fraction of the media played, 0.0 when unknown
    pub fn get_position(&mut self) -> f64 {
        if self.current_locator.is_none() {
            return 0.0;
        }
        let Some(player) = self.player.as_mut() else {
            return 0.0;
        };

        player.position().unwrap_or_else(|e| {
            error!("Failed to get position: {}", e);
            0.0
        })
    }

    pub fn set_volume(&mut self, volume: i32) {
        let Some(player) = self.engine() else {
            return;
        };

        if let Err(e) = player.set_volume(clamp(volume, 0, 100)) {
            error!("Failed to set volume: {}", e);
        }
    }

    /// Volume (0 - 100), 0 on failure
    pub fn get_volume(&mut self) -> i32 {
        let Some(player) = self.player.as_mut() else {
            return 0;
        };

        player.volume().unwrap_or_else(|e| {
            error!("Failed to get volume: {}", e);
            0
        })
    }

    /// Elapsed milliseconds, -1 when unavailable
    pub fn get_time(&mut self) -> i64 {
        self.query_millis("time", |player| player.time())
    }

    /// Media length in milliseconds, -1 when unavailable
    pub fn get_length(&mut self) -> i64 {
        self.query_millis("length", |player| player.length())
    }

    /// Current and total time for display
    ///
    /// # Returns
    ///
    /// `(current, total)` as `MM:SS`, both `00:00` unless both are known
    pub fn get_time_display(&mut self) -> (String, String) {
        let current = self.get_time();
        let total = self.get_length();

        if current != -1 && total != -1 {
            (format_short(current), format_short(total))
        } else {
            (UNKNOWN_TIME.to_string(), UNKNOWN_TIME.to_string())
        }
    }

    /// Push current position and time to the registered callbacks
    pub fn update_callbacks(&mut self) {
        if !self.is_initialized() {
            return;
        }

        if self.callbacks.on_position_change.is_some() {
            let position = self.get_position();
            if let Some(callback) = self.callbacks.on_position_change.as_mut() {
                callback(position);
            }
        }

        if self.callbacks.on_time_change.is_some() {
            let current = self.get_time();
            let total = self.get_length();
            if current != -1 && total != -1 {
                if let Some(callback) = self.callbacks.on_time_change.as_mut() {
                    callback(current, total);
                }
            }
        }
    }

    /// Stop and release the engine. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(mut player) = self.player.take() {
            if let Err(e) = player.stop() {
                error!("Error stopping player during cleanup: {}", e);
            }
            if let Err(e) = player.shutdown() {
                error!("Error releasing player: {}", e);
            }
            info!("Video engine cleaned up");
        }

        self.current_locator = None;
        self.state = PlaybackState::Stopped;
    }

    /// The engine, logging when there is none
    fn engine(&mut self) -> Option<&mut Box<dyn NativePlayer>> {
        if self.player.is_none() {
            error!("{}", TPlayerError::NotInitialized);
        }
        self.player.as_mut()
    }

    fn query_millis<F>(&mut self, what: &str, query: F) -> i64
    where
        F: FnOnce(&mut Box<dyn NativePlayer>) -> Result<i64>,
    {
        if self.current_locator.is_none() {
            return -1;
        }
        let Some(player) = self.player.as_mut() else {
            return -1;
        };

        query(player).unwrap_or_else(|e| {
            error!("Failed to get {}: {}", what, e);
            -1
        })
    }

    fn transition(&mut self, state: PlaybackState) {
        self.state = state;
        if let Some(callback) = self.callbacks.on_state_change.as_mut() {
            callback(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{MockNativePlayer, RenderHandle};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Surface(Option<RenderHandle>);

    impl RenderTarget for Surface {
        fn render_handle(&self) -> Result<RenderHandle> {
            self.0
                .ok_or_else(|| TPlayerError::RenderTarget("no handle".to_string()))
        }
    }

    fn service_with(mock: MockNativePlayer) -> VideoService {
        VideoService::new(move || Ok(Box::new(mock) as Box<dyn NativePlayer>), 50)
    }

    fn engine() -> MockNativePlayer {
        let mut mock = MockNativePlayer::new();
        mock.expect_set_volume().withf(|v| *v == 50).times(1).returning(|_| Ok(()));
        mock
    }

    fn uninitialized() -> VideoService {
        VideoService::new(|| Err(TPlayerError::Engine("mpv binary not found".to_string())), 50)
    }

    fn recorded_states(service: &mut VideoService) -> Rc<RefCell<Vec<PlaybackState>>> {
        let states = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&states);
        service.set_on_state_change(move |state| sink.borrow_mut().push(state));
        states
    }

    #[test]
    fn test_uninitialized_service_returns_sentinels() {
        let mut service = uninitialized();

        assert!(!service.is_initialized());
        assert_eq!(service.initialization_error(), Some("Engine error: mpv binary not found"));
        assert!(!service.play());
        assert!(!service.load("file:///tmp/a.mp4"));
        assert!(!service.bind_render_target(&Surface(Some(RenderHandle::X11(1)))));
        assert!(!service.is_playing());
        assert_eq!(service.get_volume(), 0);
        assert_eq!(service.get_time(), -1);
        assert_eq!(service.get_length(), -1);
        assert_eq!(service.get_position(), 0.0);
        assert_eq!(service.get_time_display(), ("00:00".to_string(), "00:00".to_string()));

        service.pause();
        service.stop();
        service.set_volume(10);
        service.set_position(0.5);
        service.update_callbacks();
        service.dispose();
        assert!(!service.is_initialized());
    }

    #[test]
    fn test_failed_default_volume_fails_initialization() {
        let mut mock = MockNativePlayer::new();
        mock.expect_set_volume()
            .returning(|_| Err(TPlayerError::Ipc("closed".to_string())));
        mock.expect_shutdown().times(1).returning(|| Ok(()));

        let service = service_with(mock);
        assert!(!service.is_initialized());
    }

    #[test]
    fn test_play_notifies_playing() {
        let mut mock = engine();
        mock.expect_load().withf(|l| l == "file:///v/a.mp4").returning(|_| Ok(()));
        mock.expect_play().times(1).returning(|| Ok(()));

        let mut service = service_with(mock);
        let states = recorded_states(&mut service);

        assert!(service.load("file:///v/a.mp4"));
        assert_eq!(service.current_locator(), Some("file:///v/a.mp4"));
        assert!(service.play());
        assert_eq!(service.state(), PlaybackState::Playing);
        assert_eq!(*states.borrow(), vec![PlaybackState::Playing]);
    }

    #[test]
    fn test_rejected_play_does_not_notify() {
        let mut mock = engine();
        mock.expect_play()
            .returning(|| Err(TPlayerError::Engine("no media loaded".to_string())));

        let mut service = service_with(mock);
        let states = recorded_states(&mut service);

        assert!(!service.play());
        assert!(states.borrow().is_empty());
        assert_eq!(service.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_pause_and_stop_notify_only_on_success() {
        let mut mock = engine();
        mock.expect_pause().times(1).returning(|| Ok(()));
        let mut stops = 0;
        mock.expect_stop().times(2).returning(move || {
            stops += 1;
            if stops == 1 {
                Err(TPlayerError::Ipc("timeout".to_string()))
            } else {
                Ok(())
            }
        });

        let mut service = service_with(mock);
        let states = recorded_states(&mut service);

        service.pause();
        service.stop();
        service.stop();
        assert_eq!(*states.borrow(), vec![PlaybackState::Paused, PlaybackState::Stopped]);
    }

    #[test]
    fn test_queries_need_loaded_media() {
        let mut mock = engine();
        mock.expect_position().never();
        mock.expect_time().never();
        mock.expect_set_position().never();

        let mut service = service_with(mock);
        assert_eq!(service.get_position(), 0.0);
        assert_eq!(service.get_time(), -1);
        service.set_position(0.3);
    }

    #[test]
    fn test_time_info_formats_when_both_known() {
        let mut mock = engine();
        mock.expect_load().returning(|_| Ok(()));
        mock.expect_time().returning(|| Ok(65_000));
        let mut lengths = vec![Ok(-1), Ok(600_000)].into_iter();
        mock.expect_length()
            .times(2)
            .returning(move || lengths.next().unwrap_or(Ok(-1)));

        let mut service = service_with(mock);
        service.load("http://host/a.mp4");

        assert_eq!(service.get_time_display(), ("00:00".to_string(), "00:00".to_string()));
        assert_eq!(service.get_time_display(), ("01:05".to_string(), "10:00".to_string()));
    }

    #[test]
    fn test_set_position_and_volume_are_clamped() {
        let mut mock = engine();
        mock.expect_load().returning(|_| Ok(()));
        mock.expect_set_position().withf(|p| *p == 1.0).times(1).returning(|_| Ok(()));
        mock.expect_set_volume().withf(|v| *v == 100).times(1).returning(|_| Ok(()));

        let mut service = service_with(mock);
        service.load("a.mp4");
        service.set_position(1.7);
        service.set_volume(130);
    }

    #[test]
    fn test_query_errors_map_to_sentinels() {
        let mut mock = engine();
        mock.expect_load().returning(|_| Ok(()));
        mock.expect_position().returning(|| Err(TPlayerError::Ipc("gone".to_string())));
        mock.expect_volume().returning(|| Err(TPlayerError::Ipc("gone".to_string())));
        mock.expect_time().returning(|| Err(TPlayerError::Ipc("gone".to_string())));
        mock.expect_is_playing().returning(|| Err(TPlayerError::Ipc("gone".to_string())));

        let mut service = service_with(mock);
        service.load("a.mp4");
        assert_eq!(service.get_position(), 0.0);
        assert_eq!(service.get_volume(), 0);
        assert_eq!(service.get_time(), -1);
        assert!(!service.is_playing());
    }

    #[test]
    fn test_bind_render_target() {
        let mut mock = engine();
        mock.expect_set_window()
            .withf(|h| *h == RenderHandle::X11(0x42))
            .times(1)
            .returning(|_| Ok(()));

        let mut service = service_with(mock);
        assert!(service.bind_render_target(&Surface(Some(RenderHandle::X11(0x42)))));
        assert!(!service.bind_render_target(&Surface(None)));
    }

    #[test]
    fn test_update_callbacks_pushes_position_and_time() {
        let mut mock = engine();
        mock.expect_load().returning(|_| Ok(()));
        mock.expect_position().returning(|| Ok(0.25));
        mock.expect_time().returning(|| Ok(30_000));
        mock.expect_length().returning(|| Ok(120_000));

        let mut service = service_with(mock);
        service.load("a.mp4");

        let seen = Rc::new(RefCell::new(Vec::new()));
        let positions = Rc::clone(&seen);
        service.set_on_position_change(move |p| positions.borrow_mut().push(format!("pos {}", p)));
        let times = Rc::clone(&seen);
        service.set_on_time_change(move |c, t| times.borrow_mut().push(format!("time {} {}", c, t)));

        service.update_callbacks();
        assert_eq!(*seen.borrow(), vec!["pos 0.25".to_string(), "time 30000 120000".to_string()]);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut mock = engine();
        mock.expect_stop().times(1).returning(|| Ok(()));
        mock.expect_shutdown().times(1).returning(|| Ok(()));

        let mut service = service_with(mock);
        service.dispose();
        service.dispose();

        assert!(!service.is_initialized());
        assert!(!service.play());
    }
}
