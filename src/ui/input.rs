//! Key bindings for the control surface
//!
//! Terminal keys and video window events are both reduced to an
//! `Action`, and `apply` is the one place actions reach the main window.

use crate::ui::MainWindow;
use crate::window::VideoSurface;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Slider units moved per seek key press
pub const SEEK_STEP: i32 = 10;

/// Volume points per volume key press
pub const VOLUME_STEP: i32 = 5;

/// Which pane receives typed keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Location,
    List,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Location => Focus::List,
            Focus::List => Focus::Location,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    DismissError,
    NextFocus,
    FocusLocation,

    // location input
    Insert(char),
    Backspace,
    CursorLeft,
    CursorRight,
    ClearInput,
    SubmitLocation,
    ScanLocation,

    // list
    SelectNext,
    SelectPrevious,
    PlaySelected,

    // transport
    TogglePlayPause,
    Stop,
    SeekBy(i32),
    VolumeBy(i32),
    ToggleFullscreen,
    LoadSample,
}

/// Translate a terminal key press
pub fn map_key(focus: Focus, key: &KeyEvent, error_open: bool) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
        return Some(Action::Quit);
    }
    if error_open {
        return Some(Action::DismissError);
    }
    if key.code == KeyCode::Tab {
        return Some(Action::NextFocus);
    }

    match focus {
        Focus::Location => match key.code {
            KeyCode::Enter => Some(Action::SubmitLocation),
            KeyCode::Char('s') if ctrl => Some(Action::ScanLocation),
            KeyCode::Char('u') if ctrl => Some(Action::ClearInput),
            KeyCode::Char(c) if !ctrl => Some(Action::Insert(c)),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Left => Some(Action::CursorLeft),
            KeyCode::Right => Some(Action::CursorRight),
            KeyCode::Esc => Some(Action::NextFocus),
            _ => None,
        },
        Focus::List => match key.code {
            KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrevious),
            KeyCode::Enter => Some(Action::PlaySelected),
            KeyCode::Char('o') | KeyCode::Char('/') => Some(Action::FocusLocation),
            KeyCode::Char('q') => Some(Action::Quit),
            code => transport_key(code),
        },
    }
}

/// Keys shared by the list pane and the video window
pub fn transport_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char(' ') => Some(Action::TogglePlayPause),
        KeyCode::Char('s') => Some(Action::Stop),
        KeyCode::Left => Some(Action::SeekBy(-SEEK_STEP)),
        KeyCode::Right => Some(Action::SeekBy(SEEK_STEP)),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::VolumeBy(VOLUME_STEP)),
        KeyCode::Char('-') => Some(Action::VolumeBy(-VOLUME_STEP)),
        KeyCode::Char('f') => Some(Action::ToggleFullscreen),
        KeyCode::Char('t') => Some(Action::LoadSample),
        _ => None,
    }
}

/// Run `action` against the main window. Returns true when the user
/// asked to quit.
pub fn apply<S: VideoSurface>(action: Action, window: &mut MainWindow<S>, focus: &mut Focus) -> bool {
    match action {
        Action::Quit => return true,
        Action::DismissError => window.dismiss_error(),
        Action::NextFocus => *focus = focus.next(),
        Action::FocusLocation => *focus = Focus::Location,
        Action::Insert(c) => window.location_mut().insert(c),
        Action::Backspace => window.location_mut().backspace(),
        Action::CursorLeft => window.location_mut().move_left(),
        Action::CursorRight => window.location_mut().move_right(),
        Action::ClearInput => window.location_mut().clear(),
        Action::SubmitLocation => {
            window.submit_location();
            if !window.list().records().is_empty() {
                *focus = Focus::List;
            }
        }
        Action::ScanLocation => {
            window.scan_location();
            if !window.list().records().is_empty() {
                *focus = Focus::List;
            }
        }
        Action::SelectNext => window.list_mut().select_next(),
        Action::SelectPrevious => window.list_mut().select_previous(),
        Action::PlaySelected => window.play_selected(),
        Action::TogglePlayPause => window.toggle_play_pause(),
        Action::Stop => window.stop_video(),
        Action::SeekBy(delta) => window.seek_by(delta),
        Action::VolumeBy(delta) => window.change_volume(delta),
        Action::ToggleFullscreen => window.toggle_fullscreen(),
        Action::LoadSample => window.load_sample_video(),
    }
    false
}
