//! User interface for TPlayer
//!
//! The controls live in the terminal (ratatui over crossterm) and the
//! video plays in a separate native window. `MainWindow` holds all of the
//! widget state and is the only thing that talks to the services.

mod control_panel;
mod debug_console;
mod file_panel;
pub mod input;
mod main_window;
mod sync;
mod terminal;
mod url_input;

pub use control_panel::{ControlPanel, DEFAULT_TIME_LABEL, PAUSE_LABEL, PLAY_LABEL};
pub use debug_console::{DebugConsole, MAX_LINES};
pub use file_panel::FilePanel;
pub use input::{Action, Focus};
pub use main_window::MainWindow;
pub use sync::SyncLoop;
pub use terminal::{restore_terminal, TerminalUi};
pub use url_input::UrlInput;
