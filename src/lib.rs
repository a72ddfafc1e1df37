//! TPlayer - a small video player
//!
//! Browse a local folder or scan a web page for video links, then play
//! the pick in a native window driven by an external engine.

pub mod discovery;
pub mod player;
pub mod ui;
pub mod utils;
pub mod window;

pub use utils::error::{Result, TPlayerError};
