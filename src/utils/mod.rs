//! Utility module for TPlayer
//!
//! This module provides common utilities used throughout the application:
//! - Error handling with custom error types
//! - Configuration management
//! - The process-wide logging handle
//! - Clock-style time formatting

pub mod config;
pub mod error;
pub mod logger;
pub mod time;

// Re-export commonly used items
pub use config::{Config, GeneralConfig, NetworkConfig, PlayerConfig, WindowConfig};
pub use error::{IntoPlayerError, Result, TPlayerError};
pub use time::{format_long, format_short, time_components};

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
