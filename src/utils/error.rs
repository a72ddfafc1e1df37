//! Error types for TPlayer
//!
//! Internal layers (the native engine, its IPC channel, configuration)
//! report failures through `TPlayerError`. The public playback and
//! discovery services turn these into log lines and sentinel values.

use thiserror::Error;

/// Main error type for TPlayer
#[derive(Error, Debug)]
pub enum TPlayerError {
    /// The native player was never constructed
    #[error("Video service not initialized")]
    NotInitialized,

    /// Native engine rejected an operation
    #[error("Engine error: {0}")]
    Engine(String),

    /// Engine control channel failure
    #[error("IPC error: {0}")]
    Ipc(String),

    /// Render surface could not be bound
    #[error("Render target error: {0}")]
    RenderTarget(String),

    /// HTTP transport errors
    #[error("Network error: {0}")]
    Network(String),

    /// File I/O errors
    #[error("File error: {0}")]
    FileIO(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error for unexpected situations
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for TPlayerError {
    fn from(err: serde_json::Error) -> Self {
        TPlayerError::Ipc(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for TPlayerError {
    fn from(err: reqwest::Error) -> Self {
        TPlayerError::Network(err.to_string())
    }
}

/// Convenience type alias for Results in TPlayer
pub type Result<T> = std::result::Result<T, TPlayerError>;

/// Extension trait for converting other errors to TPlayerError
pub trait IntoPlayerError<T> {
    /// Convert this error into a TPlayerError with the given context
    fn engine_err(self, context: &str) -> Result<T>;
    fn ipc_err(self, context: &str) -> Result<T>;
    fn network_err(self, context: &str) -> Result<T>;
    fn config_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> IntoPlayerError<T> for std::result::Result<T, E> {
    fn engine_err(self, context: &str) -> Result<T> {
        self.map_err(|e| TPlayerError::Engine(format!("{}: {}", context, e)))
    }

    fn ipc_err(self, context: &str) -> Result<T> {
        self.map_err(|e| TPlayerError::Ipc(format!("{}: {}", context, e)))
    }

    fn network_err(self, context: &str) -> Result<T> {
        self.map_err(|e| TPlayerError::Network(format!("{}: {}", context, e)))
    }

    fn config_err(self, context: &str) -> Result<T> {
        self.map_err(|e| TPlayerError::Config(format!("{}: {}", context, e)))
    }
}
