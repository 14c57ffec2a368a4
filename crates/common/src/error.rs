//! Common error types.

use thiserror::Error;

/// Error type for the fallible edges of the overlay: configuration loading,
/// script host setup and script execution.
///
/// Panel and console operations never fail; they degrade to no-ops.
#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Script error: {0}")]
    Script(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type OverlayResult<T> = Result<T, OverlayError>;

impl OverlayError {
    pub fn script(msg: impl Into<String>) -> Self {
        Self::Script(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }
}
