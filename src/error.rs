//! HandPuppet Error Types
//!
//! Centralized error handling for the gesture and animation engine.

use thiserror::Error;

/// Central error type for HandPuppet
#[derive(Error, Debug)]
pub enum PuppetError {
    #[error("Landmark error: {0}")]
    Landmarks(String),

    #[error("Animation error: {0}")]
    Animation(String),

    #[error("Asset error: {0}")]
    Asset(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IPC error: {0}")]
    Ipc(String),

    #[error("Lock poisoned: {0}")]
    Lock(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for HandPuppet operations
pub type PuppetResult<T> = Result<T, PuppetError>;

/// Helper to convert Mutex poison errors
impl<T> From<std::sync::PoisonError<T>> for PuppetError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        PuppetError::Lock(err.to_string())
    }
}
