//! Common error types used throughout scenereel.
//!
//! These cover the failures that can happen before any external tool runs:
//! a structurally invalid scene list, bad timing inputs, and I/O while reading
//! the scene list.

/// Common error type for scenereel.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The scene list is structurally invalid.
    #[error("Invalid scene list: {0}")]
    InvalidSceneList(String),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new InvalidSceneList error.
    pub fn invalid_scene_list<S: Into<String>>(msg: S) -> Self {
        Self::InvalidSceneList(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
