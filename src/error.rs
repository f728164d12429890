//! Error type for the I/O edges (config files, high score storage)
//!
//! Gameplay never fails: defeat and destruction are state transitions.

/// Errors raised while loading or saving config and high score data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Storage unavailable")]
    StorageUnavailable,
}

pub type Result<T> = std::result::Result<T, Error>;
