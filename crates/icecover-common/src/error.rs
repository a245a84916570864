//! Error types for icecover value types.

use thiserror::Error;

/// Result type alias using IcecoverError.
pub type IcecoverResult<T> = Result<T, IcecoverError>;

/// Errors raised while constructing navigation values.
#[derive(Debug, Error)]
pub enum IcecoverError {
    #[error("Invalid grid reference: {0}")]
    InvalidGrid(String),

    #[error("Unknown tile: {0}")]
    UnknownTile(String),

    #[error("Unknown sensor: {0}")]
    UnknownSensor(String),
}

impl IcecoverError {
    /// Create an InvalidGrid error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGrid(msg.into())
    }
}
