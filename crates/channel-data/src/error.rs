//! Error types for channel datasets.

use icecover_common::IcecoverError;
use thiserror::Error;

/// Errors raised while building or resolving channel datasets.
///
/// All of these are setup errors: they are detected before a
/// classification pass starts and abort it.
#[derive(Error, Debug)]
pub enum ChannelDataError {
    /// A layer does not hold exactly one value per grid pixel.
    #[error("layer '{layer}' has {actual} values, grid has {expected} pixels")]
    LayerSizeMismatch {
        layer: String,
        expected: usize,
        actual: usize,
    },

    /// A channel required by the classifier could not be resolved.
    #[error("{sensor} dataset is missing required channel(s): {channels}")]
    MissingChannel { sensor: String, channels: String },

    /// A required ancillary layer is absent.
    #[error("missing layer: {0}")]
    MissingLayer(String),

    /// The dataset header carries an invalid grid.
    #[error(transparent)]
    Grid(#[from] IcecoverError),

    /// The dataset could not be decoded.
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChannelDataError {
    /// Create a LayerSizeMismatch error.
    pub fn layer_size_mismatch(layer: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::LayerSizeMismatch {
            layer: layer.into(),
            expected,
            actual,
        }
    }

    /// Create a MissingLayer error.
    pub fn missing_layer(msg: impl Into<String>) -> Self {
        Self::MissingLayer(msg.into())
    }
}

/// Result type for channel data operations.
pub type Result<T> = std::result::Result<T, ChannelDataError>;
