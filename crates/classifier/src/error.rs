//! Error types for the classifier.
//!
//! [`ClassifierError`] covers setup failures that abort a pass before any
//! pixel is touched. [`EstimatorError`] and [`Reflectance3bError`] are
//! per-pixel and never abort a pass.

use channel_data::ChannelDataError;
use thiserror::Error;

use crate::pixel::{AlgorithmMode, Surface};

/// Fatal setup errors of a classification pass.
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// A required channel or ancillary layer is missing or malformed.
    #[error(transparent)]
    Channel(#[from] ChannelDataError),

    /// An ancillary product is not on the image grid.
    #[error("{product} grid {actual} does not match image grid {expected}")]
    GridMismatch {
        product: String,
        expected: String,
        actual: String,
    },

    /// The caller-provided output does not match the image grid.
    #[error("output is {actual_width}x{actual_height}, image grid is {width}x{height}")]
    OutputSizeMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    #[error("invalid classifier configuration: {0}")]
    InvalidConfig(String),

    #[error("coefficient table is empty")]
    EmptyCoefficientTable,

    /// The coefficient table could not be parsed or is inconsistent.
    #[error("invalid coefficient table: {0}")]
    Coefficients(String),
}

impl ClassifierError {
    /// Create a GridMismatch error.
    pub fn grid_mismatch(
        product: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Self::GridMismatch {
            product: product.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a Coefficients error.
    pub fn coefficients(msg: impl Into<String>) -> Self {
        Self::Coefficients(msg.into())
    }
}

impl From<serde_yaml::Error> for ClassifierError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Coefficients(err.to_string())
    }
}

/// Result type for classifier setup.
pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Per-pixel failure of the probability estimator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimatorError {
    #[error("no coefficient set for {mode} over {surface}")]
    NoCoefficients { mode: AlgorithmMode, surface: Surface },

    #[error("no feature of the {mode} coefficient set is available for this pixel")]
    NoUsableFeatures { mode: AlgorithmMode },

    /// A class-conditional distribution evaluated to an unusable shape.
    #[error("invalid {class} distribution for feature {feature}: mean {mean}, std {std}")]
    InvalidDistribution {
        feature: String,
        class: String,
        mean: f64,
        std: f64,
    },
}

/// Per-pixel failure of the synthetic channel-3b reflectance.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Reflectance3bError {
    #[error("no channel 3b calibration for platform '{0}'")]
    UnknownPlatform(String),

    /// The sun is at or below the horizon or the solar term vanishes.
    #[error("no usable solar signal at solar zenith {0}")]
    NoSolarSignal(f64),

    #[error("missing brightness temperature input")]
    MissingInput,
}
