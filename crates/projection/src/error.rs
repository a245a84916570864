//! Error types for projection and track geometry.

use thiserror::Error;

/// Failure of a single coordinate conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// Input coordinates are not finite or outside the valid range.
    #[error("invalid input coordinates: {0}")]
    InvalidInput(String),

    /// The projection produced a non-finite result.
    #[error("projection produced a non-finite result: {0}")]
    NonFinite(String),

    /// The inverse latitude iteration did not converge.
    #[error("inverse projection did not converge after {0} iterations")]
    NoConvergence(usize),
}

/// Failure of a sub-track or viewing-angle query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubtrackError {
    /// Fewer than two track points could be projected.
    #[error("sub-track has {0} usable points, need at least 2")]
    InsufficientTrack(usize),

    /// The target lies outside the northern operating region.
    #[error("position {0} is outside the northern operating region")]
    OutsideOperatingRegion(String),

    /// The two track points share a latitude, so the segment is undefined.
    #[error("track points have identical latitude {0}")]
    IdenticalLatitudes(f64),

    /// The two track points share a longitude, so the direction is ambiguous.
    #[error("track points have identical longitude {0}, direction is ambiguous")]
    AmbiguousDirection(f64),

    /// An intermediate spherical-trigonometry value was not finite.
    #[error("non-finite track geometry: {0}")]
    NonFiniteGeometry(String),

    /// Satellite altitude must be positive.
    #[error("invalid satellite altitude {0} km")]
    InvalidAltitude(f64),

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}
