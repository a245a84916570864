//! Geographic and planar positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    /// Latitude in degrees, positive north
    pub lat: f64,
    /// Longitude in degrees, positive east
    pub lon: f64,
}

impl GeoPosition {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Latitude lies within [-90, 90] and both components are finite.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && (-90.0..=90.0).contains(&self.lat)
    }

    /// Copy of this position with longitude folded into (-180, 180].
    pub fn normalized(&self) -> Self {
        Self {
            lat: self.lat,
            lon: normalize_longitude(self.lon),
        }
    }
}

impl fmt::Display for GeoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}N, {:.4}E)", self.lat, self.lon)
    }
}

/// Fold a longitude in degrees into (-180, 180].
pub fn normalize_longitude(lon: f64) -> f64 {
    if !lon.is_finite() {
        return lon;
    }
    let mut l = lon % 360.0;
    if l > 180.0 {
        l -= 360.0;
    } else if l <= -180.0 {
        l += 360.0;
    }
    l
}

/// A position in the polar stereographic user coordinate system (km).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarPosition {
    /// Eastings in kilometres
    pub x: f64,
    /// Northings in kilometres
    pub y: f64,
}

impl PlanarPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another planar position (km).
    pub fn distance(&self, other: &PlanarPosition) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for PlanarPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3} km, {:.3} km)", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(180.0), 180.0);
        assert_eq!(normalize_longitude(-180.0), 180.0);
        assert_eq!(normalize_longitude(370.0), 10.0);
        assert_eq!(normalize_longitude(25.5), 25.5);
    }

    #[test]
    fn test_geo_validity() {
        assert!(GeoPosition::new(70.0, 20.0).is_valid());
        assert!(!GeoPosition::new(91.0, 20.0).is_valid());
        assert!(!GeoPosition::new(f64::NAN, 20.0).is_valid());
    }

    #[test]
    fn test_planar_distance() {
        let a = PlanarPosition::new(0.0, 0.0);
        let b = PlanarPosition::new(3.0, -4.0);
        assert_eq!(a.distance(&b), 5.0);
    }
}
