//! North polar stereographic projection.
//!
//! The user coordinate system (UCS) used throughout icecover is a north polar
//! stereographic plane with:
//! - Latitude of true scale: 60°N
//! - Central meridian: 0°
//! - Units: kilometres, origin at the North Pole
//!
//! The x axis points towards 90°E and the y axis towards 180°, so the
//! Greenwich meridian runs along negative y.
//!
//! Two presets differ only in the figure of the Earth: a sphere of radius
//! 6371 km and the WGS84 ellipsoid. The sphere is the ellipsoid with zero
//! eccentricity, so both share one set of formulas (Snyder, Map Projections
//! - A Working Manual, eqs. 21-33 to 21-39 and 7-9).

use icecover_common::{GeoPosition, PlanarPosition};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;
use std::str::FromStr;

use crate::ProjectionError;

/// Mean Earth radius of the spherical preset (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// WGS84 semi-major axis (km).
pub const WGS84_A_KM: f64 = 6378.137;

/// WGS84 inverse flattening.
pub const WGS84_INV_F: f64 = 298.257223563;

/// Latitude of true scale (degrees).
pub const LAT_TRUE_SCALE: f64 = 60.0;

/// Central meridian (degrees).
pub const CENTRAL_MERIDIAN: f64 = 0.0;

const MAX_ITERATIONS: usize = 15;
const CONVERGENCE_TOL: f64 = 1e-12;

/// Projection preset selecting the figure of the Earth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionSpec {
    /// Sphere with radius 6371 km
    #[default]
    Spherical,
    /// WGS84 reference ellipsoid
    Wgs84,
}

impl ProjectionSpec {
    pub fn name(&self) -> &'static str {
        match self {
            ProjectionSpec::Spherical => "spherical",
            ProjectionSpec::Wgs84 => "wgs84",
        }
    }

    /// Build the projection for this preset.
    pub fn projection(&self) -> PolarStereographic {
        match self {
            ProjectionSpec::Spherical => PolarStereographic::new(EARTH_RADIUS_KM, 0.0),
            ProjectionSpec::Wgs84 => {
                let f = 1.0 / WGS84_INV_F;
                PolarStereographic::new(WGS84_A_KM, (f * (2.0 - f)).sqrt())
            }
        }
    }
}

impl fmt::Display for ProjectionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ProjectionSpec {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spherical" | "sphere" => Ok(ProjectionSpec::Spherical),
            "wgs84" | "ellipsoid" => Ok(ProjectionSpec::Wgs84),
            other => Err(ProjectionError::InvalidInput(format!(
                "unknown projection preset '{}'",
                other
            ))),
        }
    }
}

/// North polar stereographic projection parameters.
#[derive(Debug, Clone)]
pub struct PolarStereographic {
    /// Semi-major axis (km)
    pub a: f64,
    /// First eccentricity (0 for a sphere)
    pub e: f64,
    /// Central meridian in radians
    pub lon0: f64,
    /// a * m_c / t_c, the radius scale of the cone
    scale: f64,
}

impl PolarStereographic {
    /// Create a projection with true scale at 60°N on the given figure.
    pub fn new(a: f64, e: f64) -> Self {
        let phi_c = LAT_TRUE_SCALE.to_radians();
        let m_c = Self::m(phi_c, e);
        let t_c = Self::t(phi_c, e);
        Self {
            a,
            e,
            lon0: CENTRAL_MERIDIAN.to_radians(),
            scale: a * m_c / t_c,
        }
    }

    fn m(phi: f64, e: f64) -> f64 {
        let es = e * phi.sin();
        phi.cos() / (1.0 - es * es).sqrt()
    }

    fn t(phi: f64, e: f64) -> f64 {
        let es = e * phi.sin();
        (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(e / 2.0)
    }

    /// Project a geographic position to the UCS plane.
    pub fn forward(&self, geo: GeoPosition) -> Result<PlanarPosition, ProjectionError> {
        if !geo.is_valid() {
            return Err(ProjectionError::InvalidInput(geo.to_string()));
        }
        if (geo.lat + 90.0).abs() < 1e-10 {
            return Err(ProjectionError::NonFinite(
                "south pole maps to infinity".to_string(),
            ));
        }

        let phi = geo.lat.to_radians();
        let dlon = geo.lon.to_radians() - self.lon0;
        let rho = self.scale * Self::t(phi, self.e);

        let pos = PlanarPosition::new(rho * dlon.sin(), -rho * dlon.cos());
        if !pos.is_finite() {
            return Err(ProjectionError::NonFinite(geo.to_string()));
        }
        Ok(pos)
    }

    /// Inverse projection from the UCS plane to a geographic position.
    pub fn inverse(&self, pos: PlanarPosition) -> Result<GeoPosition, ProjectionError> {
        if !pos.is_finite() {
            return Err(ProjectionError::InvalidInput(pos.to_string()));
        }

        let rho = pos.x.hypot(pos.y);
        if rho == 0.0 {
            return Ok(GeoPosition::new(90.0, self.lon0.to_degrees()));
        }

        let t = rho / self.scale;
        let mut phi = FRAC_PI_2 - 2.0 * t.atan();

        if self.e > 0.0 {
            let half_e = self.e / 2.0;
            let mut converged = false;
            for _ in 0..MAX_ITERATIONS {
                let es = self.e * phi.sin();
                let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - es) / (1.0 + es)).powf(half_e)).atan();
                let delta = (next - phi).abs();
                phi = next;
                if delta < CONVERGENCE_TOL {
                    converged = true;
                    break;
                }
            }
            if !converged {
                return Err(ProjectionError::NoConvergence(MAX_ITERATIONS));
            }
        }

        let lam = self.lon0 + pos.x.atan2(-pos.y);
        let geo = GeoPosition::new(phi.to_degrees(), lam.to_degrees()).normalized();
        if !geo.is_finite() {
            return Err(ProjectionError::NonFinite(pos.to_string()));
        }
        Ok(geo)
    }
}

/// Forward-project a geographic position with the given preset.
pub fn geo_to_planar(
    geo: GeoPosition,
    spec: ProjectionSpec,
) -> Result<PlanarPosition, ProjectionError> {
    spec.projection().forward(geo)
}

/// Inverse-project a UCS position with the given preset.
pub fn planar_to_geo(
    pos: PlanarPosition,
    spec: ProjectionSpec,
) -> Result<GeoPosition, ProjectionError> {
    spec.projection().inverse(pos)
}
