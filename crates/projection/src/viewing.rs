//! Viewing-angle estimation from the satellite sub-track.
//!
//! The satellite is assumed to sit at the nominal altitude directly above
//! the foot of the target on the sub-track. The zenith angle at the target
//! is then the nadir angle at the satellite plus the central angle between
//! target and foot.

use icecover_common::GeoPosition;

use crate::polar::EARTH_RADIUS_KM;
use crate::subtrack::{closest_point_on_track, closest_track_points, SubTrack};
use crate::SubtrackError;

/// Central angle between two positions on the sphere (radians).
pub fn great_circle_angle(a: GeoPosition, b: GeoPosition) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let cos_c = phi1.sin() * phi2.sin() + phi1.cos() * phi2.cos() * dlon.cos();
    cos_c.clamp(-1.0, 1.0).acos()
}

/// Satellite zenith angle (degrees) for a central angle `gamma` (radians)
/// between the target and the sub-satellite point.
pub fn zenith_from_central_angle(gamma: f64, altitude_km: f64) -> Result<f64, SubtrackError> {
    if !(altitude_km.is_finite() && altitude_km > 0.0) {
        return Err(SubtrackError::InvalidAltitude(altitude_km));
    }

    let r = EARTH_RADIUS_KM;
    let nadir = (r * gamma.sin()).atan2(r + altitude_km - r * gamma.cos());
    let zenith = (nadir + gamma).to_degrees();
    if !zenith.is_finite() {
        return Err(SubtrackError::NonFiniteGeometry(format!(
            "zenith angle for central angle {}",
            gamma
        )));
    }
    Ok(zenith)
}

/// Estimate the satellite zenith angle (degrees) at `target`.
pub fn satellite_zenith(target: GeoPosition, track: &SubTrack) -> Result<f64, SubtrackError> {
    if track.altitude_km.is_nan() || track.altitude_km <= 0.0 {
        return Err(SubtrackError::InvalidAltitude(track.altitude_km));
    }

    let (p1, p2) = closest_track_points(target, &track.points)?;
    let foot = closest_point_on_track(p1, p2, target)?;
    zenith_from_central_angle(great_circle_angle(target, foot), track.altitude_km)
}
