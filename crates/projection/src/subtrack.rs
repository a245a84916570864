//! Satellite sub-track geometry.
//!
//! A sub-track is the sparse polyline of ground positions beneath the
//! satellite during one pass. For an arbitrary target these functions find
//! the two nearest track points and the foot of the target on the
//! great-circle arc joining them.
//!
//! The nearest-point search measures distance in the north polar
//! stereographic plane, so it is only meaningful for targets in the northern
//! hemisphere. Southern targets are rejected rather than silently
//! mis-ranked.

use icecover_common::geo::normalize_longitude;
use icecover_common::GeoPosition;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::polar::ProjectionSpec;
use crate::viewing::great_circle_angle;
use crate::SubtrackError;

/// Targets closer than this to a track point (radians, ~0.03°) snap to it.
pub const NEAR_ENDPOINT_RAD: f64 = 0.0005;

/// Ground track of one satellite pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTrack {
    /// Track positions in acquisition order
    pub points: Vec<GeoPosition>,
    /// Nominal satellite altitude above the surface (km)
    pub altitude_km: f64,
}

impl SubTrack {
    pub fn new(points: Vec<GeoPosition>, altitude_km: f64) -> Self {
        Self { points, altitude_km }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Find the nearest and second-nearest track points to a target, in that
/// order, measuring distance in the spherical UCS plane.
///
/// Track points that fail to project are skipped.
pub fn closest_track_points(
    target: GeoPosition,
    track: &[GeoPosition],
) -> Result<(GeoPosition, GeoPosition), SubtrackError> {
    if target.lat.is_nan() || target.lat < 0.0 {
        return Err(SubtrackError::OutsideOperatingRegion(target.to_string()));
    }

    let proj = ProjectionSpec::Spherical.projection();
    let target_pos = proj.forward(target.normalized())?;

    let mut first: Option<(f64, GeoPosition)> = None;
    let mut second: Option<(f64, GeoPosition)> = None;
    let mut usable = 0usize;

    for point in track {
        let point = point.normalized();
        let pos = match proj.forward(point) {
            Ok(pos) => pos,
            Err(e) => {
                debug!(position = %point, error = %e, "Skipping unprojectable track point");
                continue;
            }
        };
        usable += 1;

        let dist = target_pos.distance(&pos);
        match first {
            Some((d1, _)) if dist >= d1 => {
                if second.map_or(true, |(d2, _)| dist < d2) {
                    second = Some((dist, point));
                }
            }
            _ => {
                second = first;
                first = Some((dist, point));
            }
        }
    }

    match (first, second) {
        (Some((_, p1)), Some((_, p2))) => Ok((p1, p2)),
        _ => Err(SubtrackError::InsufficientTrack(usable)),
    }
}

/// Foot of the perpendicular from `target` onto the great-circle arc
/// between two track points, solved with spherical trigonometry.
///
/// The foot is clamped to the arc, so a target beyond either end maps to
/// that endpoint.
pub fn closest_point_on_track(
    p1: GeoPosition,
    p2: GeoPosition,
    target: GeoPosition,
) -> Result<GeoPosition, SubtrackError> {
    let (lo, hi) = if p1.lat < p2.lat {
        (p1, p2)
    } else if p1.lat > p2.lat {
        (p2, p1)
    } else {
        return Err(SubtrackError::IdenticalLatitudes(p1.lat));
    };

    let direction = normalize_longitude(hi.lon - lo.lon);
    if direction == 0.0 {
        return Err(SubtrackError::AmbiguousDirection(lo.lon));
    }

    let a = great_circle_angle(lo, target);
    let b = great_circle_angle(hi, target);
    let c = great_circle_angle(lo, hi);

    if a < NEAR_ENDPOINT_RAD {
        return Ok(lo);
    }
    if b < NEAR_ENDPOINT_RAD {
        return Ok(hi);
    }

    // Angle of the triangle at `lo`, between the arc and the target
    let cos_angle = ((b.cos() - a.cos() * c.cos()) / (a.sin() * c.sin())).clamp(-1.0, 1.0);
    let along = (a.sin() * cos_angle).atan2(a.cos());
    if !along.is_finite() {
        return Err(SubtrackError::NonFiniteGeometry(format!(
            "along-track distance for target {}",
            target
        )));
    }
    if along <= 0.0 {
        return Ok(lo);
    }
    if along >= c {
        return Ok(hi);
    }

    let phi1 = lo.lat.to_radians();
    let phi2 = hi.lat.to_radians();
    let dlon = direction.to_radians();

    let bearing = (dlon.sin() * phi2.cos())
        .atan2(phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlon.cos());

    let phi_f = (phi1.sin() * along.cos() + phi1.cos() * along.sin() * bearing.cos())
        .clamp(-1.0, 1.0)
        .asin();

    let cos_dlon_f = ((along.cos() - phi1.sin() * phi_f.sin()) / (phi1.cos() * phi_f.cos()))
        .clamp(-1.0, 1.0);
    let dlon_f = cos_dlon_f.acos().to_degrees().copysign(direction);

    let foot = GeoPosition::new(phi_f.to_degrees(), normalize_longitude(lo.lon + dlon_f));
    if !foot.is_finite() {
        return Err(SubtrackError::NonFiniteGeometry(format!(
            "foot point for target {}",
            target
        )));
    }
    Ok(foot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meridian_track() -> Vec<GeoPosition> {
        (70..=80).map(|lat| GeoPosition::new(lat as f64, 20.0)).collect()
    }

    #[test]
    fn test_closest_points_ordered() {
        let (p1, p2) =
            closest_track_points(GeoPosition::new(75.2, 25.0), &meridian_track()).unwrap();
        assert_eq!(p1, GeoPosition::new(75.0, 20.0));
        assert_eq!(p2, GeoPosition::new(76.0, 20.0));
    }

    #[test]
    fn test_closest_points_single_point_track() {
        let err = closest_track_points(GeoPosition::new(75.0, 20.0), &[GeoPosition::new(75.0, 20.0)]);
        assert_eq!(err, Err(SubtrackError::InsufficientTrack(1)));
    }

    #[test]
    fn test_closest_points_skips_unprojectable() {
        let track = [GeoPosition::new(-90.0, 0.0), GeoPosition::new(70.0, 0.0)];
        let err = closest_track_points(GeoPosition::new(75.0, 20.0), &track);
        assert_eq!(err, Err(SubtrackError::InsufficientTrack(1)));
    }

    #[test]
    fn test_closest_points_rejects_southern_target() {
        let err = closest_track_points(GeoPosition::new(-10.0, 20.0), &meridian_track());
        assert!(matches!(err, Err(SubtrackError::OutsideOperatingRegion(_))));
    }

    #[test]
    fn test_identical_latitudes_fail() {
        let err = closest_point_on_track(
            GeoPosition::new(70.0, 10.0),
            GeoPosition::new(70.0, 14.0),
            GeoPosition::new(71.0, 12.0),
        );
        assert_eq!(err, Err(SubtrackError::IdenticalLatitudes(70.0)));
    }

    #[test]
    fn test_identical_longitudes_fail() {
        let err = closest_point_on_track(
            GeoPosition::new(70.0, 10.0),
            GeoPosition::new(72.0, 10.0),
            GeoPosition::new(71.0, 12.0),
        );
        assert_eq!(err, Err(SubtrackError::AmbiguousDirection(10.0)));
    }

    #[test]
    fn test_near_endpoint_shortcut() {
        let p1 = GeoPosition::new(70.0, 10.0);
        let p2 = GeoPosition::new(72.0, 14.0);
        let foot = closest_point_on_track(p2, p1, GeoPosition::new(70.01, 10.01)).unwrap();
        assert_eq!(foot, p1);
    }

    #[test]
    fn test_foot_beyond_end_clamps() {
        let p1 = GeoPosition::new(70.0, 10.0);
        let p2 = GeoPosition::new(72.0, 14.0);
        let foot = closest_point_on_track(p1, p2, GeoPosition::new(66.0, 2.0)).unwrap();
        assert_eq!(foot, p1);
    }
}
