//! Common test fixtures for icecover tests.

use icecover_common::{GeoPosition, TileId};

/// Positions known to lie in exactly one tile, or in none.
pub fn tile_fixtures() -> Vec<(GeoPosition, Option<TileId>)> {
    vec![
        (GeoPosition::new(58.0, 10.0), Some(TileId::NorthSea)),
        (GeoPosition::new(75.0, 20.0), Some(TileId::NorwegianSea)),
        (GeoPosition::new(72.0, -40.0), Some(TileId::Greenland)),
        (GeoPosition::new(55.0, -30.0), Some(TileId::Atlantic)),
        (GeoPosition::new(0.0, 0.0), None),
        (GeoPosition::new(90.0, 0.0), None),
        (GeoPosition::new(-90.0, 0.0), None),
    ]
}

/// A descending pass over the Norwegian Sea, one point per degree of
/// latitude, drifting eastwards.
pub fn descending_track() -> Vec<GeoPosition> {
    (0..25)
        .map(|i| GeoPosition::new(85.0 - i as f64, 40.0 - 1.5 * i as f64))
        .collect()
}

/// Nominal altitude of a polar orbiter (km).
pub const POLAR_ORBIT_ALTITUDE_KM: f64 = 850.0;

/// A small coefficient table covering every day mode over sea and land,
/// plus night over sea.
///
/// The classes are well separated in T4 so tests can steer the outcome:
/// ice ~255 K, open water ~272 K, cloud ~235 K. Day over sea also uses
/// the T4 minus NWP surface temperature difference when a field is given.
pub const COEFFICIENTS_YAML: &str = r#"
- mode: day
  surface: sea
  priors: { ice: 0.34, free: 0.33, cloud: 0.33 }
  features:
    - feature: a1
      angle: solar
      ice:   { mean: [65.0, -0.2], std: [12.0] }
      free:  { mean: [6.0], std: [3.0] }
      cloud: { mean: [50.0, -0.1], std: [18.0] }
    - feature: t4
      ice:   { mean: [255.0], std: [6.0] }
      free:  { mean: [272.0], std: [2.0] }
      cloud: { mean: [235.0], std: [10.0] }
    - feature: t4_minus_nwp
      ice:   { mean: [-2.0], std: [3.0] }
      free:  { mean: [0.0], std: [1.5] }
      cloud: { mean: [-20.0], std: [6.0] }
- mode: day
  surface: land
  features:
    - feature: t4
      ice:   { mean: [258.0], std: [8.0] }
      free:  { mean: [280.0], std: [6.0] }
      cloud: { mean: [235.0], std: [10.0] }
- mode: day_using_3b
  surface: sea
  features:
    - feature: a3_over_a1
      angle: solar
      ice:   { mean: [0.1], std: [0.08] }
      free:  { mean: [0.5], std: [0.3] }
      cloud: { mean: [0.4], std: [0.2] }
    - feature: t4
      ice:   { mean: [255.0], std: [6.0] }
      free:  { mean: [272.0], std: [2.0] }
      cloud: { mean: [235.0], std: [10.0] }
- mode: night
  surface: sea
  features:
    - feature: t4_minus_t5
      angle: satellite
      ice:   { mean: [0.4], std: [0.4] }
      free:  { mean: [1.2, 0.01], std: [0.5] }
      cloud: { mean: [2.5], std: [1.5] }
    - feature: t4
      ice:   { mean: [250.0], std: [8.0] }
      free:  { mean: [271.5], std: [1.5] }
      cloud: { mean: [232.0], std: [12.0] }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_descends() {
        let track = descending_track();
        assert!(track.windows(2).all(|w| w[1].lat < w[0].lat && w[1].lon < w[0].lon));
    }
}
