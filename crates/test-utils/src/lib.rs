//! Test support for the icecover crates.
//!
//! - [`SceneBuilder`] assembles small synthetic AVHRR/VIIRS passes on a
//!   patch of the Norwegian Sea tile, with u16 layers encoded the way the
//!   decoders hand them over.
//! - [`fixtures`] holds known tile positions, a descending polar track and a
//!   compact coefficient table with well separated classes.
//! - [`paths`] finds the bundled `config/` files (`ICECOVER_CONFIG_DIR`
//!   overrides the location).
//!
//! ```ignore
//! use test_utils::{require_config_file, SceneBuilder};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Resolve a bundled configuration file, or skip the calling test.
///
/// ```ignore
/// #[test]
/// fn test_bundled_table() {
///     let path = require_config_file!("coefficients.yaml");
///     let table = CoefficientTable::from_yaml_file(path).unwrap();
/// }
/// ```
#[macro_export]
macro_rules! require_config_file {
    ($name:expr) => {{
        match $crate::find_config_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Config file '{}' not found. Set ICECOVER_CONFIG_DIR.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Approximate floating-point equality; operands are widened to `f64`.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Approximate equality of two `GeoPosition`s in degrees.
///
/// Longitudes are compared modulo 360°, so 190° and −170° are equal.
#[macro_export]
macro_rules! assert_geo_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left = $left;
        let right = $right;
        let epsilon: f64 = $epsilon as f64;
        let dlat = (left.lat - right.lat).abs();
        let dlon = ((left.lon - right.lon + 180.0).rem_euclid(360.0) - 180.0).abs();
        if dlat > epsilon || dlon > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{}`,\n right: `{}`,\n  dlat: `{:?}`, dlon: `{:?}`, epsilon `{:?}`",
                left, right, dlat, dlon, epsilon
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    use icecover_common::GeoPosition;

    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(-5.5_f32, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_geo_comparison_wraps_longitude() {
        assert_geo_approx_eq!(GeoPosition::new(70.0, 190.0), GeoPosition::new(70.0, -170.0), 1e-9);
        assert_geo_approx_eq!(GeoPosition::new(80.0, -179.9999), GeoPosition::new(80.0, 180.0), 1e-3);
    }

    #[test]
    #[should_panic(expected = "dlon")]
    fn test_geo_comparison_fails_on_longitude() {
        assert_geo_approx_eq!(GeoPosition::new(70.0, 10.0), GeoPosition::new(70.0, 10.1), 1e-3);
    }
}
