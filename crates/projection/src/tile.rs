//! Lookup of the regional tile containing a geographic position.

use icecover_common::{GeoPosition, TileId};
use tracing::debug;

use crate::index::{planar_to_index, GridLookup};
use crate::polar::{geo_to_planar, ProjectionSpec};

/// Find the first tile, in [`TileId::ALL`] order, whose grid contains the
/// position. Uses the spherical preset, as the tile grids are defined on it.
pub fn geo_to_tile_id(geo: GeoPosition) -> Option<TileId> {
    let pos = match geo_to_planar(geo, ProjectionSpec::Spherical) {
        Ok(pos) => pos,
        Err(e) => {
            debug!(position = %geo, error = %e, "Tile lookup failed to project position");
            return None;
        }
    };

    TileId::ALL
        .iter()
        .copied()
        .find(|tile| matches!(planar_to_index(&tile.reference(), pos), GridLookup::Inside(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_southern_norway_is_north_sea() {
        assert_eq!(geo_to_tile_id(GeoPosition::new(58.0, 10.0)), Some(TileId::NorthSea));
    }

    #[test]
    fn test_south_pole_has_no_tile() {
        assert_eq!(geo_to_tile_id(GeoPosition::new(-90.0, 0.0)), None);
    }

    #[test]
    fn test_equator_has_no_tile() {
        assert_eq!(geo_to_tile_id(GeoPosition::new(0.0, 0.0)), None);
    }
}
