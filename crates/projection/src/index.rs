//! Mapping between UCS positions and pixel indices of a grid.

use icecover_common::{GeoPosition, GridReference, PixelIndex, PlanarPosition};

use crate::polar::ProjectionSpec;
use crate::ProjectionError;

/// Result of locating a position on a grid.
///
/// Keeps "the projection failed" apart from "the position is valid but
/// falls outside the grid".
#[derive(Debug, Clone, PartialEq)]
pub enum GridLookup {
    /// The position falls on this pixel.
    Inside(PixelIndex),
    /// The position is valid but outside [0, width) x [0, height).
    OutOfGrid,
    /// The geographic position could not be projected.
    ProjectionFailed(ProjectionError),
}

impl GridLookup {
    /// The pixel index if the position was inside the grid.
    pub fn index(&self) -> Option<PixelIndex> {
        match self {
            GridLookup::Inside(idx) => Some(*idx),
            _ => None,
        }
    }

    /// Collapse to the classic form, using the (-1, -1) sentinel for both
    /// failure cases.
    pub fn index_or_sentinel(&self) -> PixelIndex {
        self.index().unwrap_or(PixelIndex::OUT_OF_GRID)
    }

    pub fn is_inside(&self) -> bool {
        matches!(self, GridLookup::Inside(_))
    }
}

/// Locate the pixel containing a UCS position.
///
/// `col = round((x - origin_x) / pixel_size_x)` and
/// `row = round((origin_y - y) / pixel_size_y)`; rows grow southwards.
pub fn planar_to_index(grid: &GridReference, pos: PlanarPosition) -> GridLookup {
    if !pos.is_finite() {
        return GridLookup::OutOfGrid;
    }

    let col = ((pos.x - grid.origin_x) / grid.pixel_size_x).round();
    let row = ((grid.origin_y - pos.y) / grid.pixel_size_y).round();

    if col < 0.0 || row < 0.0 || col >= grid.width as f64 || row >= grid.height as f64 {
        return GridLookup::OutOfGrid;
    }

    GridLookup::Inside(PixelIndex::new(row as i32, col as i32))
}

/// UCS position of a pixel centre.
pub fn index_to_planar(grid: &GridReference, index: PixelIndex) -> PlanarPosition {
    PlanarPosition::new(
        grid.origin_x + index.col as f64 * grid.pixel_size_x,
        grid.origin_y - index.row as f64 * grid.pixel_size_y,
    )
}

/// Locate the pixel containing a geographic position.
pub fn geo_to_index(grid: &GridReference, geo: GeoPosition, spec: ProjectionSpec) -> GridLookup {
    match spec.projection().forward(geo) {
        Ok(pos) => planar_to_index(grid, pos),
        Err(e) => GridLookup::ProjectionFailed(e),
    }
}

/// Geographic position of a pixel centre.
pub fn index_to_geo(
    grid: &GridReference,
    index: PixelIndex,
    spec: ProjectionSpec,
) -> Result<GeoPosition, ProjectionError> {
    spec.projection().inverse(index_to_planar(grid, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridReference {
        GridReference::new(2.0, 4.0, -100.0, 100.0, 50, 25).unwrap()
    }

    #[test]
    fn test_origin_maps_to_zero() {
        let g = grid();
        assert_eq!(
            planar_to_index(&g, PlanarPosition::new(-100.0, 100.0)),
            GridLookup::Inside(PixelIndex::new(0, 0))
        );
    }

    #[test]
    fn test_row_grows_southwards() {
        let g = grid();
        let idx = planar_to_index(&g, PlanarPosition::new(-100.0, 92.0)).index().unwrap();
        assert_eq!(idx, PixelIndex::new(2, 0));
    }

    #[test]
    fn test_rounding_to_nearest_centre() {
        let g = grid();
        let idx = planar_to_index(&g, PlanarPosition::new(-96.9, 98.1)).index().unwrap();
        assert_eq!(idx, PixelIndex::new(0, 2));
    }

    #[test]
    fn test_out_of_grid() {
        let g = grid();
        let lookup = planar_to_index(&g, PlanarPosition::new(-102.0, 100.0));
        assert_eq!(lookup, GridLookup::OutOfGrid);
        assert_eq!(lookup.index_or_sentinel(), PixelIndex::OUT_OF_GRID);

        let lookup = planar_to_index(&g, PlanarPosition::new(f64::NAN, 0.0));
        assert_eq!(lookup, GridLookup::OutOfGrid);
    }

    #[test]
    fn test_projection_failure_is_distinct() {
        let g = grid();
        let lookup = geo_to_index(&g, GeoPosition::new(-90.0, 0.0), ProjectionSpec::Spherical);
        assert!(matches!(lookup, GridLookup::ProjectionFailed(_)));
        assert_eq!(lookup.index_or_sentinel(), PixelIndex::OUT_OF_GRID);
    }
}
