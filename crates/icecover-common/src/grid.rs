//! Grid references mapping pixel indices to the planar user coordinate system.

use crate::{IcecoverError, IcecoverResult, PlanarPosition};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row/column index of a pixel. Row 0 is the northern edge of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelIndex {
    pub row: i32,
    pub col: i32,
}

impl PixelIndex {
    /// Sentinel for positions that fall outside a grid.
    pub const OUT_OF_GRID: PixelIndex = PixelIndex { row: -1, col: -1 };

    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn is_out_of_grid(&self) -> bool {
        *self == Self::OUT_OF_GRID
    }
}

impl fmt::Display for PixelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[row {}, col {}]", self.row, self.col)
    }
}

/// Definition of a regular grid in the planar user coordinate system.
///
/// `origin_x`/`origin_y` locate the centre of pixel (0, 0), the north-west
/// corner pixel. Columns grow eastwards, rows grow southwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridReference {
    /// Pixel size along x (km)
    pub pixel_size_x: f64,
    /// Pixel size along y (km)
    pub pixel_size_y: f64,
    /// Eastings of the first pixel (km)
    pub origin_x: f64,
    /// Northings of the first pixel (km)
    pub origin_y: f64,
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
}

impl GridReference {
    /// Create a validated grid reference.
    pub fn new(
        pixel_size_x: f64,
        pixel_size_y: f64,
        origin_x: f64,
        origin_y: f64,
        width: usize,
        height: usize,
    ) -> IcecoverResult<Self> {
        let grid = Self {
            pixel_size_x,
            pixel_size_y,
            origin_x,
            origin_y,
            width,
            height,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Check the invariants of the grid.
    ///
    /// Deserialized grids bypass [`GridReference::new`], so consumers call
    /// this before trusting one.
    pub fn validate(&self) -> IcecoverResult<()> {
        if !(self.pixel_size_x.is_finite() && self.pixel_size_x > 0.0)
            || !(self.pixel_size_y.is_finite() && self.pixel_size_y > 0.0)
        {
            return Err(IcecoverError::invalid_grid(format!(
                "pixel sizes must be positive, got ({}, {})",
                self.pixel_size_x, self.pixel_size_y
            )));
        }
        if !self.origin_x.is_finite() || !self.origin_y.is_finite() {
            return Err(IcecoverError::invalid_grid("origin must be finite"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(IcecoverError::invalid_grid(format!(
                "grid size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > i32::MAX as usize || self.height > i32::MAX as usize {
            return Err(IcecoverError::invalid_grid("grid too large for pixel indices"));
        }
        Ok(())
    }

    /// Total number of pixels.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether an index lies inside [0, width) x [0, height).
    pub fn contains(&self, index: PixelIndex) -> bool {
        index.row >= 0
            && index.col >= 0
            && (index.row as usize) < self.height
            && (index.col as usize) < self.width
    }

    /// Row-major offset of an index, or None outside the grid.
    pub fn flat_index(&self, index: PixelIndex) -> Option<usize> {
        if !self.contains(index) {
            return None;
        }
        Some(index.row as usize * self.width + index.col as usize)
    }

    /// Index of a row-major offset.
    pub fn index_of(&self, flat: usize) -> PixelIndex {
        PixelIndex::new((flat / self.width) as i32, (flat % self.width) as i32)
    }

    /// Planar position of the north-west pixel centre.
    pub fn origin(&self) -> PlanarPosition {
        PlanarPosition::new(self.origin_x, self.origin_y)
    }

    /// Two grids describe the same pixel lattice.
    pub fn same_lattice(&self, other: &GridReference) -> bool {
        const EPS: f64 = 1e-9;
        self.width == other.width
            && self.height == other.height
            && (self.pixel_size_x - other.pixel_size_x).abs() < EPS
            && (self.pixel_size_y - other.pixel_size_y).abs() < EPS
            && (self.origin_x - other.origin_x).abs() < EPS
            && (self.origin_y - other.origin_y).abs() < EPS
    }
}

impl fmt::Display for GridReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} @ ({}, {}) km, {}x{} km pixels",
            self.width, self.height, self.origin_x, self.origin_y, self.pixel_size_x, self.pixel_size_y
        )
    }
}
