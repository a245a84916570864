//! Fixed regional processing tiles in the polar stereographic plane.
//!
//! The four tiles bucket a geographic position into a named processing
//! region. Their grids are disjoint under index rounding, so at most one
//! tile contains any position.

use crate::{GridReference, IcecoverError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named regional tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileId {
    /// North Sea and southern Scandinavia
    NorthSea,
    /// Norwegian Sea, Barents Sea and Svalbard
    NorwegianSea,
    /// Greenland and the Greenland Sea
    Greenland,
    /// Northern Atlantic south of Iceland
    Atlantic,
}

impl TileId {
    /// Lookup order used when testing a position against the tiles.
    pub const ALL: [TileId; 4] = [
        TileId::NorthSea,
        TileId::NorwegianSea,
        TileId::Greenland,
        TileId::Atlantic,
    ];

    /// Short tile name used in product file names.
    pub fn name(&self) -> &'static str {
        match self {
            TileId::NorthSea => "ns",
            TileId::NorwegianSea => "nr",
            TileId::Greenland => "gr",
            TileId::Atlantic => "at",
        }
    }

    /// Reference grid of the tile, 1 km pixels on the spherical preset.
    pub fn reference(&self) -> GridReference {
        let (origin_x, origin_y, width, height) = match self {
            TileId::NorthSea => (-600.0, -2900.0, 1200, 1300),
            TileId::NorwegianSea => (-600.0, -900.0, 2000, 2000),
            TileId::Greenland => (-2000.0, -500.0, 1400, 2500),
            TileId::Atlantic => (-2000.0, -3000.0, 1400, 1200),
        };
        GridReference {
            pixel_size_x: 1.0,
            pixel_size_y: 1.0,
            origin_x,
            origin_y,
            width,
            height,
        }
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TileId {
    type Err = IcecoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TileId::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| IcecoverError::UnknownTile(s.to_string()))
    }
}
