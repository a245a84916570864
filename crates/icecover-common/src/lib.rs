//! Common types and utilities shared across the icecover crates.

pub mod error;
pub mod geo;
pub mod grid;
pub mod tile;
pub mod time;

pub use error::{IcecoverError, IcecoverResult};
pub use geo::{GeoPosition, PlanarPosition};
pub use grid::{GridReference, PixelIndex};
pub use tile::TileId;
pub use time::day_of_year;
