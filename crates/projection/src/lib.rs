//! Coordinate transformations between geographic positions, the polar
//! stereographic user coordinate system (UCS) and pixel grids.
//!
//! Implements the map projection from scratch without external dependencies.

pub mod error;
pub mod index;
pub mod polar;
pub mod subtrack;
pub mod tile;
pub mod viewing;

pub use error::{ProjectionError, SubtrackError};
pub use index::{geo_to_index, index_to_geo, index_to_planar, planar_to_index, GridLookup};
pub use polar::{geo_to_planar, planar_to_geo, PolarStereographic, ProjectionSpec};
pub use subtrack::{closest_point_on_track, closest_track_points, SubTrack};
pub use tile::geo_to_tile_id;
pub use viewing::{great_circle_angle, satellite_zenith, zenith_from_central_angle};
