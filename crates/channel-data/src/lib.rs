//! In-memory channel datasets for the icecover classifier.
//!
//! A [`Dataset`] is what the I/O layer hands over after decoding one input
//! product: a header (platform, sensor, acquisition time, navigation) plus
//! typed 2-D layers of raw counts with their calibration. Channel identity
//! is resolved once per dataset through [`SensorChannelMap`], so the
//! classifier never depends on sensor-specific naming.

pub mod dataset;
pub mod error;
pub mod layer;
pub mod sensor;

pub use dataset::{
    Dataset, DatasetHeader, LAND_MASK_NAMES, NWP_SURFACE_TEMPERATURE_NAMES, SATELLITE_ZENITH_NAMES,
    SOLAR_ZENITH_NAMES,
};
pub use error::{ChannelDataError, Result};
pub use layer::{Calibration, ChannelLayer, RawData};
pub use sensor::{matches_token, resolve_channel, LogicalChannel, Sensor, SensorChannelMap};
