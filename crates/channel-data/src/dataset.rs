//! Datasets: a navigated header plus an ordered list of layers.

use chrono::{DateTime, Utc};
use icecover_common::{day_of_year, GridReference};
use projection::ProjectionSpec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChannelDataError, Result};
use crate::layer::ChannelLayer;
use crate::sensor::{matches_token, Sensor};

/// Layer names of the solar zenith angle in an angle product.
pub const SOLAR_ZENITH_NAMES: &[&str] = &["SOZ", "sunz"];

/// Layer names of the satellite zenith angle in an angle product.
pub const SATELLITE_ZENITH_NAMES: &[&str] = &["SAZ", "satz"];

/// Layer names of a land/sea mask.
pub const LAND_MASK_NAMES: &[&str] = &["lmask", "landmask"];

/// Layer names of an NWP surface temperature field.
pub const NWP_SURFACE_TEMPERATURE_NAMES: &[&str] = &["t0m", "tsurf", "skt"];

/// Identity and navigation of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetHeader {
    /// Platform name, e.g. "NOAA-19", "Metop-B", "NOAA-20"
    pub platform: String,
    pub sensor: Sensor,
    /// Acquisition time (UTC)
    pub acquired: DateTime<Utc>,
    pub grid: GridReference,
    /// Figure of the Earth the grid is defined on
    #[serde(default)]
    pub projection: ProjectionSpec,
}

impl DatasetHeader {
    pub fn new(
        platform: impl Into<String>,
        sensor: Sensor,
        acquired: DateTime<Utc>,
        grid: GridReference,
    ) -> Self {
        Self {
            platform: platform.into(),
            sensor,
            acquired,
            grid,
            projection: ProjectionSpec::default(),
        }
    }

    pub fn with_projection(mut self, projection: ProjectionSpec) -> Self {
        self.projection = projection;
        self
    }

    pub fn day_of_year(&self) -> u32 {
        day_of_year(&self.acquired)
    }
}

/// A decoded input product, read-only during classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub header: DatasetHeader,
    pub layers: Vec<ChannelLayer>,
}

impl Dataset {
    /// Create a dataset, validating the grid and every layer length.
    pub fn new(header: DatasetHeader, layers: Vec<ChannelLayer>) -> Result<Self> {
        let dataset = Self { header, layers };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Decode and validate a dataset from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let dataset: Dataset = serde_json::from_str(json)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Check the grid and that each layer holds one value per pixel.
    pub fn validate(&self) -> Result<()> {
        self.header.grid.validate()?;

        let expected = self.header.grid.len();
        for layer in &self.layers {
            if layer.len() != expected {
                return Err(ChannelDataError::layer_size_mismatch(
                    layer.description.clone(),
                    expected,
                    layer.len(),
                ));
            }
        }
        Ok(())
    }

    pub fn grid(&self) -> &GridReference {
        &self.header.grid
    }

    pub fn layer(&self, index: usize) -> Option<&ChannelLayer> {
        self.layers.get(index)
    }

    /// Index of the first layer whose description contains any of the
    /// names as a whole token (case-insensitive).
    pub fn find_layer(&self, names: &[&str]) -> Option<usize> {
        let found = self.layers.iter().position(|layer| {
            names
                .iter()
                .any(|name| matches_token(&layer.description, name))
        });
        if found.is_none() {
            debug!(names = ?names, platform = %self.header.platform, "No matching layer");
        }
        found
    }

    /// Layer found by [`Dataset::find_layer`].
    pub fn find(&self, names: &[&str]) -> Option<&ChannelLayer> {
        self.find_layer(names).and_then(|i| self.layer(i))
    }

    /// Like [`Dataset::find`], failing with `MissingLayer` when absent.
    pub fn require(&self, names: &[&str]) -> Result<&ChannelLayer> {
        self.find(names).ok_or_else(|| {
            ChannelDataError::missing_layer(format!(
                "{} (platform {})",
                names.join("/"),
                self.header.platform
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{Calibration, RawData};
    use chrono::TimeZone;

    fn header(width: usize, height: usize) -> DatasetHeader {
        DatasetHeader::new(
            "NOAA-19",
            Sensor::Avhrr,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            GridReference::new(1.0, 1.0, 0.0, 0.0, width, height).unwrap(),
        )
    }

    fn layer(name: &str, n: usize) -> ChannelLayer {
        ChannelLayer::new(name, RawData::U16(vec![0; n]), Calibration::default())
    }

    #[test]
    fn test_new_validates_layer_size() {
        let err = Dataset::new(header(3, 3), vec![layer("ch1", 9), layer("ch2", 8)]).unwrap_err();
        match err {
            ChannelDataError::LayerSizeMismatch {
                layer,
                expected,
                actual,
            } => {
                assert_eq!(layer, "ch2");
                assert_eq!(expected, 9);
                assert_eq!(actual, 8);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_find_layer_by_alias() {
        let ds = Dataset::new(header(2, 2), vec![layer("sunz", 4), layer("SAZ", 4)]).unwrap();
        assert_eq!(ds.find_layer(SOLAR_ZENITH_NAMES), Some(0));
        assert_eq!(ds.find_layer(SATELLITE_ZENITH_NAMES), Some(1));
        assert_eq!(ds.find_layer(LAND_MASK_NAMES), None);
        assert!(ds.require(LAND_MASK_NAMES).is_err());
    }

    #[test]
    fn test_day_of_year() {
        assert_eq!(header(1, 1).day_of_year(), 61);
    }
}
