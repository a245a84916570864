//! Generators for synthetic satellite scenes.
//!
//! Scenes are described in physical units (reflectance in percent,
//! temperatures in K, angles in degrees) and encoded into raw `u16` counts
//! the way the I/O layer would hand them over. A value of `f64::NAN`
//! encodes to the layer's missing sentinel.

use channel_data::{Calibration, ChannelLayer, Dataset, DatasetHeader, LogicalChannel, RawData, Sensor};
use chrono::{DateTime, TimeZone, Utc};
use icecover_common::{GridReference, TileId};

/// Gain of every synthetic channel, angle and NWP layer.
pub const SYNTHETIC_GAIN: f64 = 0.01;

/// Raw count used as the missing sentinel of synthetic layers.
pub const MISSING_RAW: u16 = u16::MAX;

/// Fixed acquisition time of synthetic scenes (day of year 80).
pub fn acquisition_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 20, 10, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

/// A grid of `width` x `height` 1 km pixels in the north-west corner of the
/// Norwegian Sea tile.
pub fn test_grid(width: usize, height: usize) -> GridReference {
    let tile = TileId::NorwegianSea.reference();
    GridReference::new(1.0, 1.0, tile.origin_x, tile.origin_y, width, height)
        .expect("valid synthetic grid")
}

/// Encode a physical value into a raw count with [`SYNTHETIC_GAIN`].
pub fn encode(value: f64) -> u16 {
    if value.is_nan() {
        return MISSING_RAW;
    }
    (value / SYNTHETIC_GAIN).round().clamp(0.0, (MISSING_RAW - 1) as f64) as u16
}

/// Build a u16 layer from physical values.
pub fn encoded_layer(name: &str, values: &[f64]) -> ChannelLayer {
    ChannelLayer::new(
        name,
        RawData::U16(values.iter().map(|v| encode(*v)).collect()),
        Calibration::new(SYNTHETIC_GAIN, 0.0),
    )
    .with_missing(MISSING_RAW as f64)
}

/// The datasets of one synthetic scene.
#[derive(Debug, Clone)]
pub struct Scene {
    pub image: Dataset,
    pub angles: Dataset,
    pub land_mask: Option<Dataset>,
    pub nwp: Option<Dataset>,
}

/// Builder for synthetic scenes with uniform fields and per-pixel overrides.
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    width: usize,
    height: usize,
    platform: String,
    sensor: Sensor,
    channels: Vec<(LogicalChannel, Vec<f64>)>,
    solar_zenith: Vec<f64>,
    satellite_zenith: Option<Vec<f64>>,
    land: Option<Vec<u8>>,
    nwp_surface: Option<Vec<f64>>,
}

impl SceneBuilder {
    /// A daylight AVHRR scene of first-year ice over sea.
    pub fn avhrr(width: usize, height: usize) -> Self {
        Self::new(width, height, "NOAA-19", Sensor::Avhrr)
            .channel(LogicalChannel::Ch1, 60.0)
            .channel(LogicalChannel::Ch2, 55.0)
            .channel(LogicalChannel::Ch3a, 8.0)
            .channel(LogicalChannel::Ch4, 255.0)
            .channel(LogicalChannel::Ch5, 254.5)
    }

    /// A daylight VIIRS scene of first-year ice over sea.
    pub fn viirs(width: usize, height: usize) -> Self {
        Self::new(width, height, "NOAA-20", Sensor::Viirs)
            .channel(LogicalChannel::Ch1, 60.0)
            .channel(LogicalChannel::Ch2, 55.0)
            .channel(LogicalChannel::Ch3a, 8.0)
            .channel(LogicalChannel::Ch3b, 262.0)
            .channel(LogicalChannel::Ch4, 255.0)
            .channel(LogicalChannel::Ch5, 254.5)
    }

    /// An empty scene with the sun at 60° zenith and no channels.
    pub fn new(width: usize, height: usize, platform: &str, sensor: Sensor) -> Self {
        Self {
            width,
            height,
            platform: platform.to_string(),
            sensor,
            channels: Vec::new(),
            solar_zenith: vec![60.0; width * height],
            satellite_zenith: None,
            land: None,
            nwp_surface: None,
        }
    }

    fn len(&self) -> usize {
        self.width * self.height
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(row < self.height && col < self.width, "pixel ({row}, {col}) outside scene");
        row * self.width + col
    }

    pub fn platform(mut self, platform: &str) -> Self {
        self.platform = platform.to_string();
        self
    }

    /// Set a channel to a uniform value, adding the layer if needed.
    pub fn channel(mut self, channel: LogicalChannel, value: f64) -> Self {
        let n = self.len();
        match self.channels.iter_mut().find(|(ch, _)| *ch == channel) {
            Some((_, values)) => values.iter_mut().for_each(|v| *v = value),
            None => self.channels.push((channel, vec![value; n])),
        }
        self
    }

    /// Override one pixel of an existing channel.
    pub fn channel_at(mut self, channel: LogicalChannel, row: usize, col: usize, value: f64) -> Self {
        let i = self.offset(row, col);
        let (_, values) = self
            .channels
            .iter_mut()
            .find(|(ch, _)| *ch == channel)
            .expect("channel must be added before overriding a pixel");
        values[i] = value;
        self
    }

    /// Remove a channel layer from the image.
    pub fn without(mut self, channel: LogicalChannel) -> Self {
        self.channels.retain(|(ch, _)| *ch != channel);
        self
    }

    pub fn solar_zenith(mut self, value: f64) -> Self {
        self.solar_zenith.iter_mut().for_each(|v| *v = value);
        self
    }

    pub fn solar_zenith_at(mut self, row: usize, col: usize, value: f64) -> Self {
        let i = self.offset(row, col);
        self.solar_zenith[i] = value;
        self
    }

    /// Add a uniform satellite zenith layer to the angle product.
    pub fn satellite_zenith(mut self, value: f64) -> Self {
        self.satellite_zenith = Some(vec![value; self.len()]);
        self
    }

    /// Add an all-sea land mask.
    pub fn sea_mask(mut self) -> Self {
        self.land = Some(vec![0; self.len()]);
        self
    }

    /// Mark one pixel as land, adding an all-sea mask first if needed.
    pub fn land_at(mut self, row: usize, col: usize) -> Self {
        let i = self.offset(row, col);
        let n = self.len();
        self.land.get_or_insert_with(|| vec![0; n])[i] = 1;
        self
    }

    /// Add a uniform NWP surface temperature field.
    pub fn nwp_surface(mut self, value: f64) -> Self {
        self.nwp_surface = Some(vec![value; self.len()]);
        self
    }

    fn header(&self) -> DatasetHeader {
        DatasetHeader::new(
            self.platform.clone(),
            self.sensor,
            acquisition_time(),
            test_grid(self.width, self.height),
        )
    }

    /// Encode the scene into datasets.
    pub fn build(&self) -> Scene {
        let image_layers = self
            .channels
            .iter()
            .map(|(ch, values)| encoded_layer(ch.pattern(self.sensor), values))
            .collect();
        let image = Dataset::new(self.header(), image_layers).expect("valid synthetic image");

        let mut angle_layers = vec![encoded_layer("SOZ", &self.solar_zenith)];
        if let Some(saz) = &self.satellite_zenith {
            angle_layers.push(encoded_layer("SAZ", saz));
        }
        let angles = Dataset::new(self.header(), angle_layers).expect("valid synthetic angles");

        let land_mask = self.land.as_ref().map(|flags| {
            let layer = ChannelLayer::new("lmask", RawData::U8(flags.clone()), Calibration::default());
            Dataset::new(self.header(), vec![layer]).expect("valid synthetic land mask")
        });

        let nwp = self.nwp_surface.as_ref().map(|values| {
            Dataset::new(self.header(), vec![encoded_layer("t0m", values)])
                .expect("valid synthetic NWP field")
        });

        Scene {
            image,
            angles,
            land_mask,
            nwp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use channel_data::SensorChannelMap;

    #[test]
    fn test_encode_round_trips_physical_values() {
        assert_eq!(encode(260.0), 26000);
        assert_eq!(encode(0.0), 0);
        assert_eq!(encode(f64::NAN), MISSING_RAW);
        assert_eq!(encode(1.0e9), MISSING_RAW - 1);

        let layer = encoded_layer("ch4", &[260.0, f64::NAN]);
        assert!((layer.physical(0).unwrap() - 260.0).abs() < 1e-9);
        assert_eq!(layer.physical(1), None);
    }

    #[test]
    fn test_avhrr_scene() {
        let scene = SceneBuilder::avhrr(3, 2).land_at(1, 2).build();
        assert_eq!(scene.image.grid().len(), 6);
        assert_eq!(scene.image.header.day_of_year(), 80);

        let map = SensorChannelMap::resolve(&scene.image);
        assert!(map.require_core().is_ok());
        assert!(map.ch3a.is_some());
        assert!(map.ch3b.is_none());

        let mask = scene.land_mask.unwrap();
        assert_eq!(mask.layers[0].raw(5), Some(1.0));
        assert!(scene.nwp.is_none());
    }

    #[test]
    fn test_overrides() {
        let scene = SceneBuilder::viirs(2, 2)
            .channel_at(LogicalChannel::Ch4, 0, 1, 0.0)
            .solar_zenith_at(1, 1, 95.0)
            .without(LogicalChannel::Ch3a)
            .build();

        let map = SensorChannelMap::resolve(&scene.image);
        assert!(map.ch3a.is_none());
        let ch4 = scene.image.layer(map.ch4.unwrap()).unwrap();
        assert_eq!(ch4.raw(1), Some(0.0));
        assert_eq!(scene.angles.layers[0].physical(3), Some(95.0));
    }
}
