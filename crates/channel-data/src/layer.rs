//! Typed raw layers and their linear calibration.

use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

/// Raw stored values of one layer, row-major.
///
/// Serialized as `{"type": "u16", "values": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum RawData {
    U8(Vec<u8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
}

fn sample<T: AsPrimitive<f64>>(values: &[T], flat: usize) -> Option<f64> {
    values.get(flat).map(|v| v.as_())
}

impl RawData {
    /// Number of stored values.
    pub fn len(&self) -> usize {
        match self {
            RawData::U8(v) => v.len(),
            RawData::U16(v) => v.len(),
            RawData::I16(v) => v.len(),
            RawData::I32(v) => v.len(),
            RawData::F32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage kind name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            RawData::U8(_) => "u8",
            RawData::U16(_) => "u16",
            RawData::I16(_) => "i16",
            RawData::I32(_) => "i32",
            RawData::F32(_) => "f32",
        }
    }

    /// Raw value at a row-major offset, widened to f64.
    pub fn get(&self, flat: usize) -> Option<f64> {
        match self {
            RawData::U8(v) => sample(v, flat),
            RawData::U16(v) => sample(v, flat),
            RawData::I16(v) => sample(v, flat),
            RawData::I32(v) => sample(v, flat),
            RawData::F32(v) => sample(v, flat),
        }
    }
}

/// Linear calibration from raw counts to physical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub gain: f64,
    pub intercept: f64,
}

impl Calibration {
    pub fn new(gain: f64, intercept: f64) -> Self {
        Self { gain, intercept }
    }

    /// `raw * gain + intercept`, accumulated in f64.
    #[inline]
    pub fn unpack(&self, raw: f64) -> f64 {
        raw * self.gain + self.intercept
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

/// One 2-D layer of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelLayer {
    /// Identity string used to resolve the physical channel ("ch1", "M05", "SOZ")
    pub description: String,
    pub data: RawData,
    #[serde(default)]
    pub calibration: Calibration,
    /// Raw value marking a pixel that was not acquired
    #[serde(default)]
    pub missing: Option<f64>,
    /// Raw value marking a pixel with no valid data
    #[serde(default)]
    pub nodata: Option<f64>,
}

impl ChannelLayer {
    pub fn new(description: impl Into<String>, data: RawData, calibration: Calibration) -> Self {
        Self {
            description: description.into(),
            data,
            calibration,
            missing: None,
            nodata: None,
        }
    }

    pub fn with_missing(mut self, missing: f64) -> Self {
        self.missing = Some(missing);
        self
    }

    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw value at a row-major offset, `None` past the end of the layer.
    pub fn raw(&self, flat: usize) -> Option<f64> {
        self.data.get(flat)
    }

    /// Whether a raw value is one of the layer's sentinels.
    pub fn is_sentinel(&self, raw: f64) -> bool {
        raw.is_nan() || self.missing == Some(raw) || self.nodata == Some(raw)
    }

    /// Calibrated physical value, `None` for missing or no-data pixels.
    pub fn physical(&self, flat: usize) -> Option<f64> {
        let raw = self.raw(flat)?;
        if self.is_sentinel(raw) {
            return None;
        }
        Some(self.calibration.unpack(raw))
    }
}
