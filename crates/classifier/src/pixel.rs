//! Per-pixel classifier inputs and results.

use channel_data::Sensor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marks a physical input that is not available for a pixel.
pub const MISSING_VALUE: f64 = -999.0;

/// Whether a physical input carries a usable value.
#[inline]
pub fn is_available(value: f64) -> bool {
    value.is_finite() && value != MISSING_VALUE
}

/// Surface type under a pixel, selecting the coefficient set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    #[default]
    Sea,
    Land,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Sea => write!(f, "sea"),
            Surface::Land => write!(f, "land"),
        }
    }
}

/// Illumination / channel regime of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmMode {
    /// Daylight with the 1.6 µm reflectance channel
    Day,
    /// Thermal channels only
    Night,
    /// Daylight with a reflectance derived from the 3.7 µm channel
    #[serde(rename = "day_using_3b")]
    DayUsing3b,
}

impl fmt::Display for AlgorithmMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmMode::Day => write!(f, "day"),
            AlgorithmMode::Night => write!(f, "night"),
            AlgorithmMode::DayUsing3b => write!(f, "day_using_3b"),
        }
    }
}

/// Everything the estimator needs to know about one pixel.
///
/// Reflectances are in percent, temperatures in K and angles in degrees.
/// Unavailable values hold [`MISSING_VALUE`].
#[derive(Debug, Clone, PartialEq)]
pub struct PixelInput {
    pub a1: f64,
    pub a2: f64,
    pub a3a: f64,
    pub t3b: f64,
    pub t4: f64,
    pub t5: f64,
    /// Synthetic channel-3b reflectance, set only in `DayUsing3b` mode
    pub a3b: f64,
    pub solar_zenith: f64,
    pub satellite_zenith: f64,
    pub surface: Surface,
    /// T4 minus the NWP surface temperature
    pub nwp_tdiff: f64,
    pub mode: AlgorithmMode,
    pub platform: String,
    pub sensor: Sensor,
    pub day_of_year: u32,
}

impl PixelInput {
    /// An input with every physical value missing.
    pub fn empty(platform: impl Into<String>, sensor: Sensor, day_of_year: u32) -> Self {
        Self {
            a1: MISSING_VALUE,
            a2: MISSING_VALUE,
            a3a: MISSING_VALUE,
            t3b: MISSING_VALUE,
            t4: MISSING_VALUE,
            t5: MISSING_VALUE,
            a3b: MISSING_VALUE,
            solar_zenith: MISSING_VALUE,
            satellite_zenith: MISSING_VALUE,
            surface: Surface::Sea,
            nwp_tdiff: MISSING_VALUE,
            mode: AlgorithmMode::Day,
            platform: platform.into(),
            sensor,
            day_of_year,
        }
    }

    /// The channel-3 reflectance used by the current mode.
    pub fn a3(&self) -> f64 {
        match self.mode {
            AlgorithmMode::DayUsing3b => self.a3b,
            _ => self.a3a,
        }
    }
}

/// Class probabilities of one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub p_ice: f32,
    pub p_free: f32,
    pub p_cloud: f32,
}

impl ClassProbabilities {
    pub fn new(p_ice: f32, p_free: f32, p_cloud: f32) -> Self {
        Self {
            p_ice,
            p_free,
            p_cloud,
        }
    }

    pub fn sum(&self) -> f64 {
        self.p_ice as f64 + self.p_free as f64 + self.p_cloud as f64
    }

    pub fn has_nan(&self) -> bool {
        self.p_ice.is_nan() || self.p_free.is_nan() || self.p_cloud.is_nan()
    }
}
