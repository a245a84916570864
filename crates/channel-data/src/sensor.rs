//! Sensor families and resolution of logical channels to dataset layers.
//!
//! AVHRR and VIIRS name equivalent channels differently. The classifier only
//! ever sees [`LogicalChannel`]s; [`SensorChannelMap`] translates them to
//! layer handles once per dataset.

use icecover_common::IcecoverError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dataset::Dataset;
use crate::error::{ChannelDataError, Result};

/// Supported imaging sensor families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sensor {
    Avhrr,
    Viirs,
}

impl Sensor {
    pub fn name(&self) -> &'static str {
        match self {
            Sensor::Avhrr => "avhrr",
            Sensor::Viirs => "viirs",
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Sensor {
    type Err = IcecoverError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "avhrr" | "avhrr/3" | "avhrr3" => Ok(Sensor::Avhrr),
            "viirs" => Ok(Sensor::Viirs),
            other => Err(IcecoverError::UnknownSensor(other.to_string())),
        }
    }
}

impl TryFrom<String> for Sensor {
    type Error = IcecoverError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Sensor> for String {
    fn from(sensor: Sensor) -> Self {
        sensor.name().to_string()
    }
}

/// Sensor-independent channel identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalChannel {
    /// Visible reflectance (~0.6 µm)
    Ch1,
    /// Near-infrared reflectance (~0.8 µm)
    Ch2,
    /// Daytime 1.6 µm reflectance
    Ch3a,
    /// 3.7 µm brightness temperature
    Ch3b,
    /// 11 µm brightness temperature
    Ch4,
    /// 12 µm brightness temperature
    Ch5,
}

impl LogicalChannel {
    pub const ALL: [LogicalChannel; 6] = [
        LogicalChannel::Ch1,
        LogicalChannel::Ch2,
        LogicalChannel::Ch3a,
        LogicalChannel::Ch3b,
        LogicalChannel::Ch4,
        LogicalChannel::Ch5,
    ];

    /// Channels the classifier cannot run without.
    pub const CORE: [LogicalChannel; 3] =
        [LogicalChannel::Ch1, LogicalChannel::Ch2, LogicalChannel::Ch4];

    /// Layer description token naming this channel for a sensor.
    pub fn pattern(&self, sensor: Sensor) -> &'static str {
        match (sensor, self) {
            (Sensor::Avhrr, LogicalChannel::Ch1) => "ch1",
            (Sensor::Avhrr, LogicalChannel::Ch2) => "ch2",
            (Sensor::Avhrr, LogicalChannel::Ch3a) => "ch3a",
            (Sensor::Avhrr, LogicalChannel::Ch3b) => "ch3b",
            (Sensor::Avhrr, LogicalChannel::Ch4) => "ch4",
            (Sensor::Avhrr, LogicalChannel::Ch5) => "ch5",
            (Sensor::Viirs, LogicalChannel::Ch1) => "M05",
            (Sensor::Viirs, LogicalChannel::Ch2) => "M07",
            (Sensor::Viirs, LogicalChannel::Ch3a) => "M10",
            (Sensor::Viirs, LogicalChannel::Ch3b) => "M12",
            (Sensor::Viirs, LogicalChannel::Ch4) => "M15",
            (Sensor::Viirs, LogicalChannel::Ch5) => "M16",
        }
    }
}

impl fmt::Display for LogicalChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicalChannel::Ch1 => "ch1",
            LogicalChannel::Ch2 => "ch2",
            LogicalChannel::Ch3a => "ch3a",
            LogicalChannel::Ch3b => "ch3b",
            LogicalChannel::Ch4 => "ch4",
            LogicalChannel::Ch5 => "ch5",
        };
        write!(f, "{}", name)
    }
}

/// Whether `description` contains `pattern` as a whole alphanumeric token,
/// ignoring case. "ch3" does not match "ch3a".
pub fn matches_token(description: &str, pattern: &str) -> bool {
    description
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token.eq_ignore_ascii_case(pattern))
}

/// Index of the first layer whose description names the logical channel.
pub fn resolve_channel(dataset: &Dataset, channel: LogicalChannel) -> Option<usize> {
    let sensor = dataset.header.sensor;
    dataset.find_layer(&[channel.pattern(sensor)])
}

/// Layer handles for every logical channel of one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorChannelMap {
    pub sensor: Sensor,
    pub ch1: Option<usize>,
    pub ch2: Option<usize>,
    pub ch3a: Option<usize>,
    pub ch3b: Option<usize>,
    pub ch4: Option<usize>,
    pub ch5: Option<usize>,
}

impl SensorChannelMap {
    /// Resolve all logical channels of a dataset.
    pub fn resolve(dataset: &Dataset) -> Self {
        let find = |ch| resolve_channel(dataset, ch);
        Self {
            sensor: dataset.header.sensor,
            ch1: find(LogicalChannel::Ch1),
            ch2: find(LogicalChannel::Ch2),
            ch3a: find(LogicalChannel::Ch3a),
            ch3b: find(LogicalChannel::Ch3b),
            ch4: find(LogicalChannel::Ch4),
            ch5: find(LogicalChannel::Ch5),
        }
    }

    /// Layer handle of a logical channel.
    pub fn get(&self, channel: LogicalChannel) -> Option<usize> {
        match channel {
            LogicalChannel::Ch1 => self.ch1,
            LogicalChannel::Ch2 => self.ch2,
            LogicalChannel::Ch3a => self.ch3a,
            LogicalChannel::Ch3b => self.ch3b,
            LogicalChannel::Ch4 => self.ch4,
            LogicalChannel::Ch5 => self.ch5,
        }
    }

    /// Fail unless every core channel resolved.
    pub fn require_core(&self) -> Result<()> {
        let missing: Vec<String> = LogicalChannel::CORE
            .iter()
            .filter(|ch| self.get(**ch).is_none())
            .map(|ch| format!("{} ({})", ch, ch.pattern(self.sensor)))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ChannelDataError::MissingChannel {
                sensor: self.sensor.to_string(),
                channels: missing.join(", "),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sensor() {
        assert_eq!("AVHRR/3".parse::<Sensor>().unwrap(), Sensor::Avhrr);
        assert_eq!("avhrr".parse::<Sensor>().unwrap(), Sensor::Avhrr);
        assert_eq!("VIIRS".parse::<Sensor>().unwrap(), Sensor::Viirs);
        assert!("modis".parse::<Sensor>().is_err());
    }

    #[test]
    fn test_sensor_serde_is_case_insensitive() {
        let s: Sensor = serde_json::from_str("\"AVHRR/3\"").unwrap();
        assert_eq!(s, Sensor::Avhrr);
        assert_eq!(serde_json::to_string(&Sensor::Viirs).unwrap(), "\"viirs\"");
    }

    #[test]
    fn test_token_matching() {
        assert!(matches_token("ch3a", "ch3a"));
        assert!(matches_token("AVHRR CH3A reflectance", "ch3a"));
        assert!(matches_token("VIIRS-M15-SDR", "m15"));
        assert!(!matches_token("ch3a", "ch3"));
        assert!(!matches_token("ch3b", "ch3"));
        assert!(!matches_token("ch10", "ch1"));
        assert!(!matches_token("", "ch1"));
    }

    #[test]
    fn test_patterns_are_distinct_per_sensor() {
        for sensor in [Sensor::Avhrr, Sensor::Viirs] {
            let mut seen: Vec<&str> = LogicalChannel::ALL.iter().map(|c| c.pattern(sensor)).collect();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), 6);
        }
    }
}
