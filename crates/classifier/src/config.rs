//! Configuration for the classifier.

use serde::{Deserialize, Serialize};

use crate::decision::SanityGate;

/// Configuration for a classification pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Solar zenith angle (degrees) at and above which a pixel is night.
    pub night_threshold: f64,

    /// Channel 4 temperature (K) above which a zero channel 3a count is a
    /// saturation artifact.
    pub saturation_t4_threshold: f64,

    /// Accepted range of the probability sum.
    pub sanity: SanityGate,

    /// Classify night pixels with the thermal coefficient set instead of
    /// marking them as night.
    pub classify_night: bool,

    /// Process rows on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            night_threshold: 90.0,
            saturation_t4_threshold: 50.0,
            sanity: SanityGate::default(),
            classify_night: false,
            parallel: true,
        }
    }
}

fn parse_bool(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

impl ClassifierConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `ICECOVER_*` environment overrides on top of this configuration.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("ICECOVER_NIGHT_THRESHOLD") {
            if let Ok(v) = val.parse() {
                self.night_threshold = v;
            }
        }

        if let Ok(val) = std::env::var("ICECOVER_SATURATION_T4") {
            if let Ok(v) = val.parse() {
                self.saturation_t4_threshold = v;
            }
        }

        if let Ok(val) = std::env::var("ICECOVER_SANITY_MIN") {
            if let Ok(v) = val.parse() {
                self.sanity.min_sum = v;
            }
        }

        if let Ok(val) = std::env::var("ICECOVER_SANITY_MAX") {
            if let Ok(v) = val.parse() {
                self.sanity.max_sum = v;
            }
        }

        if let Ok(val) = std::env::var("ICECOVER_CLASSIFY_NIGHT") {
            self.classify_night = parse_bool(&val);
        }

        if let Ok(val) = std::env::var("ICECOVER_PARALLEL") {
            self.parallel = parse_bool(&val);
        }

        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=180.0).contains(&self.night_threshold) {
            return Err(format!(
                "night_threshold must be within [0, 180] degrees, got {}",
                self.night_threshold
            ));
        }

        if !self.saturation_t4_threshold.is_finite() {
            return Err("saturation_t4_threshold must be finite".to_string());
        }

        self.sanity.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClassifierConfig::default();
        assert_eq!(config.night_threshold, 90.0);
        assert_eq!(config.saturation_t4_threshold, 50.0);
        assert_eq!(config.sanity, SanityGate::new(0.95, 1.05));
        assert!(!config.classify_night);
        assert!(config.parallel);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClassifierConfig::default();
        assert!(config.validate().is_ok());

        config.night_threshold = f64::NAN;
        assert!(config.validate().is_err());

        config = ClassifierConfig::default();
        config.night_threshold = 200.0;
        assert!(config.validate().is_err());

        config = ClassifierConfig::default();
        config.saturation_t4_threshold = f64::INFINITY;
        assert!(config.validate().is_err());

        config = ClassifierConfig::default();
        config.sanity = SanityGate::new(1.2, 1.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: ClassifierConfig =
            serde_yaml::from_str("night_threshold: 85.0\nsanity:\n  min_sum: 0.9\n  max_sum: 1.1\n")
                .unwrap();
        assert_eq!(config.night_threshold, 85.0);
        assert_eq!(config.sanity, SanityGate::new(0.9, 1.1));
        assert_eq!(config.saturation_t4_threshold, 50.0);
        assert!(config.parallel);
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("ICECOVER_CLASSIFY_NIGHT", "true");
        std::env::set_var("ICECOVER_SANITY_MAX", "1.2");
        let config = ClassifierConfig::from_env();
        std::env::remove_var("ICECOVER_CLASSIFY_NIGHT");
        std::env::remove_var("ICECOVER_SANITY_MAX");

        assert!(config.classify_night);
        assert_eq!(config.sanity.max_sum, 1.2);
        assert_eq!(config.night_threshold, 90.0);
    }
}
