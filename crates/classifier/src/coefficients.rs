//! Statistical coefficient tables for the probability estimator.
//!
//! A table is a list of coefficient sets keyed by algorithm mode and
//! surface. Each set holds class priors and, per feature, a Gaussian
//! class-conditional distribution whose mean and standard deviation are
//! polynomials in an angle (solar zenith, satellite zenith, or none).
//!
//! ```yaml
//! - mode: day
//!   surface: sea
//!   priors: { ice: 0.3, free: 0.3, cloud: 0.4 }
//!   features:
//!     - feature: a1
//!       angle: solar
//!       ice:   { mean: [70.0, -0.4], std: [12.0] }
//!       free:  { mean: [6.0], std: [3.0] }
//!       cloud: { mean: [55.0, -0.2], std: [18.0] }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::error::{ClassifierError, Result};
use crate::pixel::{is_available, AlgorithmMode, PixelInput, Surface};

/// Derived quantity compared against the class distributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Channel 1 reflectance
    A1,
    /// Ratio of channel 2 to channel 1 reflectance
    A2OverA1,
    /// Ratio of channel 3 (3a or synthetic 3b) to channel 1 reflectance
    A3OverA1,
    /// Split-window temperature difference
    T4MinusT5,
    /// 3.7 µm minus 11 µm temperature difference
    T3bMinusT4,
    /// Channel 4 temperature minus NWP surface temperature
    T4MinusNwp,
    /// Channel 4 brightness temperature
    T4,
}

impl Feature {
    /// Value of the feature for a pixel, if all its inputs are available.
    pub fn value(&self, input: &PixelInput) -> Option<f64> {
        let ratio = |num: f64| {
            if is_available(num) && is_available(input.a1) && input.a1 > 0.0 {
                Some(num / input.a1)
            } else {
                None
            }
        };
        let diff = |a: f64, b: f64| {
            if is_available(a) && is_available(b) {
                Some(a - b)
            } else {
                None
            }
        };

        match self {
            Feature::A1 => is_available(input.a1).then_some(input.a1),
            Feature::A2OverA1 => ratio(input.a2),
            Feature::A3OverA1 => ratio(input.a3()),
            Feature::T4MinusT5 => diff(input.t4, input.t5),
            Feature::T3bMinusT4 => diff(input.t3b, input.t4),
            Feature::T4MinusNwp => is_available(input.nwp_tdiff).then_some(input.nwp_tdiff),
            Feature::T4 => is_available(input.t4).then_some(input.t4),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::A1 => "a1",
            Feature::A2OverA1 => "a2_over_a1",
            Feature::A3OverA1 => "a3_over_a1",
            Feature::T4MinusT5 => "t4_minus_t5",
            Feature::T3bMinusT4 => "t3b_minus_t4",
            Feature::T4MinusNwp => "t4_minus_nwp",
            Feature::T4 => "t4",
        };
        write!(f, "{}", name)
    }
}

/// Angle the distribution parameters depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleVariable {
    Solar,
    Satellite,
    #[default]
    None,
}

impl AngleVariable {
    /// Angle value for a pixel; `None` when the angle is needed but missing.
    pub fn value(&self, input: &PixelInput) -> Option<f64> {
        match self {
            AngleVariable::Solar => is_available(input.solar_zenith).then_some(input.solar_zenith),
            AngleVariable::Satellite => {
                is_available(input.satellite_zenith).then_some(input.satellite_zenith)
            }
            AngleVariable::None => Some(0.0),
        }
    }
}

/// Gaussian parameters of one class, as polynomials in the angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassStats {
    /// Mean polynomial coefficients, constant term first
    pub mean: Vec<f64>,
    /// Standard deviation polynomial coefficients, constant term first
    pub std: Vec<f64>,
}

/// Evaluate a polynomial with the constant term first.
pub fn eval_poly(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

impl ClassStats {
    pub fn constant(mean: f64, std: f64) -> Self {
        Self {
            mean: vec![mean],
            std: vec![std],
        }
    }

    /// (mean, std) at an angle.
    pub fn at(&self, angle: f64) -> (f64, f64) {
        (eval_poly(&self.mean, angle), eval_poly(&self.std, angle))
    }
}

/// Class distributions of one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCoefficients {
    pub feature: Feature,
    #[serde(default)]
    pub angle: AngleVariable,
    pub ice: ClassStats,
    pub free: ClassStats,
    pub cloud: ClassStats,
}

impl FeatureCoefficients {
    /// Stats in class order ice, free, cloud.
    pub fn classes(&self) -> [(&'static str, &ClassStats); 3] {
        [("ice", &self.ice), ("free", &self.free), ("cloud", &self.cloud)]
    }
}

/// Prior class probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Priors {
    pub ice: f64,
    pub free: f64,
    pub cloud: f64,
}

impl Default for Priors {
    fn default() -> Self {
        Self {
            ice: 1.0 / 3.0,
            free: 1.0 / 3.0,
            cloud: 1.0 / 3.0,
        }
    }
}

impl Priors {
    pub fn as_array(&self) -> [f64; 3] {
        [self.ice, self.free, self.cloud]
    }
}

/// Coefficients for one (mode, surface) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientSet {
    pub mode: AlgorithmMode,
    pub surface: Surface,
    #[serde(default)]
    pub priors: Priors,
    pub features: Vec<FeatureCoefficients>,
}

/// All coefficient sets available to the estimator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoefficientTable {
    pub sets: Vec<CoefficientSet>,
}

impl CoefficientTable {
    pub fn new(sets: Vec<CoefficientSet>) -> Self {
        Self { sets }
    }

    /// Parse and validate a table from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let table: CoefficientTable = serde_yaml::from_str(yaml)?;
        table.validate()?;
        Ok(table)
    }

    /// Read, parse and validate a table from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            ClassifierError::coefficients(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Coefficient set for a mode and surface, falling back to the sea set of
    /// the same mode.
    pub fn select(&self, mode: AlgorithmMode, surface: Surface) -> Option<&CoefficientSet> {
        let find = |s: Surface| {
            self.sets
                .iter()
                .find(|set| set.mode == mode && set.surface == s)
        };
        find(surface).or_else(|| find(Surface::Sea))
    }

    /// Whether any set exists for a mode.
    pub fn has_mode(&self, mode: AlgorithmMode) -> bool {
        self.sets.iter().any(|set| set.mode == mode)
    }

    /// Check structural consistency of the table.
    pub fn validate(&self) -> Result<()> {
        if self.sets.is_empty() {
            return Err(ClassifierError::EmptyCoefficientTable);
        }

        let mut keys = HashSet::new();
        for set in &self.sets {
            let key = format!("{}/{}", set.mode, set.surface);
            if !keys.insert((set.mode, set.surface)) {
                return Err(ClassifierError::coefficients(format!("duplicate set {}", key)));
            }

            if set
                .priors
                .as_array()
                .iter()
                .any(|p| !(p.is_finite() && *p > 0.0))
            {
                return Err(ClassifierError::coefficients(format!(
                    "priors of {} must be positive",
                    key
                )));
            }

            if set.features.is_empty() {
                return Err(ClassifierError::coefficients(format!("{} has no features", key)));
            }

            for fc in &set.features {
                for (class, stats) in fc.classes() {
                    if stats.mean.is_empty() || stats.std.is_empty() {
                        return Err(ClassifierError::coefficients(format!(
                            "{} feature {} class {} has an empty polynomial",
                            key, fc.feature, class
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
- mode: day
  surface: sea
  priors: { ice: 0.3, free: 0.3, cloud: 0.4 }
  features:
    - feature: a1
      angle: solar
      ice:   { mean: [70.0, -0.4], std: [12.0] }
      free:  { mean: [6.0], std: [3.0] }
      cloud: { mean: [55.0, -0.2], std: [18.0] }
- mode: night
  surface: sea
  features:
    - feature: t4_minus_t5
      ice:   { mean: [0.5], std: [0.5] }
      free:  { mean: [1.0], std: [0.5] }
      cloud: { mean: [2.5], std: [1.5] }
"#;

    #[test]
    fn test_parse_table() {
        let table = CoefficientTable::from_yaml_str(YAML).unwrap();
        assert_eq!(table.len(), 2);

        let day = table.select(AlgorithmMode::Day, Surface::Sea).unwrap();
        assert_eq!(day.priors.cloud, 0.4);
        assert_eq!(day.features[0].feature, Feature::A1);
        assert_eq!(day.features[0].angle, AngleVariable::Solar);

        let night = table.select(AlgorithmMode::Night, Surface::Sea).unwrap();
        assert_eq!(night.features[0].angle, AngleVariable::None);
        assert_eq!(night.priors, Priors::default());
    }

    #[test]
    fn test_select_falls_back_to_sea() {
        let table = CoefficientTable::from_yaml_str(YAML).unwrap();
        let set = table.select(AlgorithmMode::Day, Surface::Land).unwrap();
        assert_eq!(set.surface, Surface::Sea);
        assert!(table.select(AlgorithmMode::DayUsing3b, Surface::Sea).is_none());
        assert!(table.has_mode(AlgorithmMode::Night));
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            CoefficientTable::from_yaml_str("[]"),
            Err(ClassifierError::EmptyCoefficientTable)
        ));

        let dup = format!("{}{}", YAML, &YAML[YAML.find("- mode: night").unwrap()..]);
        assert!(matches!(
            CoefficientTable::from_yaml_str(&dup),
            Err(ClassifierError::Coefficients(_))
        ));

        let bad_prior = YAML.replace("cloud: 0.4", "cloud: 0.0");
        assert!(CoefficientTable::from_yaml_str(&bad_prior).is_err());

        assert!(matches!(
            CoefficientTable::from_yaml_str("- mode: dusk\n  surface: sea\n  features: []\n"),
            Err(ClassifierError::Coefficients(_))
        ));
    }

    #[test]
    fn test_eval_poly() {
        assert_eq!(eval_poly(&[1.0, 2.0, 3.0], 2.0), 17.0);
        assert_eq!(eval_poly(&[4.0], 100.0), 4.0);
        assert_eq!(eval_poly(&[], 1.0), 0.0);
    }

    #[test]
    fn test_feature_values() {
        use channel_data::Sensor;

        let mut input = PixelInput::empty("NOAA-19", Sensor::Avhrr, 1);
        assert_eq!(Feature::A1.value(&input), None);

        input.a1 = 50.0;
        input.a2 = 40.0;
        input.t4 = 260.0;
        input.t5 = 259.0;
        assert_eq!(Feature::A1.value(&input), Some(50.0));
        assert_eq!(Feature::A2OverA1.value(&input), Some(0.8));
        assert_eq!(Feature::A3OverA1.value(&input), None);
        assert_eq!(Feature::T4MinusT5.value(&input), Some(1.0));
        assert_eq!(Feature::T3bMinusT4.value(&input), None);

        input.a1 = 0.0;
        assert_eq!(Feature::A2OverA1.value(&input), None);
    }
}
