//! Turning class probabilities into a verdict, a class index and a category.

use serde::{Deserialize, Serialize};

use crate::pixel::ClassProbabilities;

/// Number of ice-probability bins above zero.
pub const NUM_CLASSES: u8 = 20;

/// Accepted range for the sum of the three class probabilities.
///
/// The estimator's residual is not guaranteed to vanish, so results whose
/// sum drifts outside this range are treated as numerically unstable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SanityGate {
    pub min_sum: f64,
    pub max_sum: f64,
}

impl Default for SanityGate {
    fn default() -> Self {
        Self {
            min_sum: 0.95,
            max_sum: 1.05,
        }
    }
}

/// Outcome of the sanity gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateVerdict {
    Accepted,
    Discarded,
}

impl SanityGate {
    pub fn new(min_sum: f64, max_sum: f64) -> Self {
        Self { min_sum, max_sum }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.min_sum.is_finite() || !self.max_sum.is_finite() {
            return Err("sanity gate bounds must be finite".to_string());
        }
        if self.min_sum > self.max_sum {
            return Err(format!(
                "sanity gate min_sum {} exceeds max_sum {}",
                self.min_sum, self.max_sum
            ));
        }
        if !(self.min_sum..=self.max_sum).contains(&1.0) {
            return Err(format!(
                "sanity gate [{}, {}] does not contain 1",
                self.min_sum, self.max_sum
            ));
        }
        Ok(())
    }

    /// Discard results with a NaN probability or a sum outside the range.
    pub fn evaluate(&self, p: &ClassProbabilities) -> GateVerdict {
        if p.has_nan() {
            return GateVerdict::Discarded;
        }
        let sum = p.sum();
        if sum < self.min_sum || sum > self.max_sum {
            return GateVerdict::Discarded;
        }
        GateVerdict::Accepted
    }
}

/// Discretize an ice probability into 21 ordered classes.
///
/// Class 0 holds negative probabilities; otherwise the class is one plus the
/// number of thresholds k/20 (k = 1..=19) at or below `p`, so [0, 0.05) is
/// class 1 and [0.95, 1.0] is class 20.
pub fn class_index(p: f64) -> u8 {
    if p.is_nan() || p < 0.0 {
        return 0;
    }
    let passed = (1..NUM_CLASSES)
        .filter(|k| p >= *k as f64 / NUM_CLASSES as f64)
        .count() as u8;
    1 + passed
}

/// Dominant class of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// No single class strictly dominates
    Unclassified,
    Ice,
    /// Open water
    Clear,
    Cloud,
}

impl Category {
    /// Code written to the category plane.
    pub fn code(&self) -> u8 {
        match self {
            Category::Unclassified => 0,
            Category::Ice => 1,
            Category::Clear => 2,
            Category::Cloud => 3,
        }
    }

    /// The class strictly greater than both others, or `Unclassified`.
    pub fn from_probabilities(p: &ClassProbabilities) -> Self {
        let ClassProbabilities {
            p_ice,
            p_free,
            p_cloud,
        } = *p;

        if p_ice > p_free && p_ice > p_cloud {
            Category::Ice
        } else if p_free > p_ice && p_free > p_cloud {
            Category::Clear
        } else if p_cloud > p_ice && p_cloud > p_free {
            Category::Cloud
        } else {
            Category::Unclassified
        }
    }
}
