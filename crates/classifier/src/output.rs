//! Per-pixel outcomes and the output planes they render to.

use icecover_common::{GridReference, PixelIndex};
use serde::{Deserialize, Serialize};

use crate::decision::Category;
use crate::pixel::ClassProbabilities;

/// Class index written for pixels without a classification.
pub const CLASS_MISSING: u8 = 255;

/// Category code written for pixels without a classification.
pub const CATEGORY_MISSING: u8 = 255;

/// Probability sentinels of the unclassified outcome families.
pub mod sentinel {
    pub const NO_COVERAGE: f32 = -999.0;
    pub const NIGHT: f32 = -998.0;
    pub const SATURATED_3A: f32 = -997.0;
    pub const UNSTABLE: f32 = -996.0;
    pub const ESTIMATOR_FAILED: f32 = -995.0;
}

/// Result of classifying one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PixelOutcome {
    Classified {
        probabilities: ClassProbabilities,
        class_index: u8,
        category: Category,
    },
    /// The thermal channels were not acquired
    #[default]
    NoCoverage,
    /// Solar zenith at or above the night threshold
    Night,
    /// Channel 3a saturation artifact
    Saturated3a,
    /// Discarded by the sanity gate
    Unstable,
    /// Hard per-pixel failure (estimator or viewing geometry)
    EstimatorFailed,
}

impl PixelOutcome {
    /// Probability written to the planes for non-classified outcomes.
    pub fn sentinel(&self) -> Option<f32> {
        match self {
            PixelOutcome::Classified { .. } => None,
            PixelOutcome::NoCoverage => Some(sentinel::NO_COVERAGE),
            PixelOutcome::Night => Some(sentinel::NIGHT),
            PixelOutcome::Saturated3a => Some(sentinel::SATURATED_3A),
            PixelOutcome::Unstable => Some(sentinel::UNSTABLE),
            PixelOutcome::EstimatorFailed => Some(sentinel::ESTIMATOR_FAILED),
        }
    }

    pub fn probabilities(&self) -> Option<ClassProbabilities> {
        match self {
            PixelOutcome::Classified { probabilities, .. } => Some(*probabilities),
            _ => None,
        }
    }

    pub fn is_classified(&self) -> bool {
        matches!(self, PixelOutcome::Classified { .. })
    }
}

/// Classification result of a whole grid, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationOutput {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<PixelOutcome>,
}

impl ClassificationOutput {
    /// Allocate an output with every pixel at `NoCoverage`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![PixelOutcome::default(); width * height],
        }
    }

    pub fn for_grid(grid: &GridReference) -> Self {
        Self::new(grid.width, grid.height)
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn get(&self, index: PixelIndex) -> Option<&PixelOutcome> {
        if index.row < 0 || index.col < 0 {
            return None;
        }
        let (row, col) = (index.row as usize, index.col as usize);
        if row >= self.height || col >= self.width {
            return None;
        }
        self.pixels.get(row * self.width + col)
    }

    fn probability_plane(&self, pick: impl Fn(&ClassProbabilities) -> f32) -> Vec<f32> {
        self.pixels
            .iter()
            .map(|px| match px {
                PixelOutcome::Classified { probabilities, .. } => pick(probabilities),
                other => other.sentinel().unwrap_or(sentinel::NO_COVERAGE),
            })
            .collect()
    }

    pub fn p_ice(&self) -> Vec<f32> {
        self.probability_plane(|p| p.p_ice)
    }

    pub fn p_free(&self) -> Vec<f32> {
        self.probability_plane(|p| p.p_free)
    }

    pub fn p_cloud(&self) -> Vec<f32> {
        self.probability_plane(|p| p.p_cloud)
    }

    pub fn class_index(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .map(|px| match px {
                PixelOutcome::Classified { class_index, .. } => *class_index,
                _ => CLASS_MISSING,
            })
            .collect()
    }

    pub fn category(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .map(|px| match px {
                PixelOutcome::Classified { category, .. } => category.code(),
                _ => CATEGORY_MISSING,
            })
            .collect()
    }

    /// Render all output planes.
    pub fn planes(&self) -> ProductPlanes {
        ProductPlanes {
            width: self.width,
            height: self.height,
            p_ice: self.p_ice(),
            p_free: self.p_free(),
            p_cloud: self.p_cloud(),
            class_index: self.class_index(),
            category: self.category(),
        }
    }
}

/// Row-major output planes of a classified grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPlanes {
    pub width: usize,
    pub height: usize,
    pub p_ice: Vec<f32>,
    pub p_free: Vec<f32>,
    pub p_cloud: Vec<f32>,
    pub class_index: Vec<u8>,
    pub category: Vec<u8>,
}
