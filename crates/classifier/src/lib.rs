//! Probabilistic ice / open water / cloud classification of satellite
//! swaths.
//!
//! The pass resolves the image channels through a sensor channel map,
//! branches per pixel on coverage, illumination and channel-3 availability,
//! and feeds the assembled [`PixelInput`] to a naive Bayes estimator
//! ([`probest`]) driven by a [`CoefficientTable`]. Accepted estimates are
//! discretized into a 21-level ice class and a dominant category.
//!
//! # Example
//!
//! ```ignore
//! use classifier::{classify_swath, ClassificationOutput, ClassifierConfig, CoefficientTable, PassInputs};
//!
//! let table = CoefficientTable::from_yaml_file("config/coefficients.yaml")?;
//! let inputs = PassInputs::new(&image, &angles).with_land_mask(&mask);
//! let mut output = ClassificationOutput::for_grid(image.grid());
//! let report = classify_swath(&inputs, &ClassifierConfig::default(), &table, &mut output)?;
//! ```

pub mod coefficients;
pub mod config;
pub mod decision;
pub mod error;
pub mod output;
pub mod pixel;
pub mod probest;
pub mod reflectance;
pub mod swath;

pub use coefficients::{
    AngleVariable, ClassStats, CoefficientSet, CoefficientTable, Feature, FeatureCoefficients,
    Priors,
};
pub use config::ClassifierConfig;
pub use decision::{class_index, Category, GateVerdict, SanityGate};
pub use error::{ClassifierError, EstimatorError, Reflectance3bError, Result};
pub use output::{
    sentinel, ClassificationOutput, PixelOutcome, ProductPlanes, CATEGORY_MISSING, CLASS_MISSING,
};
pub use pixel::{AlgorithmMode, ClassProbabilities, PixelInput, Surface, MISSING_VALUE};
pub use probest::probest;
pub use reflectance::{channel3b_response, reflectance_3b};
pub use swath::{
    classify_pixel, classify_swath, OutcomeCounts, PassContext, PassInputs, PassReport, PassStatus,
};
