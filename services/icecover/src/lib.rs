//! Front end for the icecover classifier.
//!
//! Loads the YAML configuration and coefficient table, reads JSON scene
//! bundles and writes classification products.

pub mod config_loader;
pub mod scene;

pub use config_loader::{load_coefficients, load_config, IcecoverConfig};
pub use scene::{classify_scene, write_product, ClassificationProduct, SceneBundle};
