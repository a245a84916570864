//! JSON scene bundles and classification products.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use channel_data::{Dataset, Sensor};
use chrono::{DateTime, Utc};
use classifier::{
    classify_swath, ClassificationOutput, ClassifierConfig, ClassifierError, CoefficientTable,
    PassInputs, PassReport, ProductPlanes,
};
use icecover_common::GridReference;
use projection::SubTrack;
use serde::{Deserialize, Serialize};
use tracing::info;

/// All inputs of one pass, as handed over by the I/O layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneBundle {
    pub image: Dataset,
    pub angles: Dataset,
    #[serde(default)]
    pub land_mask: Option<Dataset>,
    #[serde(default)]
    pub nwp: Option<Dataset>,
    #[serde(default)]
    pub subtrack: Option<SubTrack>,
}

impl SceneBundle {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene bundle from {:?}", path))?;
        let bundle: SceneBundle = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse scene bundle from {:?}", path))?;

        info!(
            platform = %bundle.image.header.platform,
            sensor = %bundle.image.header.sensor,
            layers = bundle.image.layers.len(),
            land_mask = bundle.land_mask.is_some(),
            nwp = bundle.nwp.is_some(),
            subtrack = bundle.subtrack.is_some(),
            "Loaded scene bundle"
        );

        Ok(bundle)
    }

    pub fn inputs(&self) -> PassInputs<'_> {
        let mut inputs = PassInputs::new(&self.image, &self.angles);
        if let Some(mask) = &self.land_mask {
            inputs = inputs.with_land_mask(mask);
        }
        if let Some(nwp) = &self.nwp {
            inputs = inputs.with_nwp(nwp);
        }
        if let Some(track) = &self.subtrack {
            inputs = inputs.with_subtrack(track);
        }
        inputs
    }
}

/// Classified planes of a scene together with the pass report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationProduct {
    pub platform: String,
    pub sensor: Sensor,
    pub acquired: DateTime<Utc>,
    pub grid: GridReference,
    pub report: PassReport,
    pub planes: ProductPlanes,
}

/// Run a classification pass over a bundle.
pub fn classify_scene(
    bundle: &SceneBundle,
    config: &ClassifierConfig,
    table: &CoefficientTable,
) -> std::result::Result<ClassificationProduct, ClassifierError> {
    let header = &bundle.image.header;
    let mut output = ClassificationOutput::for_grid(&header.grid);
    let report = classify_swath(&bundle.inputs(), config, table, &mut output)?;

    Ok(ClassificationProduct {
        platform: header.platform.clone(),
        sensor: header.sensor,
        acquired: header.acquired,
        grid: header.grid,
        report,
        planes: output.planes(),
    })
}

/// Write a product as JSON.
pub fn write_product<P: AsRef<Path>>(path: P, product: &ClassificationProduct) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string(product).context("Failed to serialize product")?;
    fs::write(path, json).with_context(|| format!("Failed to write product to {:?}", path))?;
    info!(path = %path.display(), "Wrote classification product");
    Ok(())
}
