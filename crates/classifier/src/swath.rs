//! The classification pass over a swath.
//!
//! [`PassContext`] resolves and validates every input once. After that,
//! [`classify_pixel`] is a pure function of the context and a pixel index,
//! so rows can be classified in parallel without any synchronisation.

use std::time::Instant;

use channel_data::{
    ChannelLayer, Dataset, LogicalChannel, Sensor, SensorChannelMap, LAND_MASK_NAMES,
    NWP_SURFACE_TEMPERATURE_NAMES, SATELLITE_ZENITH_NAMES, SOLAR_ZENITH_NAMES,
};
use icecover_common::{GridReference, PixelIndex};
use projection::{index_to_geo, satellite_zenith, SubTrack, SubtrackError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::coefficients::CoefficientTable;
use crate::config::ClassifierConfig;
use crate::decision::{class_index, Category, GateVerdict};
use crate::error::{ClassifierError, Result};
use crate::output::{ClassificationOutput, PixelOutcome};
use crate::pixel::{is_available, AlgorithmMode, PixelInput, Surface, MISSING_VALUE};
use crate::probest::probest;
use crate::reflectance::{channel3b_response, reflectance_3b};

/// Input products of one pass. Only `image` and `angles` are required.
#[derive(Debug, Clone, Copy)]
pub struct PassInputs<'a> {
    /// Satellite channels
    pub image: &'a Dataset,
    /// Sun (and optionally satellite) zenith angles
    pub angles: &'a Dataset,
    pub land_mask: Option<&'a Dataset>,
    /// NWP surface temperature
    pub nwp: Option<&'a Dataset>,
    /// Ground track, used for satellite zenith when `angles` has none
    pub subtrack: Option<&'a SubTrack>,
}

impl<'a> PassInputs<'a> {
    pub fn new(image: &'a Dataset, angles: &'a Dataset) -> Self {
        Self {
            image,
            angles,
            land_mask: None,
            nwp: None,
            subtrack: None,
        }
    }

    pub fn with_land_mask(mut self, land_mask: &'a Dataset) -> Self {
        self.land_mask = Some(land_mask);
        self
    }

    pub fn with_nwp(mut self, nwp: &'a Dataset) -> Self {
        self.nwp = Some(nwp);
        self
    }

    pub fn with_subtrack(mut self, subtrack: &'a SubTrack) -> Self {
        self.subtrack = Some(subtrack);
        self
    }
}

/// Layers of the image resolved per logical channel.
#[derive(Debug, Clone, Copy)]
struct ChannelLayers<'a> {
    ch1: Option<&'a ChannelLayer>,
    ch2: Option<&'a ChannelLayer>,
    ch3a: Option<&'a ChannelLayer>,
    ch3b: Option<&'a ChannelLayer>,
    ch4: Option<&'a ChannelLayer>,
    ch5: Option<&'a ChannelLayer>,
}

impl<'a> ChannelLayers<'a> {
    fn new(image: &'a Dataset, map: &SensorChannelMap) -> Self {
        let layer = |ch| map.get(ch).and_then(|i| image.layer(i));
        Self {
            ch1: layer(LogicalChannel::Ch1),
            ch2: layer(LogicalChannel::Ch2),
            ch3a: layer(LogicalChannel::Ch3a),
            ch3b: layer(LogicalChannel::Ch3b),
            ch4: layer(LogicalChannel::Ch4),
            ch5: layer(LogicalChannel::Ch5),
        }
    }
}

fn physical_or_missing(layer: Option<&ChannelLayer>, flat: usize) -> f64 {
    layer.and_then(|l| l.physical(flat)).unwrap_or(MISSING_VALUE)
}

fn check_grid(product: &str, expected: &GridReference, dataset: &Dataset) -> Result<()> {
    dataset.validate()?;
    if !expected.same_lattice(dataset.grid()) {
        return Err(ClassifierError::grid_mismatch(product, expected, dataset.grid()));
    }
    Ok(())
}

/// Validated, read-only state shared by every pixel of a pass.
#[derive(Debug)]
pub struct PassContext<'a> {
    image: &'a Dataset,
    channels: ChannelLayers<'a>,
    solar_zenith: &'a ChannelLayer,
    satellite_zenith: Option<&'a ChannelLayer>,
    land_mask: Option<&'a ChannelLayer>,
    nwp_surface: Option<&'a ChannelLayer>,
    subtrack: Option<&'a SubTrack>,
    config: &'a ClassifierConfig,
    table: &'a CoefficientTable,
    day_of_year: u32,
}

impl<'a> PassContext<'a> {
    /// Resolve and validate all inputs. Every error here is fatal.
    pub fn new(
        inputs: &PassInputs<'a>,
        config: &'a ClassifierConfig,
        table: &'a CoefficientTable,
    ) -> Result<Self> {
        config.validate().map_err(ClassifierError::InvalidConfig)?;
        table.validate()?;

        let image = inputs.image;
        image.validate()?;
        let grid = image.grid();

        let map = SensorChannelMap::resolve(image);
        map.require_core()?;

        check_grid("angle product", grid, inputs.angles)?;
        let solar_zenith = inputs.angles.require(SOLAR_ZENITH_NAMES)?;
        let satellite_zenith = inputs.angles.find(SATELLITE_ZENITH_NAMES);

        let land_mask = match inputs.land_mask {
            Some(ds) => {
                check_grid("land mask", grid, ds)?;
                Some(ds.require(LAND_MASK_NAMES)?)
            }
            None => {
                info!("No land mask supplied, using sea/ice/cloud coefficients everywhere");
                None
            }
        };

        let nwp_surface = match inputs.nwp {
            Some(ds) => {
                check_grid("NWP product", grid, ds)?;
                Some(ds.require(NWP_SURFACE_TEMPERATURE_NAMES)?)
            }
            None => None,
        };

        let platform = &image.header.platform;
        if map.ch3b.is_some() && channel3b_response(platform).is_none() {
            warn!(
                platform = %platform,
                "No channel 3b calibration for platform, 3b reflectance is unavailable"
            );
        }
        if config.classify_night && !table.has_mode(AlgorithmMode::Night) {
            warn!("Night classification enabled but the coefficient table has no night set");
        }
        if satellite_zenith.is_none() && inputs.subtrack.is_none() {
            debug!("No satellite zenith source, satellite-angle features are skipped");
        }

        Ok(Self {
            image,
            channels: ChannelLayers::new(image, &map),
            solar_zenith,
            satellite_zenith,
            land_mask,
            nwp_surface,
            subtrack: inputs.subtrack,
            config,
            table,
            day_of_year: image.header.day_of_year(),
        })
    }

    pub fn grid(&self) -> &GridReference {
        self.image.grid()
    }

    fn surface(&self, flat: usize) -> Surface {
        let Some(mask) = self.land_mask else {
            return Surface::Sea;
        };
        match mask.raw(flat) {
            Some(raw) if !mask.is_sentinel(raw) && raw != 0.0 => Surface::Land,
            _ => Surface::Sea,
        }
    }

    fn track_zenith(&self, index: PixelIndex, track: &SubTrack) -> std::result::Result<f64, SubtrackError> {
        let geo = index_to_geo(self.grid(), index, self.image.header.projection)?;
        satellite_zenith(geo, track)
    }

    /// Covered when at least one present thermal layer reads a non-zero count.
    fn has_coverage(&self, flat: usize) -> bool {
        let mut present = false;
        for layer in [self.channels.ch4, self.channels.ch5].into_iter().flatten() {
            present = true;
            if layer.raw(flat) != Some(0.0) {
                return true;
            }
        }
        !present
    }
}

/// Classify one pixel.
pub fn classify_pixel(ctx: &PassContext<'_>, index: PixelIndex) -> PixelOutcome {
    let Some(flat) = ctx.grid().flat_index(index) else {
        return PixelOutcome::NoCoverage;
    };

    if !ctx.has_coverage(flat) {
        return PixelOutcome::NoCoverage;
    }

    let Some(sza) = ctx.solar_zenith.physical(flat) else {
        return PixelOutcome::NoCoverage;
    };

    let mut mode = AlgorithmMode::Day;
    if sza >= ctx.config.night_threshold {
        if !ctx.config.classify_night {
            return PixelOutcome::Night;
        }
        mode = AlgorithmMode::Night;
    }

    let header = &ctx.image.header;
    let ch = &ctx.channels;
    let mut input = PixelInput::empty(header.platform.clone(), header.sensor, ctx.day_of_year);
    input.solar_zenith = sza;
    input.a1 = physical_or_missing(ch.ch1, flat);
    input.a2 = physical_or_missing(ch.ch2, flat);
    input.a3a = physical_or_missing(ch.ch3a, flat);
    input.t3b = physical_or_missing(ch.ch3b, flat);
    input.t4 = physical_or_missing(ch.ch4, flat);
    input.t5 = physical_or_missing(ch.ch5, flat);

    if mode == AlgorithmMode::Day && !is_available(input.a3a) && is_available(input.t3b) {
        mode = AlgorithmMode::DayUsing3b;
        // Failures were reported once at setup; the feature just drops out
        input.a3b = reflectance_3b(input.t3b, input.t4, sza, &header.platform, ctx.day_of_year)
            .unwrap_or(MISSING_VALUE);
    }
    input.mode = mode;

    if mode == AlgorithmMode::Day && header.sensor == Sensor::Avhrr {
        let ch3a_zero = ch.ch3a.and_then(|l| l.raw(flat)) == Some(0.0);
        if ch3a_zero && is_available(input.t4) && input.t4 > ctx.config.saturation_t4_threshold {
            return PixelOutcome::Saturated3a;
        }
    }

    input.surface = ctx.surface(flat);

    if let Some(layer) = ctx.satellite_zenith {
        input.satellite_zenith = physical_or_missing(Some(layer), flat);
    } else if let Some(track) = ctx.subtrack {
        match ctx.track_zenith(index, track) {
            Ok(zenith) => input.satellite_zenith = zenith,
            Err(e) => {
                debug!(pixel = %index, error = %e, "Viewing geometry failed");
                return PixelOutcome::EstimatorFailed;
            }
        }
    }

    if let Some(nwp) = ctx.nwp_surface {
        let surface_t = physical_or_missing(Some(nwp), flat);
        if is_available(surface_t) && is_available(input.t4) {
            input.nwp_tdiff = input.t4 - surface_t;
        }
    }

    let probabilities = match probest(&input, ctx.table) {
        Ok(p) => p,
        Err(e) => {
            debug!(pixel = %index, error = %e, "Probability estimate failed");
            return PixelOutcome::EstimatorFailed;
        }
    };

    if ctx.config.sanity.evaluate(&probabilities) == GateVerdict::Discarded {
        return PixelOutcome::Unstable;
    }

    PixelOutcome::Classified {
        probabilities,
        class_index: class_index(probabilities.p_ice as f64),
        category: Category::from_probabilities(&probabilities),
    }
}

/// Number of pixels per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub classified: usize,
    pub no_coverage: usize,
    pub night: usize,
    pub saturated_3a: usize,
    pub unstable: usize,
    pub estimator_failed: usize,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: &PixelOutcome) {
        match outcome {
            PixelOutcome::Classified { .. } => self.classified += 1,
            PixelOutcome::NoCoverage => self.no_coverage += 1,
            PixelOutcome::Night => self.night += 1,
            PixelOutcome::Saturated3a => self.saturated_3a += 1,
            PixelOutcome::Unstable => self.unstable += 1,
            PixelOutcome::EstimatorFailed => self.estimator_failed += 1,
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            classified: self.classified + other.classified,
            no_coverage: self.no_coverage + other.no_coverage,
            night: self.night + other.night,
            saturated_3a: self.saturated_3a + other.saturated_3a,
            unstable: self.unstable + other.unstable,
            estimator_failed: self.estimator_failed + other.estimator_failed,
        }
    }

    pub fn total(&self) -> usize {
        self.classified
            + self.no_coverage
            + self.night
            + self.saturated_3a
            + self.unstable
            + self.estimator_failed
    }

    /// Pixels the estimator was run on but produced no result.
    pub fn skipped(&self) -> usize {
        self.unstable + self.estimator_failed
    }
}

/// Overall status of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassStatus {
    Complete,
    /// At least one pixel had a hard estimator failure
    Partial,
}

/// Summary of a completed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassReport {
    pub status: PassStatus,
    pub counts: OutcomeCounts,
}

impl PassReport {
    pub fn from_counts(counts: OutcomeCounts) -> Self {
        let status = if counts.estimator_failed > 0 {
            PassStatus::Partial
        } else {
            PassStatus::Complete
        };
        Self { status, counts }
    }
}

fn classify_row(ctx: &PassContext<'_>, row: usize, pixels: &mut [PixelOutcome]) -> OutcomeCounts {
    let mut counts = OutcomeCounts::default();
    for (col, px) in pixels.iter_mut().enumerate() {
        *px = classify_pixel(ctx, PixelIndex::new(row as i32, col as i32));
        counts.record(px);
    }
    counts
}

/// Classify every pixel of the image into `output`.
///
/// Setup problems abort before any pixel is written. Per-pixel failures
/// never abort the pass; they are counted in the report.
pub fn classify_swath(
    inputs: &PassInputs<'_>,
    config: &ClassifierConfig,
    table: &CoefficientTable,
    output: &mut ClassificationOutput,
) -> Result<PassReport> {
    let ctx = PassContext::new(inputs, config, table)?;
    let grid = *ctx.grid();

    if output.width != grid.width || output.height != grid.height || output.len() != grid.len() {
        return Err(ClassifierError::OutputSizeMismatch {
            width: grid.width,
            height: grid.height,
            actual_width: output.width,
            actual_height: output.height,
        });
    }

    let start = Instant::now();
    let counts = if config.parallel {
        output
            .pixels
            .par_chunks_mut(grid.width)
            .enumerate()
            .map(|(row, pixels)| classify_row(&ctx, row, pixels))
            .reduce(OutcomeCounts::default, OutcomeCounts::merge)
    } else {
        output
            .pixels
            .chunks_mut(grid.width)
            .enumerate()
            .map(|(row, pixels)| classify_row(&ctx, row, pixels))
            .fold(OutcomeCounts::default(), OutcomeCounts::merge)
    };

    let report = PassReport::from_counts(counts);

    if counts.skipped() > 0 {
        warn!(
            unstable = counts.unstable,
            estimator_failed = counts.estimator_failed,
            "Skipped {} pixels without a usable estimate",
            counts.skipped()
        );
    }

    info!(
        platform = %inputs.image.header.platform,
        width = grid.width,
        height = grid.height,
        classified = counts.classified,
        no_coverage = counts.no_coverage,
        night = counts.night,
        saturated_3a = counts.saturated_3a,
        status = ?report.status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Classification pass finished"
    );

    Ok(report)
}
