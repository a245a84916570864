//! Bayesian probability estimation of ice, open water and cloud.
//!
//! Features are treated as conditionally independent given the class, so the
//! posterior is the prior times the product of per-feature Gaussian
//! likelihoods. Everything is accumulated in log space and normalised with
//! log-sum-exp.

use std::f64::consts::PI;

use crate::coefficients::CoefficientTable;
use crate::error::EstimatorError;
use crate::pixel::{ClassProbabilities, PixelInput};

fn log_gaussian(x: f64, mean: f64, std: f64) -> f64 {
    let z = (x - mean) / std;
    -0.5 * z * z - std.ln() - 0.5 * (2.0 * PI).ln()
}

/// Estimate class probabilities for one pixel.
///
/// Features whose inputs (or angle) are missing are skipped. The result is
/// normalised, but callers still pass it through the sanity gate.
pub fn probest(
    input: &PixelInput,
    table: &CoefficientTable,
) -> Result<ClassProbabilities, EstimatorError> {
    let set = table
        .select(input.mode, input.surface)
        .ok_or(EstimatorError::NoCoefficients {
            mode: input.mode,
            surface: input.surface,
        })?;

    let mut log_post = set.priors.as_array().map(f64::ln);
    let mut used = 0usize;

    for fc in &set.features {
        let Some(x) = fc.feature.value(input) else {
            continue;
        };
        let Some(angle) = fc.angle.value(input) else {
            continue;
        };

        for (k, (class, stats)) in fc.classes().into_iter().enumerate() {
            let (mean, std) = stats.at(angle);
            if !mean.is_finite() || !(std.is_finite() && std > 0.0) {
                return Err(EstimatorError::InvalidDistribution {
                    feature: fc.feature.to_string(),
                    class: class.to_string(),
                    mean,
                    std,
                });
            }
            log_post[k] += log_gaussian(x, mean, std);
        }
        used += 1;
    }

    if used == 0 {
        return Err(EstimatorError::NoUsableFeatures { mode: input.mode });
    }

    let max = log_post.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let weights = log_post.map(|l| (l - max).exp());
    let total: f64 = weights.iter().sum();

    Ok(ClassProbabilities::new(
        (weights[0] / total) as f32,
        (weights[1] / total) as f32,
        (weights[2] / total) as f32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::{
        AngleVariable, ClassStats, CoefficientSet, Feature, FeatureCoefficients, Priors,
    };
    use crate::pixel::{AlgorithmMode, Surface};
    use channel_data::Sensor;

    fn t4_table(priors: Priors) -> CoefficientTable {
        CoefficientTable::new(vec![CoefficientSet {
            mode: AlgorithmMode::Day,
            surface: Surface::Sea,
            priors,
            features: vec![FeatureCoefficients {
                feature: Feature::T4,
                angle: AngleVariable::None,
                ice: ClassStats::constant(255.0, 5.0),
                free: ClassStats::constant(272.0, 2.0),
                cloud: ClassStats::constant(240.0, 10.0),
            }],
        }])
    }

    fn input_with_t4(t4: f64) -> PixelInput {
        let mut input = PixelInput::empty("NOAA-19", Sensor::Avhrr, 100);
        input.t4 = t4;
        input
    }

    #[test]
    fn test_posterior_sums_to_one() {
        let table = t4_table(Priors::default());
        for t4 in [200.0, 240.0, 255.0, 265.0, 272.0, 300.0] {
            let p = probest(&input_with_t4(t4), &table).unwrap();
            assert!((p.sum() - 1.0).abs() < 1e-6, "t4 {} sum {}", t4, p.sum());
            assert!(!p.has_nan());
        }
    }

    #[test]
    fn test_nearest_class_mean_wins() {
        let table = t4_table(Priors::default());
        let p = probest(&input_with_t4(255.0), &table).unwrap();
        assert!(p.p_ice > p.p_free && p.p_ice > p.p_cloud);

        let p = probest(&input_with_t4(272.0), &table).unwrap();
        assert!(p.p_free > p.p_ice && p.p_free > p.p_cloud);

        let p = probest(&input_with_t4(235.0), &table).unwrap();
        assert!(p.p_cloud > p.p_ice && p.p_cloud > p.p_free);
    }

    #[test]
    fn test_priors_shift_posterior() {
        let flat = probest(&input_with_t4(250.0), &t4_table(Priors::default())).unwrap();
        let cloudy = probest(
            &input_with_t4(250.0),
            &t4_table(Priors {
                ice: 0.1,
                free: 0.1,
                cloud: 0.8,
            }),
        )
        .unwrap();
        assert!(cloudy.p_cloud > flat.p_cloud);
    }

    #[test]
    fn test_extreme_values_do_not_underflow() {
        let p = probest(&input_with_t4(1.0e4), &t4_table(Priors::default())).unwrap();
        assert!((p.sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_usable_features() {
        let err = probest(&input_with_t4(-999.0), &t4_table(Priors::default())).unwrap_err();
        assert_eq!(
            err,
            EstimatorError::NoUsableFeatures {
                mode: AlgorithmMode::Day
            }
        );
    }

    #[test]
    fn test_no_coefficients() {
        let mut input = input_with_t4(260.0);
        input.mode = AlgorithmMode::Night;
        let err = probest(&input, &t4_table(Priors::default())).unwrap_err();
        assert!(matches!(err, EstimatorError::NoCoefficients { .. }));
    }

    #[test]
    fn test_invalid_distribution() {
        let mut table = t4_table(Priors::default());
        table.sets[0].features[0].angle = AngleVariable::Solar;
        table.sets[0].features[0].free = ClassStats {
            mean: vec![272.0],
            std: vec![2.0, -0.1],
        };

        let mut input = input_with_t4(260.0);
        input.solar_zenith = 30.0;
        let err = probest(&input, &table).unwrap_err();
        assert!(matches!(
            err,
            EstimatorError::InvalidDistribution { ref class, .. } if class == "free"
        ));

        // Without a solar angle the feature is skipped entirely
        input.solar_zenith = -999.0;
        assert!(matches!(
            probest(&input, &table),
            Err(EstimatorError::NoUsableFeatures { .. })
        ));
    }
}
