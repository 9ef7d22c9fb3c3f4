//! Resampled-fraction estimator.
//!
//! Given a depth histogram, estimates which share of its total signal stays
//! detectable when every unit is independently kept with probability `f`
//! and a bin needs more than `t` retained observations to be detected.
//! Nothing is resampled; each bin contributes its weight scaled by the
//! probability that its thinned quantity clears the threshold.

use crate::data::ObservationMatrix;
use crate::error::{RareError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{DiscreteCDF, Poisson};

/// How a thinned bin is judged to clear the detection threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurvivalModel {
    /// Retained depth is Poisson with mean `depth · f`; the bin contributes
    /// `P(X > ⌊t⌋)` of its signal (`depth · mass`).
    #[default]
    Poisson,
    /// The bin contributes all of its mass if `mass · f > t`, else nothing.
    /// Fractions are taken over total mass.
    HardCutoff,
}

impl SurvivalModel {
    /// Probability that a bin whose thinned quantity is `lambda` clears `threshold`.
    ///
    /// `lambda` is the Poisson mean for [`SurvivalModel::Poisson`] and the
    /// expected retained mass for [`SurvivalModel::HardCutoff`].
    pub fn survival(&self, lambda: f64, threshold: f64) -> Result<f64> {
        match self {
            Self::Poisson => {
                if lambda <= 0.0 {
                    return Ok(0.0);
                }
                let dist = Poisson::new(lambda).map_err(|e| {
                    RareError::InvalidArgument(format!("Poisson mean {}: {}", lambda, e))
                })?;
                Ok(dist.sf(threshold.floor() as u64))
            }
            Self::HardCutoff => Ok(if lambda > threshold { 1.0 } else { 0.0 }),
        }
    }

    /// Thinned quantity and weight of one bin at sample fraction `fraction`.
    #[inline]
    fn thin(&self, depth: f64, mass: f64, fraction: f64) -> (f64, f64) {
        match self {
            Self::Poisson => (depth * fraction, depth * mass),
            Self::HardCutoff => (mass * fraction, mass),
        }
    }

    /// Get the descriptive name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Poisson => "poisson",
            Self::HardCutoff => "hard_cutoff",
        }
    }
}

/// Check that a sample fraction lies in (0, 1].
pub fn validate_fraction(fraction: f64) -> Result<()> {
    if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
        return Err(RareError::InvalidArgument(format!(
            "sample fraction must be in (0, 1], got {}",
            fraction
        )));
    }
    Ok(())
}

/// Check that a threshold is finite and non-negative.
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(RareError::InvalidArgument(format!(
            "threshold must be finite and non-negative, got {}",
            threshold
        )));
    }
    Ok(())
}

/// Per-bin depth and mass with both totals, empty bins dropped.
///
/// The grid evaluator builds this once and reuses it for every cell.
#[derive(Debug, Clone)]
pub(crate) struct SignalProfile {
    bins: Vec<(f64, f64)>,
    total_signal: f64,
    total_mass: f64,
}

impl SignalProfile {
    /// Fails when either total overflows to infinity.
    pub(crate) fn new(matrix: &ObservationMatrix) -> Result<Self> {
        let bins: Vec<(f64, f64)> = matrix
            .iter()
            .filter(|o| o.mass > 0.0)
            .map(|o| (o.depth, o.mass))
            .collect();
        let total_signal: f64 = bins.iter().map(|&(depth, mass)| depth * mass).sum();
        let total_mass: f64 = bins.iter().map(|&(_, mass)| mass).sum();

        if !total_signal.is_finite() || !total_mass.is_finite() {
            return Err(RareError::InvalidArgument(format!(
                "histogram totals overflow (signal {}, mass {})",
                total_signal, total_mass
            )));
        }
        Ok(Self {
            bins,
            total_signal,
            total_mass,
        })
    }

    /// Denominator used by `model`.
    pub(crate) fn total(&self, model: SurvivalModel) -> f64 {
        match model {
            SurvivalModel::Poisson => self.total_signal,
            SurvivalModel::HardCutoff => self.total_mass,
        }
    }

    /// Retained share of the model's total; arguments must already be validated.
    pub(crate) fn retained(
        &self,
        fraction: f64,
        threshold: f64,
        model: SurvivalModel,
    ) -> Result<f64> {
        let total = self.total(model);
        if total <= 0.0 {
            return Ok(0.0);
        }
        let mut kept = 0.0;
        for &(depth, mass) in &self.bins {
            let (lambda, weight) = model.thin(depth, mass, fraction);
            if weight > 0.0 {
                kept += model.survival(lambda, threshold)? * weight;
            }
        }
        Ok((kept / total).clamp(0.0, 1.0))
    }
}

/// Fraction of total signal retained at sample fraction `f` and threshold `t`,
/// using the Poisson survival model.
///
/// # Arguments
/// * `matrix` - Depth histogram
/// * `fraction` - Sample fraction in (0, 1]
/// * `threshold` - Minimum retained depth, exclusive
///
/// # Returns
/// A value in [0, 1]. Matrices with no signal give 0.
pub fn fract(matrix: &ObservationMatrix, fraction: f64, threshold: f64) -> Result<f64> {
    fract_with_model(matrix, fraction, threshold, SurvivalModel::default())
}

/// Same as [`fract`] with an explicit survival model.
pub fn fract_with_model(
    matrix: &ObservationMatrix,
    fraction: f64,
    threshold: f64,
    model: SurvivalModel,
) -> Result<f64> {
    validate_fraction(fraction)?;
    validate_threshold(threshold)?;
    SignalProfile::new(matrix)?.retained(fraction, threshold, model)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn single() -> ObservationMatrix {
        ObservationMatrix::from_pairs([(100.0, 1000.0)]).unwrap()
    }

    fn three_depths() -> ObservationMatrix {
        ObservationMatrix::from_pairs([(1.0, 1000.0), (10.0, 1000.0), (100.0, 1000.0)]).unwrap()
    }

    #[test]
    fn test_single_full() {
        let result = fract(&single(), 1.0, 1.0).unwrap();
        assert!((result - 1.0).abs() < EPS);
    }

    #[test]
    fn test_single_zero() {
        let result = fract(&single(), 1.0, 100_000.0).unwrap();
        assert!(result.abs() < EPS);
    }

    #[test]
    fn test_single_half() {
        let result = fract(&single(), 0.5, 50.0).unwrap();
        assert!(result > 0.3 && result < 0.7, "got {}", result);
        // P(Poisson(50) > 50)
        assert!((result - 0.462483).abs() < 1e-5);
    }

    #[test]
    fn test_two_rows_full_and_zero() {
        let m = ObservationMatrix::from_pairs([(100.0, 1000.0), (20_000.0, 10_000.0)]).unwrap();
        assert!((fract(&m, 1.0, 1.0).unwrap() - 1.0).abs() < EPS);
        assert!(fract(&m, 1.0, 100_000.0).unwrap().abs() < EPS);
    }

    #[test]
    fn test_two_rows_tenth() {
        let m = ObservationMatrix::from_pairs([(100.0, 1000.0), (1000.0, 1000.0)]).unwrap();
        let result = fract(&m, 1.0, 200.0).unwrap();
        assert!(result > 0.88 && result < 0.92, "got {}", result);
    }

    #[test]
    fn test_low_depth_rows_partially_survive() {
        // depth 1 at t=1 survives with P(X > 1) = 1 - 2/e
        let m = ObservationMatrix::from_pairs([(1.0, 1000.0)]).unwrap();
        let result = fract(&m, 1.0, 1.0).unwrap();
        assert!((result - (1.0 - 2.0 * (-1.0f64).exp())).abs() < 1e-9);
    }

    #[test]
    fn test_fractional_threshold_floors() {
        let m = three_depths();
        let a = fract(&m, 0.3, 3.0).unwrap();
        let b = fract(&m, 0.3, 3.9).unwrap();
        assert!((a - b).abs() < EPS);
    }

    #[test]
    fn test_empty_and_zero_signal() {
        let empty = ObservationMatrix::default();
        assert_eq!(fract(&empty, 0.5, 1.0).unwrap(), 0.0);

        let zero = ObservationMatrix::from_pairs([(0.0, 100.0), (5.0, 0.0)]).unwrap();
        assert_eq!(fract(&zero, 1.0, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_depth_rows_ignored() {
        let with_zero = ObservationMatrix::from_pairs([(0.0, 500.0), (100.0, 1000.0)]).unwrap();
        let a = fract(&with_zero, 0.5, 50.0).unwrap();
        let b = fract(&single(), 0.5, 50.0).unwrap();
        assert!((a - b).abs() < EPS);
    }

    #[test]
    fn test_duplicated_rows_match_single_row() {
        let doubled = ObservationMatrix::from_pairs([(100.0, 1000.0), (100.0, 1000.0)]).unwrap();
        for &(f, t) in &[(1.0, 1.0), (0.5, 50.0), (0.2, 25.0)] {
            let a = fract(&doubled, f, t).unwrap();
            let b = fract(&single(), f, t).unwrap();
            assert!((a - b).abs() < EPS);
        }
    }

    #[test]
    fn test_invalid_arguments() {
        let m = single();
        assert!(matches!(fract(&m, 0.0, 1.0), Err(RareError::InvalidArgument(_))));
        assert!(fract(&m, -0.5, 1.0).is_err());
        assert!(fract(&m, 1.5, 1.0).is_err());
        assert!(fract(&m, f64::NAN, 1.0).is_err());
        assert!(matches!(fract(&m, 0.5, -1.0), Err(RareError::InvalidArgument(_))));
        assert!(fract(&m, 0.5, f64::INFINITY).is_err());
        // invalid arguments are rejected even for empty input
        assert!(fract(&ObservationMatrix::default(), 2.0, 1.0).is_err());
    }

    #[test]
    fn test_monotone_in_fraction() {
        for m in [three_depths(), mixed_masses()] {
            for model in [SurvivalModel::Poisson, SurvivalModel::HardCutoff] {
                for &t in &[0.0, 1.0, 3.0, 10.0, 30.0, 200.0] {
                    let mut prev = 0.0;
                    for &f in &[0.01, 0.03, 0.1, 0.3, 0.5, 1.0] {
                        let v = fract_with_model(&m, f, t, model).unwrap();
                        assert!(v + EPS >= prev, "{:?} f={} t={}", model, f, t);
                        assert!((0.0..=1.0).contains(&v));
                        prev = v;
                    }
                }
            }
        }
    }

    #[test]
    fn test_monotone_in_threshold() {
        for m in [three_depths(), mixed_masses()] {
            for model in [SurvivalModel::Poisson, SurvivalModel::HardCutoff] {
                for &f in &[0.05, 0.5, 1.0] {
                    let mut prev = 1.0;
                    for &t in &[0.0, 0.5, 1.0, 2.0, 5.0, 20.0, 99.0, 200.0, 600.0] {
                        let v = fract_with_model(&m, f, t, model).unwrap();
                        assert!(v <= prev + EPS, "{:?} f={} t={}", model, f, t);
                        prev = v;
                    }
                }
            }
        }
    }

    fn mixed_masses() -> ObservationMatrix {
        ObservationMatrix::from_pairs([(1.0, 20.0), (10.0, 300.0), (100.0, 1000.0)]).unwrap()
    }

    #[test]
    fn test_hard_cutoff_thresholds_thinned_mass() {
        // mass 1000 at f = 1 clears t = 500 regardless of its depth
        let m = single();
        assert_eq!(fract_with_model(&m, 1.0, 500.0, SurvivalModel::HardCutoff).unwrap(), 1.0);
        // mass·f = 400 does not
        assert_eq!(fract_with_model(&m, 0.4, 500.0, SurvivalModel::HardCutoff).unwrap(), 0.0);
    }

    #[test]
    fn test_hard_cutoff_weights_by_mass() {
        let m = mixed_masses();
        // only the mass-1000 bin clears t = 500
        let v = fract_with_model(&m, 1.0, 500.0, SurvivalModel::HardCutoff).unwrap();
        assert!((v - 1000.0 / 1320.0).abs() < EPS);
        // at f = 0.5: 150 and 500 clear t = 100, 10 does not
        let v = fract_with_model(&m, 0.5, 100.0, SurvivalModel::HardCutoff).unwrap();
        assert!((v - 1300.0 / 1320.0).abs() < EPS);
    }

    #[test]
    fn test_hard_cutoff_full_fraction_extremes() {
        let m = mixed_masses();
        // every t below the smallest mass keeps everything
        for &t in &[0.0, 1.0, 10.0, 19.5] {
            assert_eq!(fract_with_model(&m, 1.0, t, SurvivalModel::HardCutoff).unwrap(), 1.0);
        }
        // the comparison is strict: t equal to the smallest mass drops that bin
        let v = fract_with_model(&m, 1.0, 20.0, SurvivalModel::HardCutoff).unwrap();
        assert!((v - 1300.0 / 1320.0).abs() < EPS);
        // t at or above the largest mass keeps nothing
        for &t in &[1000.0, 5000.0] {
            assert_eq!(fract_with_model(&m, 1.0, t, SurvivalModel::HardCutoff).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_poisson_ignores_mass_threshold() {
        // the default model thresholds thinned depth, so t far above the
        // depth keeps almost nothing even though mass·f > t
        let v = fract(&single(), 1.0, 500.0).unwrap();
        assert!(v < 1e-100, "got {}", v);
    }

    #[test]
    fn test_overflowing_total_rejected() {
        let m = ObservationMatrix::from_pairs([(1e200, 1e200), (1.0, 1.0)]).unwrap();
        assert!(matches!(fract(&m, 0.5, 1.0), Err(RareError::InvalidArgument(_))));
        assert!(matches!(
            fract_with_model(&m, 0.5, 1.0, SurvivalModel::HardCutoff),
            Err(RareError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_survival_zero_mean() {
        assert_eq!(SurvivalModel::Poisson.survival(0.0, 0.0).unwrap(), 0.0);
        assert_eq!(SurvivalModel::HardCutoff.survival(0.0, 0.0).unwrap(), 0.0);
    }
}
