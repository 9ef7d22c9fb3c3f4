//! Evaluation of the estimator over a sample-fraction × threshold grid.

use crate::data::{ObservationMatrix, ResultGrid};
use crate::error::Result;
use crate::estimate::fraction::{
    validate_fraction, validate_threshold, SignalProfile, SurvivalModel,
};
use log::{debug, warn};
use nalgebra::DMatrix;
use rayon::prelude::*;

/// Evaluate [`fract`](crate::estimate::fract) for every (fraction, threshold) pair.
///
/// Row `i` of the result belongs to `fractions[i]`, column `j` to
/// `thresholds[j]`. Nothing is sorted. Empty inputs give an empty grid.
pub fn evaluate(
    matrix: &ObservationMatrix,
    fractions: &[f64],
    thresholds: &[f64],
) -> Result<ResultGrid> {
    evaluate_with_model(matrix, fractions, thresholds, SurvivalModel::default())
}

/// Same as [`evaluate`] with an explicit survival model.
pub fn evaluate_with_model(
    matrix: &ObservationMatrix,
    fractions: &[f64],
    thresholds: &[f64],
    model: SurvivalModel,
) -> Result<ResultGrid> {
    for &f in fractions {
        validate_fraction(f)?;
    }
    for &t in thresholds {
        validate_threshold(t)?;
    }

    let profile = SignalProfile::new(matrix)?;
    if profile.total(model) <= 0.0 && !matrix.is_empty() {
        warn!("Histogram carries no signal; every retained fraction is 0");
    }

    debug!(
        "Evaluating {} fractions x {} thresholds over {} bins ({} model)",
        fractions.len(),
        thresholds.len(),
        matrix.len(),
        model.name()
    );

    // Each worker owns one output row.
    let rows: Vec<Vec<f64>> = fractions
        .par_iter()
        .map(|&f| {
            thresholds
                .iter()
                .map(|&t| profile.retained(f, t, model))
                .collect::<Result<Vec<f64>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let values = DMatrix::from_fn(fractions.len(), thresholds.len(), |i, j| rows[i][j]);

    Ok(ResultGrid {
        fractions: fractions.to_vec(),
        thresholds: thresholds.to_vec(),
        values,
    })
}
