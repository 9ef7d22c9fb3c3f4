//! Block-sum decimation of dense matrices.

use crate::error::{RareError, Result};
use log::debug;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// How many source rows/columns are summed into one output bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecimationFactors {
    /// Same factor on both axes.
    Uniform(usize),
    /// Separate factors for rows and columns.
    PerAxis(usize, usize),
}

impl DecimationFactors {
    /// Normalize to a (rows, columns) pair, rejecting zero factors.
    pub fn pair(&self) -> Result<(usize, usize)> {
        let (d1, d2) = match *self {
            Self::Uniform(d) => (d, d),
            Self::PerAxis(d1, d2) => (d1, d2),
        };
        if d1 == 0 || d2 == 0 {
            return Err(RareError::InvalidArgument(format!(
                "decimation factors must be at least 1, got ({}, {})",
                d1, d2
            )));
        }
        Ok((d1, d2))
    }
}

impl From<usize> for DecimationFactors {
    fn from(d: usize) -> Self {
        Self::Uniform(d)
    }
}

impl From<(usize, usize)> for DecimationFactors {
    fn from((d1, d2): (usize, usize)) -> Self {
        Self::PerAxis(d1, d2)
    }
}

/// Factor that brings an axis of `len` bins down to roughly `target_bins`.
///
/// Never returns less than 1.
pub fn auto_factor(len: usize, target_bins: usize) -> usize {
    if target_bins == 0 {
        return 1;
    }
    (len / target_bins).max(1)
}

/// Sum each `d1 × d2` block of `matrix` into one cell.
///
/// The output has `floor(R / d1)` rows and `floor(C / d2)` columns; trailing
/// rows and columns that do not fill a whole block are dropped.
pub fn decimate(matrix: &DMatrix<f64>, factors: DecimationFactors) -> Result<DMatrix<f64>> {
    let (d1, d2) = factors.pair()?;
    let out_rows = matrix.nrows() / d1;
    let out_cols = matrix.ncols() / d2;

    debug!(
        "Decimating {} x {} by ({}, {}) -> {} x {}",
        matrix.nrows(),
        matrix.ncols(),
        d1,
        d2,
        out_rows,
        out_cols
    );

    Ok(DMatrix::from_fn(out_rows, out_cols, |i, j| {
        matrix.view((i * d1, j * d2), (d1, d2)).sum()
    }))
}
