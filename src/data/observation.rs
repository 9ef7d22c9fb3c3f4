//! Depth histograms: the input of the resampled-fraction estimator.

use crate::data::text::read_rows;
use crate::error::{RareError, Result};
use log::info;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One histogram bin: `mass` units were each observed `depth` times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Per-unit coverage of this bin.
    pub depth: f64,
    /// Number of units observed at this depth.
    pub mass: f64,
}

impl Observation {
    /// Create an observation, rejecting negative or non-finite values.
    pub fn new(depth: f64, mass: f64) -> Result<Self> {
        if !depth.is_finite() || depth < 0.0 {
            return Err(RareError::InvalidArgument(format!(
                "depth must be finite and non-negative, got {}",
                depth
            )));
        }
        if !mass.is_finite() || mass < 0.0 {
            return Err(RareError::InvalidArgument(format!(
                "mass must be finite and non-negative, got {}",
                mass
            )));
        }
        Ok(Self { depth, mass })
    }

    /// Total signal carried by the bin (depth × mass).
    #[inline]
    pub fn signal(&self) -> f64 {
        self.depth * self.mass
    }
}

/// An ordered sequence of histogram bins.
///
/// Empty matrices are allowed; every estimate over them is 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationMatrix {
    rows: Vec<Observation>,
}

impl ObservationMatrix {
    /// Create from already-validated observations.
    pub fn new(rows: Vec<Observation>) -> Self {
        Self { rows }
    }

    /// Create from `(depth, mass)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let rows = pairs
            .into_iter()
            .map(|(depth, mass)| Observation::new(depth, mass))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows })
    }

    /// Create from a dense matrix with exactly two columns (depth, mass).
    pub fn from_dense(data: &DMatrix<f64>) -> Result<Self> {
        if data.ncols() != 2 {
            return Err(RareError::ShapeMismatch {
                expected: 2,
                actual: data.ncols(),
                row: 0,
            });
        }
        Self::from_pairs(data.row_iter().map(|r| (r[0], r[1])))
    }

    /// Load a two-column histogram from whitespace-delimited text.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let rows = read_rows(reader)?;
        if let Some(first) = rows.first() {
            if first.len() != 2 {
                return Err(RareError::ShapeMismatch {
                    expected: 2,
                    actual: first.len(),
                    row: 0,
                });
            }
        }
        Self::from_pairs(rows.iter().map(|r| (r[0], r[1])))
    }

    /// Load a two-column histogram from a file.
    pub fn from_text<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let matrix = Self::from_reader(BufReader::new(file))?;
        if matrix.is_empty() {
            return Err(RareError::EmptyInput(format!(
                "no histogram rows in {}",
                path.display()
            )));
        }
        info!(
            "Loaded {} histogram bins from {} (total signal {:.0})",
            matrix.len(),
            path.display(),
            matrix.total_signal()
        );
        Ok(matrix)
    }

    /// Number of bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over bins in input order.
    pub fn iter(&self) -> impl Iterator<Item = &Observation> + '_ {
        self.rows.iter()
    }

    /// Bins as a slice.
    #[inline]
    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    /// Sum of depth × mass over all bins.
    pub fn total_signal(&self) -> f64 {
        self.rows.iter().map(Observation::signal).sum()
    }

    /// Largest depth, or `None` for an empty matrix.
    pub fn max_depth(&self) -> Option<f64> {
        self.rows.iter().map(|o| o.depth).reduce(f64::max)
    }

    /// Smallest depth, or `None` for an empty matrix.
    pub fn min_depth(&self) -> Option<f64> {
        self.rows.iter().map(|o| o.depth).reduce(f64::min)
    }
}
