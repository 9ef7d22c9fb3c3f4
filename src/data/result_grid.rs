//! Result grid of the fraction × threshold evaluation.

use crate::error::Result;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Retained fractions indexed by (sample fraction, threshold).
///
/// Row `i` belongs to `fractions[i]` and column `j` to `thresholds[j]`, in the
/// order the caller supplied them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultGrid {
    /// Sample fractions, one per row.
    pub fractions: Vec<f64>,
    /// Detection thresholds, one per column.
    pub thresholds: Vec<f64>,
    /// Retained fraction for each pair, in [0, 1].
    pub values: DMatrix<f64>,
}

impl ResultGrid {
    /// Number of rows and columns as (fractions, thresholds).
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    /// Value for the i-th fraction and j-th threshold.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    /// Values for one sample fraction across all thresholds.
    pub fn row(&self, i: usize) -> Vec<f64> {
        self.values.row(i).iter().copied().collect()
    }

    /// Values for one threshold across all sample fractions.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.values.column(j).iter().copied().collect()
    }

    /// Check if either axis is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Write as tab-delimited text with a `fraction` column and one column per threshold.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_path(path)?;

        let header = std::iter::once("fraction".to_string())
            .chain(self.thresholds.iter().map(|t| t.to_string()));
        writer.write_record(header)?;

        for (i, fraction) in self.fractions.iter().enumerate() {
            let row = self.values.row(i);
            let record = std::iter::once(fraction.to_string())
                .chain(row.iter().map(|v| format!("{:.6}", v)));
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Convert to JSON format for export.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for ResultGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>12}", "fraction")?;
        for t in &self.thresholds {
            write!(f, " {:>10}", format!("t>{}", t))?;
        }
        writeln!(f)?;
        for (i, fraction) in self.fractions.iter().enumerate() {
            write!(f, "{:>12.6}", fraction)?;
            for v in self.values.row(i).iter() {
                write!(f, " {:>10.4}", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
