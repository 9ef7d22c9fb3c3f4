//! Rarefaction table dump: effort in the first column, one column per threshold.

use crate::data::ResultGrid;
use crate::error::Result;
use crate::estimate::efforts;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Tabular form of a by-threshold rarefaction evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarefactionTable {
    pub thresholds: Vec<f64>,
    /// `[effort, value for each threshold]` per sample fraction.
    pub rows: Vec<Vec<f64>>,
}

impl RarefactionTable {
    /// Build from a grid and the total signal of its histogram.
    pub fn from_grid(grid: &ResultGrid, total_signal: f64) -> Self {
        let rows = efforts(&grid.fractions, total_signal)
            .into_iter()
            .enumerate()
            .map(|(i, effort)| std::iter::once(effort).chain(grid.row(i)).collect::<Vec<f64>>())
            .collect();
        Self {
            thresholds: grid.thresholds.clone(),
            rows,
        }
    }

    /// Column names: `subsetsize` followed by the thresholds.
    pub fn header(&self) -> Vec<String> {
        std::iter::once("subsetsize".to_string())
            .chain(self.thresholds.iter().map(|t| t.to_string()))
            .collect()
    }

    /// Write tab-delimited text to any writer.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);

        writer.write_record(self.header())?;
        for row in &self.rows {
            let record = row.iter().enumerate().map(|(k, v)| {
                if k == 0 {
                    format!("{:.6e}", v)
                } else {
                    format!("{:.6}", v)
                }
            });
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write tab-delimited text to a file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_to(File::create(path)?)
    }
}
