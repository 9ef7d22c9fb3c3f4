//! Whitespace-delimited numeric text, as written by most array dumpers.

use crate::error::{RareError, Result};
use nalgebra::DMatrix;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read a rectangular table of numbers.
///
/// Blank lines and lines starting with `#` are skipped. Every data line must
/// have the same number of fields as the first one.
pub fn read_rows<R: BufRead>(reader: R) -> Result<Vec<Vec<f64>>> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut width: Option<usize> = None;

    for (line_idx, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let row = trimmed
            .split_whitespace()
            .enumerate()
            .map(|(col_idx, token)| {
                token.parse::<f64>().map_err(|_| RareError::Parse {
                    value: token.to_string(),
                    row: line_idx,
                    col: col_idx,
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        match width {
            None => width = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(RareError::ShapeMismatch {
                    expected,
                    actual: row.len(),
                    row: line_idx,
                });
            }
            Some(_) => {}
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Read a rectangular numeric table from a file.
pub fn read_rows_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>> {
    let file = File::open(path)?;
    read_rows(BufReader::new(file))
}

/// Pack already-validated rows into a dense matrix.
pub(crate) fn rows_to_matrix(rows: &[Vec<f64>]) -> DMatrix<f64> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    DMatrix::from_fn(nrows, ncols, |r, c| rows[r][c])
}

/// Write a dense matrix as space-delimited text, one matrix row per line.
pub fn write_matrix<P: AsRef<Path>>(path: P, matrix: &DMatrix<f64>) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .from_path(path)?;

    for row in matrix.row_iter() {
        writer.write_record(row.iter().map(|v| format!("{:e}", v)))?;
    }
    writer.flush()?;
    Ok(())
}
