//! 2D count matrices with coordinate labels along both axes.

use crate::data::text::{read_rows, rows_to_matrix, write_matrix};
use crate::decimate::{decimate, DecimationFactors};
use crate::error::{RareError, Result};
use log::info;
use nalgebra::DMatrix;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A count matrix whose first text row and first text column were axis
/// coordinates rather than data.
///
/// `x_axis` labels the data columns and `y_axis` labels the data rows. The
/// corner cell of the text file labels nothing and is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix {
    x_axis: Vec<f64>,
    y_axis: Vec<f64>,
    data: DMatrix<f64>,
}

impl LabeledMatrix {
    /// Create from parts, checking that the axes match the data shape.
    pub fn new(x_axis: Vec<f64>, y_axis: Vec<f64>, data: DMatrix<f64>) -> Result<Self> {
        if x_axis.len() != data.ncols() {
            return Err(RareError::InvalidArgument(format!(
                "x axis has {} labels for {} data columns",
                x_axis.len(),
                data.ncols()
            )));
        }
        if y_axis.len() != data.nrows() {
            return Err(RareError::InvalidArgument(format!(
                "y axis has {} labels for {} data rows",
                y_axis.len(),
                data.nrows()
            )));
        }
        Ok(Self {
            x_axis,
            y_axis,
            data,
        })
    }

    /// Parse a labeled matrix from whitespace-delimited text.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let rows = read_rows(reader)?;
        if rows.len() < 2 || rows[0].len() < 2 {
            return Err(RareError::EmptyInput(
                "labeled matrix needs at least one label row, one label column and one data cell"
                    .to_string(),
            ));
        }

        let x_axis = rows[0][1..].to_vec();
        let y_axis = rows[1..].iter().map(|r| r[0]).collect();
        let interior: Vec<Vec<f64>> = rows[1..].iter().map(|r| r[1..].to_vec()).collect();

        Self::new(x_axis, y_axis, rows_to_matrix(&interior))
    }

    /// Load a labeled matrix from a file.
    pub fn from_text<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let matrix = Self::from_reader(BufReader::new(file))?;
        info!(
            "Loaded {} x {} matrix from {}",
            matrix.data.nrows(),
            matrix.data.ncols(),
            path.display()
        );
        Ok(matrix)
    }

    /// Column coordinates.
    pub fn x_axis(&self) -> &[f64] {
        &self.x_axis
    }

    /// Row coordinates.
    pub fn y_axis(&self) -> &[f64] {
        &self.y_axis
    }

    /// Interior count data.
    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Data shape as (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    /// Block-sum the data and block-average the coordinates.
    ///
    /// Coordinates of dropped trailing rows/columns are dropped with them.
    pub fn decimate(&self, factors: DecimationFactors) -> Result<Self> {
        let (d1, d2) = factors.pair()?;
        let data = decimate(&self.data, factors)?;
        Ok(Self {
            x_axis: average_blocks(&self.x_axis, d2),
            y_axis: average_blocks(&self.y_axis, d1),
            data,
        })
    }

    /// Write the interior data as space-delimited text.
    pub fn write_data<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_matrix(path, &self.data)
    }
}

fn average_blocks(values: &[f64], size: usize) -> Vec<f64> {
    values
        .chunks_exact(size)
        .map(|block| block.iter().sum::<f64>() / size as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TEXT: &str = "\
0 10 20 30
1 1 2 3
2 4 5 6
";

    #[test]
    fn test_from_reader_splits_labels() {
        let m = LabeledMatrix::from_reader(Cursor::new(TEXT)).unwrap();
        assert_eq!(m.x_axis(), &[10.0, 20.0, 30.0]);
        assert_eq!(m.y_axis(), &[1.0, 2.0]);
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.data()[(1, 2)], 6.0);
    }

    #[test]
    fn test_from_reader_too_small() {
        let err = LabeledMatrix::from_reader(Cursor::new("0 1 2\n")).unwrap_err();
        assert!(matches!(err, RareError::EmptyInput(_)));
    }

    #[test]
    fn test_from_reader_ragged() {
        let err = LabeledMatrix::from_reader(Cursor::new("0 1 2\n1 2\n")).unwrap_err();
        assert!(matches!(err, RareError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_decimate_keeps_axes_aligned() {
        let m = LabeledMatrix::from_reader(Cursor::new(TEXT)).unwrap();
        let reduced = m.decimate(DecimationFactors::PerAxis(2, 2)).unwrap();
        assert_eq!(reduced.shape(), (1, 1));
        assert_eq!(reduced.x_axis(), &[15.0]);
        assert_eq!(reduced.y_axis(), &[1.5]);
        assert_eq!(reduced.data()[(0, 0)], 1.0 + 2.0 + 4.0 + 5.0);
    }
}
