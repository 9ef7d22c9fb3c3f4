//! Data structures and text adapters for count matrices and histograms.

mod labeled_matrix;
mod observation;
mod result_grid;
pub mod text;

pub use labeled_matrix::LabeledMatrix;
pub use observation::{Observation, ObservationMatrix};
pub use result_grid::ResultGrid;
pub use text::{read_rows, read_rows_from_path, write_matrix};
