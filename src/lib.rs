//! Rarefaction statistics for 2D count matrices and depth histograms.
//!
//! This library estimates how much of a sample's signal remains detectable
//! when sequencing effort is reduced, without resampling any reads, and
//! reduces the resolution of binned count matrices for display.
//!
//! # Overview
//!
//! - **data**: Depth histograms, labeled count matrices, result grids, text I/O
//! - **decimate**: Block-sum resolution reduction
//! - **estimate**: Resampled-fraction estimator and grid evaluation
//! - **curve**: Render-ready curve series, shaded envelopes, table dumps
//! - **pipeline**: Configured rarefaction runs
//!
//! # Example
//!
//! ```no_run
//! use rarefy::prelude::*;
//!
//! let histogram = ObservationMatrix::from_text("sample.hist").unwrap();
//!
//! let report = Rarefaction::new()
//!     .name("sample")
//!     .thresholds(vec![1.0, 10.0, 100.0])
//!     .shade(ShadeMode::Band)
//!     .run(&histogram)
//!     .unwrap();
//!
//! report.table.to_tsv("sample.rare.csv").unwrap();
//! ```

pub mod curve;
pub mod data;
pub mod decimate;
pub mod error;
pub mod estimate;
pub mod pipeline;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::curve::{Curve, CurveSet, Envelope, RarefactionTable, ShadeMode};
    pub use crate::data::{LabeledMatrix, Observation, ObservationMatrix, ResultGrid};
    pub use crate::decimate::{auto_factor, decimate, DecimationFactors};
    pub use crate::error::{RareError, Result};
    pub use crate::estimate::{
        efforts, evaluate, evaluate_with_model, fract, fract_with_model, FractionSchedule,
        SurvivalModel,
    };
    pub use crate::pipeline::{Rarefaction, RarefactionConfig, RarefactionReport};
}
