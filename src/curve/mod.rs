//! Renderer-facing output: curve series, shaded envelopes, and table dumps.

mod series;
mod table;

pub use series::{Curve, CurveSet, Envelope, ShadeMode};
pub use table::RarefactionTable;
