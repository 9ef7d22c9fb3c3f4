//! Analytic rarefaction: retained-signal estimates under binomial thinning.

pub mod fraction;
pub mod grid;
pub mod schedule;

pub use fraction::{fract, fract_with_model, validate_fraction, validate_threshold, SurvivalModel};
pub use grid::{evaluate, evaluate_with_model};
pub use schedule::{efforts, FractionSchedule};
