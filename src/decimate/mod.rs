//! Resolution reduction for 2D count matrices.

mod block;

pub use block::{auto_factor, decimate, DecimationFactors};

/// Bins per axis targeted when a factor is chosen automatically.
pub const AUTO_TARGET_BINS: usize = 100;
