//! Rarefaction runs: configuration and execution.

mod runner;

pub use runner::{Rarefaction, RarefactionConfig, RarefactionReport};
