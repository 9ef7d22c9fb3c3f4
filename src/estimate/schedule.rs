//! Default sample-fraction sequences for rarefaction curves.

use log::debug;
use serde::{Deserialize, Serialize};

/// Smallest effort (retained signal) on the log-spaced schedule.
pub const MIN_LOG10_EFFORT: f64 = 2.0;
/// Largest effort on the log-spaced schedule.
pub const MAX_LOG10_EFFORT: f64 = 11.0;

/// Spacing of the default sample-fraction sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractionSchedule {
    /// Ten points per decade of effort.
    #[default]
    Fine,
    /// Two points per decade of effort.
    Coarse,
}

impl FractionSchedule {
    /// Step between consecutive efforts, in log10 units.
    pub fn log10_step(&self) -> f64 {
        match self {
            Self::Fine => 0.1,
            Self::Coarse => 0.5,
        }
    }

    /// Sample fractions for a histogram carrying `total_signal`.
    ///
    /// Efforts run from 10^2 to 10^11; each becomes the fraction
    /// `effort / total_signal`. Fractions outside (0, 1) are dropped and the
    /// sequence always ends with exactly 1.0. A total that is not a finite
    /// positive number yields only 1.0.
    pub fn fractions(&self, total_signal: f64) -> Vec<f64> {
        if !total_signal.is_finite() || total_signal <= 0.0 {
            return vec![1.0];
        }
        let step = self.log10_step();
        let n_steps = ((MAX_LOG10_EFFORT - MIN_LOG10_EFFORT) / step).round() as usize;

        let mut fractions: Vec<f64> = (0..n_steps)
            .map(|k| 10f64.powf(MIN_LOG10_EFFORT + k as f64 * step) / total_signal)
            .filter(|&f| f > 0.0 && f < 1.0)
            .collect();
        fractions.push(1.0);

        debug!(
            "{:?} schedule: {} sample fractions for total signal {:.0}",
            self,
            fractions.len(),
            total_signal
        );
        fractions
    }
}

/// Convert sample fractions to sequencing effort (`total_signal · f`).
pub fn efforts(fractions: &[f64], total_signal: f64) -> Vec<f64> {
    fractions.iter().map(|f| f * total_signal).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fine_schedule() {
        let fractions = FractionSchedule::Fine.fractions(1e4);
        // efforts 10^2.0 .. 10^3.9 stay below the total, then 1.0 is appended
        assert_eq!(fractions.len(), 21);
        assert!((fractions[0] - 0.01).abs() < 1e-12);
        assert_eq!(*fractions.last().unwrap(), 1.0);
        assert!(fractions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_coarse_schedule() {
        let fractions = FractionSchedule::Coarse.fractions(1e4);
        assert_eq!(fractions.len(), 5);
        assert!(fractions.iter().all(|&f| f > 0.0 && f <= 1.0));
    }

    #[test]
    fn test_small_total_yields_only_full_fraction() {
        assert_eq!(FractionSchedule::Fine.fractions(50.0), vec![1.0]);
        assert_eq!(FractionSchedule::Fine.fractions(0.0), vec![1.0]);
    }

    #[test]
    fn test_non_finite_total_yields_only_full_fraction() {
        assert_eq!(FractionSchedule::Fine.fractions(f64::INFINITY), vec![1.0]);
        assert_eq!(FractionSchedule::Coarse.fractions(f64::NAN), vec![1.0]);
    }

    #[test]
    fn test_fractions_never_zero() {
        // the smallest effort over the largest finite total is still positive
        let fractions = FractionSchedule::Fine.fractions(f64::MAX);
        assert!(fractions.iter().all(|&f| f > 0.0 && f <= 1.0));
        assert_eq!(*fractions.last().unwrap(), 1.0);
    }

    #[test]
    fn test_huge_total_spans_all_efforts() {
        let fractions = FractionSchedule::Coarse.fractions(1e12);
        // 18 log steps from 10^2 to 10^10.5, plus 1.0
        assert_eq!(fractions.len(), 19);
    }

    #[test]
    fn test_efforts() {
        assert_eq!(efforts(&[0.5, 1.0], 200.0), vec![100.0, 200.0]);
    }
}
