//! Render-ready curve series built from a result grid.

use crate::data::ResultGrid;
use crate::error::{RareError, Result};
use crate::estimate::efforts;
use serde::{Deserialize, Serialize};

/// Renderer shading options. These select which series are emitted; they
/// never change the estimated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadeMode {
    /// A single curve for the first threshold.
    #[default]
    None,
    /// All curves plus one min/max envelope across thresholds.
    Band,
    /// All curves plus an envelope between each adjacent pair.
    Ladder,
    /// Like `Ladder`, with the thresholds fixed to 1 through 10.
    Depth,
}

impl ShadeMode {
    /// Thresholds to evaluate for this mode.
    ///
    /// `Depth` always uses 1..=10; other modes use `requested`, or `[1]`
    /// when nothing was requested.
    pub fn thresholds(&self, requested: Option<&[f64]>) -> Vec<f64> {
        match (self, requested) {
            (Self::Depth, _) => (1..=10).map(f64::from).collect(),
            (_, Some(list)) if !list.is_empty() => list.to_vec(),
            _ => vec![1.0],
        }
    }
}

impl TryFrom<u8> for ShadeMode {
    type Error = RareError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Band),
            2 => Ok(Self::Ladder),
            3 => Ok(Self::Depth),
            other => Err(RareError::InvalidArgument(format!(
                "shade mode must be 0-3, got {}",
                other
            ))),
        }
    }
}

/// One line on a plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// A shaded region between two y series sharing an x axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub label: String,
    pub x: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Curves and shaded regions for one plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSet {
    pub x_label: String,
    pub y_label: String,
    pub curves: Vec<Curve>,
    pub envelopes: Vec<Envelope>,
}

impl CurveSet {
    /// One curve per threshold: retained fraction against effort.
    pub fn by_threshold(grid: &ResultGrid, total_signal: f64, shade: ShadeMode) -> Self {
        let x = efforts(&grid.fractions, total_signal);

        let mut curves: Vec<Curve> = grid
            .thresholds
            .iter()
            .enumerate()
            .map(|(j, t)| Curve {
                label: format!("t > {}", t),
                x: x.clone(),
                y: grid.column(j),
            })
            .collect();

        let envelopes = match shade {
            ShadeMode::None => {
                curves.truncate(1);
                Vec::new()
            }
            ShadeMode::Band => band(&curves, &x).into_iter().collect(),
            ShadeMode::Ladder | ShadeMode::Depth => curves
                .windows(2)
                .map(|pair| between(&pair[0], &pair[1]))
                .collect(),
        };

        Self {
            x_label: "effort".to_string(),
            y_label: "fraction of signal retained".to_string(),
            curves,
            envelopes,
        }
    }

    /// One curve per sample fraction: retained fraction against threshold.
    pub fn by_fraction(grid: &ResultGrid) -> Self {
        let curves = grid
            .fractions
            .iter()
            .enumerate()
            .map(|(i, f)| Curve {
                label: format!("f = {}", f),
                x: grid.thresholds.clone(),
                y: grid.row(i),
            })
            .collect();

        Self {
            x_label: "threshold".to_string(),
            y_label: "fraction of signal retained".to_string(),
            curves,
            envelopes: Vec::new(),
        }
    }

    /// Convert to JSON format for export.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn band(curves: &[Curve], x: &[f64]) -> Option<Envelope> {
    let (first, last) = (curves.first()?, curves.last()?);
    let lower = (0..x.len())
        .map(|i| curves.iter().map(|c| c.y[i]).fold(f64::INFINITY, f64::min))
        .collect();
    let upper = (0..x.len())
        .map(|i| curves.iter().map(|c| c.y[i]).fold(f64::NEG_INFINITY, f64::max))
        .collect();
    Some(Envelope {
        label: format!("{} .. {}", first.label, last.label),
        x: x.to_vec(),
        lower,
        upper,
    })
}

fn between(a: &Curve, b: &Curve) -> Envelope {
    let (lower, upper) = a
        .y
        .iter()
        .zip(&b.y)
        .map(|(&ya, &yb)| (ya.min(yb), ya.max(yb)))
        .unzip();
    Envelope {
        label: format!("{} .. {}", a.label, b.label),
        x: a.x.clone(),
        lower,
        upper,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ObservationMatrix;
    use crate::estimate::evaluate;

    fn create_test_grid(thresholds: &[f64]) -> ResultGrid {
        let m = ObservationMatrix::from_pairs([(1.0, 1000.0), (10.0, 1000.0), (100.0, 1000.0)])
            .unwrap();
        evaluate(&m, &[0.01, 0.1, 0.5, 1.0], thresholds).unwrap()
    }

    #[test]
    fn test_shade_mode_thresholds() {
        assert_eq!(ShadeMode::None.thresholds(None), vec![1.0]);
        assert_eq!(ShadeMode::Band.thresholds(Some(&[1.0, 10.0])), vec![1.0, 10.0]);
        assert_eq!(ShadeMode::Ladder.thresholds(Some(&[])), vec![1.0]);
        let depth = ShadeMode::Depth.thresholds(Some(&[5.0]));
        assert_eq!(depth.len(), 10);
        assert_eq!(depth[9], 10.0);
    }

    #[test]
    fn test_shade_mode_from_int() {
        assert_eq!(ShadeMode::try_from(2).unwrap(), ShadeMode::Ladder);
        assert!(ShadeMode::try_from(4).is_err());
    }

    #[test]
    fn test_none_keeps_first_curve() {
        let grid = create_test_grid(&[1.0, 10.0, 100.0]);
        let set = CurveSet::by_threshold(&grid, 111_000.0, ShadeMode::None);
        assert_eq!(set.curves.len(), 1);
        assert!(set.envelopes.is_empty());
        assert_eq!(set.curves[0].label, "t > 1");
        assert!((set.curves[0].x[3] - 111_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_band_envelope() {
        let grid = create_test_grid(&[1.0, 10.0, 100.0]);
        let set = CurveSet::by_threshold(&grid, 111_000.0, ShadeMode::Band);
        assert_eq!(set.curves.len(), 3);
        assert_eq!(set.envelopes.len(), 1);

        let env = &set.envelopes[0];
        for i in 0..env.x.len() {
            assert!(env.lower[i] <= env.upper[i]);
            // higher thresholds retain less
            assert_eq!(env.upper[i], grid.get(i, 0));
            assert_eq!(env.lower[i], grid.get(i, 2));
        }
    }

    #[test]
    fn test_ladder_envelopes() {
        let grid = create_test_grid(&ShadeMode::Depth.thresholds(None));
        let set = CurveSet::by_threshold(&grid, 111_000.0, ShadeMode::Depth);
        assert_eq!(set.curves.len(), 10);
        assert_eq!(set.envelopes.len(), 9);
    }

    #[test]
    fn test_by_fraction() {
        let grid = create_test_grid(&[1.0, 10.0]);
        let set = CurveSet::by_fraction(&grid);
        assert_eq!(set.curves.len(), 4);
        assert_eq!(set.curves[2].x, vec![1.0, 10.0]);
        assert_eq!(set.curves[2].y, grid.row(2));
        assert!(set.to_json().unwrap().contains("\"threshold\""));
    }
}
