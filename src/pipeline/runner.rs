//! Rarefaction runner: configuration, grid evaluation and curve assembly.

use crate::curve::{CurveSet, RarefactionTable, ShadeMode};
use crate::data::{ObservationMatrix, ResultGrid};
use crate::error::{RareError, Result};
use crate::estimate::{evaluate_with_model, FractionSchedule, SurvivalModel};
use log::info;
use serde::{Deserialize, Serialize};

/// Rarefaction configuration for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarefactionConfig {
    /// Name of the run, used as the output label.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Detection thresholds; `None` means `[1]`.
    #[serde(default)]
    pub thresholds: Option<Vec<f64>>,
    /// Explicit sample fractions; `None` derives them from `schedule`.
    #[serde(default)]
    pub sample_fractions: Option<Vec<f64>>,
    /// Spacing of the derived sample fractions.
    #[serde(default)]
    pub schedule: FractionSchedule,
    /// Survival model for thinned bins.
    #[serde(default)]
    pub model: SurvivalModel,
    /// Renderer shading.
    #[serde(default)]
    pub shade: ShadeMode,
}

impl Default for RarefactionConfig {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            description: None,
            thresholds: None,
            sample_fractions: None,
            schedule: FractionSchedule::default(),
            model: SurvivalModel::default(),
            shade: ShadeMode::default(),
        }
    }
}

impl RarefactionConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(RareError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(RareError::from)
    }

    /// A starter configuration with every option spelled out.
    pub fn example() -> Self {
        Self {
            name: "example".to_string(),
            description: Some("Rarefaction curves at thresholds 1, 10 and 100".to_string()),
            thresholds: Some(vec![1.0, 10.0, 100.0]),
            sample_fractions: None,
            schedule: FractionSchedule::Fine,
            model: SurvivalModel::Poisson,
            shade: ShadeMode::Band,
        }
    }
}

/// Everything produced by one rarefaction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RarefactionReport {
    pub name: String,
    pub model: SurvivalModel,
    /// Total signal (Σ depth · mass) of the input histogram.
    pub total_signal: f64,
    pub grid: ResultGrid,
    pub curves: CurveSet,
    pub table: RarefactionTable,
}

impl RarefactionReport {
    /// Convert to JSON format for export.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for RarefactionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Rarefaction '{}'", self.name)?;
        writeln!(f, "  Model:          {}", self.model.name())?;
        writeln!(f, "  Total signal:   {:.0}", self.total_signal)?;
        writeln!(f, "  Fractions:      {}", self.grid.fractions.len())?;
        writeln!(f, "  Thresholds:     {:?}", self.grid.thresholds)?;
        let (n_rows, n_cols) = self.grid.shape();
        if n_rows > 0 {
            let last = self.grid.fractions[n_rows - 1];
            if last == 1.0 {
                writeln!(f, "  At full depth:")?;
            } else {
                writeln!(f, "  At f = {}:", last)?;
            }
            for j in 0..n_cols {
                writeln!(
                    f,
                    "    t > {:<8} {:.2}%",
                    self.grid.thresholds[j],
                    self.grid.get(n_rows - 1, j) * 100.0
                )?;
            }
        }
        Ok(())
    }
}

/// Builder for configuring and running rarefaction.
#[derive(Debug, Clone, Default)]
pub struct Rarefaction {
    config: RarefactionConfig,
}

impl Rarefaction {
    /// Create a runner with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a config.
    pub fn from_config(config: &RarefactionConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Set the run name.
    pub fn name(mut self, name: &str) -> Self {
        self.config.name = name.to_string();
        self
    }

    /// Set the detection thresholds.
    pub fn thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.config.thresholds = Some(thresholds);
        self
    }

    /// Use explicit sample fractions instead of a schedule.
    pub fn sample_fractions(mut self, fractions: Vec<f64>) -> Self {
        self.config.sample_fractions = Some(fractions);
        self
    }

    /// Set the spacing of derived sample fractions.
    pub fn schedule(mut self, schedule: FractionSchedule) -> Self {
        self.config.schedule = schedule;
        self
    }

    /// Set the survival model.
    pub fn model(mut self, model: SurvivalModel) -> Self {
        self.config.model = model;
        self
    }

    /// Set the renderer shading.
    pub fn shade(mut self, shade: ShadeMode) -> Self {
        self.config.shade = shade;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &RarefactionConfig {
        &self.config
    }

    /// Evaluate the grid and assemble curves for one histogram.
    pub fn run(&self, matrix: &ObservationMatrix) -> Result<RarefactionReport> {
        let config = &self.config;
        let total_signal = matrix.total_signal();

        let thresholds = config.shade.thresholds(config.thresholds.as_deref());
        let fractions = match &config.sample_fractions {
            Some(list) => list.clone(),
            None => config.schedule.fractions(total_signal),
        };

        info!(
            "Running '{}': {} bins, {} fractions x {} thresholds",
            config.name,
            matrix.len(),
            fractions.len(),
            thresholds.len()
        );

        let grid = evaluate_with_model(matrix, &fractions, &thresholds, config.model)?;
        let curves = CurveSet::by_threshold(&grid, total_signal, config.shade);
        let table = RarefactionTable::from_grid(&grid, total_signal);

        Ok(RarefactionReport {
            name: config.name.clone(),
            model: config.model,
            total_signal,
            grid,
            curves,
            table,
        })
    }
}
