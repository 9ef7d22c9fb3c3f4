//! rare - rarefaction curves and matrix decimation CLI
//!
//! Command-line interface for analytic rarefaction of depth histograms.

use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use rarefy::curve::ShadeMode;
use rarefy::data::{LabeledMatrix, ObservationMatrix};
use rarefy::decimate::{auto_factor, DecimationFactors, AUTO_TARGET_BINS};
use rarefy::error::{RareError, Result};
use rarefy::estimate::{FractionSchedule, SurvivalModel};
use rarefy::pipeline::{Rarefaction, RarefactionConfig};
use std::path::{Path, PathBuf};

/// CLI-friendly schedule enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliSchedule {
    /// Ten sample fractions per decade of effort
    Fine,
    /// Two sample fractions per decade of effort
    Coarse,
}

impl From<CliSchedule> for FractionSchedule {
    fn from(schedule: CliSchedule) -> Self {
        match schedule {
            CliSchedule::Fine => FractionSchedule::Fine,
            CliSchedule::Coarse => FractionSchedule::Coarse,
        }
    }
}

/// CLI-friendly survival model enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliModel {
    /// Poisson tail of the thinned depth
    Poisson,
    /// All-or-nothing on the expected thinned mass
    Cutoff,
}

impl From<CliModel> for SurvivalModel {
    fn from(model: CliModel) -> Self {
        match model {
            CliModel::Poisson => SurvivalModel::Poisson,
            CliModel::Cutoff => SurvivalModel::HardCutoff,
        }
    }
}

/// Analytic rarefaction of depth histograms
#[derive(Parser)]
#[command(name = "rare")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute rarefaction curves for one or more depth histograms
    Curve {
        /// Histogram files with two columns: depth and count
        files: Vec<PathBuf>,

        /// File listing one histogram path per line
        #[arg(short, long)]
        list: Option<PathBuf>,

        /// Output prefix (default: the input path)
        #[arg(short, long)]
        output: Option<String>,

        /// Detection thresholds (comma-separated, e.g., "1,10,100")
        #[arg(short, long, value_delimiter = ',')]
        thresholds: Option<Vec<f64>>,

        /// Shading: 0 none, 1 band, 2 ladder, 3 ladder over thresholds 1-10
        #[arg(short, long)]
        shaded: Option<u8>,

        /// Sample-fraction spacing
        #[arg(short = 'g', long, value_enum)]
        schedule: Option<CliSchedule>,

        /// Survival model
        #[arg(short, long, value_enum)]
        model: Option<CliModel>,

        /// Print the rarefaction table to stdout
        #[arg(short, long)]
        dump: bool,

        /// Also write the full report as JSON
        #[arg(long)]
        json: bool,

        /// Path to rarefaction configuration YAML
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Block-sum a labeled 2D count matrix
    Decimate {
        /// Whitespace-delimited matrix; first row and column are axis labels
        file: PathBuf,

        /// Row decimation factor (0 = auto)
        #[arg(short, long, default_value = "1")]
        m: usize,

        /// Column decimation factor (0 = auto)
        #[arg(short, long, default_value = "1")]
        n: usize,

        /// Output prefix (default: the input path)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate an example rarefaction configuration
    Example {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "rare.yaml")]
        output: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Curve {
            files,
            list,
            output,
            thresholds,
            shaded,
            schedule,
            model,
            dump,
            json,
            config,
        } => {
            let options = CurveOptions {
                thresholds,
                shaded,
                schedule: schedule.map(Into::into),
                model: model.map(Into::into),
                dump,
                json,
            };
            cmd_curve(files, list.as_deref(), output.as_deref(), config.as_deref(), &options)
        }

        Commands::Decimate { file, m, n, output } => cmd_decimate(&file, m, n, output.as_deref()),

        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Command-line overrides applied on top of the configuration file.
struct CurveOptions {
    thresholds: Option<Vec<f64>>,
    shaded: Option<u8>,
    schedule: Option<FractionSchedule>,
    model: Option<SurvivalModel>,
    dump: bool,
    json: bool,
}

impl CurveOptions {
    fn apply(&self, mut config: RarefactionConfig) -> Result<RarefactionConfig> {
        if let Some(thresholds) = &self.thresholds {
            config.thresholds = Some(thresholds.clone());
        }
        if let Some(shaded) = self.shaded {
            config.shade = ShadeMode::try_from(shaded)?;
        }
        if let Some(schedule) = self.schedule {
            config.schedule = schedule;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        Ok(config)
    }
}

/// Compute rarefaction curves for each input histogram
fn cmd_curve(
    mut files: Vec<PathBuf>,
    list_path: Option<&Path>,
    output_prefix: Option<&str>,
    config_path: Option<&Path>,
    options: &CurveOptions,
) -> Result<()> {
    if let Some(list_path) = list_path {
        files.extend(read_list(list_path)?);
    }
    if files.is_empty() {
        return Err(RareError::EmptyInput(
            "no histogram files given (pass paths or --list)".to_string(),
        ));
    }

    let base_config = match config_path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            RarefactionConfig::from_yaml(&std::fs::read_to_string(path)?)?
        }
        None => RarefactionConfig::default(),
    };
    let base_config = options.apply(base_config)?;

    let n_files = files.len();
    for file in &files {
        let label = output_label(file, output_prefix, n_files);
        let histogram = ObservationMatrix::from_text(file)?;

        let mut config = base_config.clone();
        config.name = label.clone();
        let report = Rarefaction::from_config(&config).run(&histogram)?;

        let table_path = format!("{}.rare.csv", label);
        report.table.to_tsv(&table_path)?;
        info!("Wrote {}", table_path);

        if options.json {
            let json_path = format!("{}.rare.json", label);
            std::fs::write(&json_path, report.to_json()?)?;
            info!("Wrote {}", json_path);
        }

        if options.dump {
            report.table.write_to(std::io::stdout().lock())?;
        }
        eprint!("{}", report);
    }

    Ok(())
}

/// Block-sum a labeled matrix and write the reduced data
fn cmd_decimate(path: &Path, m: usize, n: usize, output_prefix: Option<&str>) -> Result<()> {
    let matrix = LabeledMatrix::from_text(path)?;
    let (rows, cols) = matrix.shape();

    let m = if m == 0 { auto_factor(rows, AUTO_TARGET_BINS) } else { m };
    let n = if n == 0 { auto_factor(cols, AUTO_TARGET_BINS) } else { n };
    info!("Decimation factors: rows {} columns {}", m, n);

    let reduced = matrix.decimate(DecimationFactors::PerAxis(m, n))?;
    let (out_rows, out_cols) = reduced.shape();
    if out_rows == 0 || out_cols == 0 {
        warn!(
            "Decimated matrix is empty ({} x {}); factors exceed the input size",
            out_rows, out_cols
        );
    }

    let prefix = output_prefix
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string());
    let out_path = format!("{}.all.csv", prefix);
    reduced.write_data(&out_path)?;
    info!("Wrote {} x {} matrix to {}", out_rows, out_cols, out_path);

    Ok(())
}

/// Write an example configuration
fn cmd_example(output_path: &Path) -> Result<()> {
    let yaml = RarefactionConfig::example().to_yaml()?;

    std::fs::write(output_path, &yaml)?;
    eprintln!("Wrote example configuration to {:?}", output_path);
    eprintln!();
    eprintln!("Contents:");
    println!("{}", yaml);

    Ok(())
}

/// Read a list of paths, one per line, skipping blanks and `#` comments.
fn read_list(path: &Path) -> Result<Vec<PathBuf>> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect())
}

/// Output label for one input: the prefix itself for a single input,
/// `prefix.stem` for several, or the input path when no prefix is given.
fn output_label(file: &Path, prefix: Option<&str>, n_files: usize) -> String {
    match prefix {
        Some(prefix) if n_files == 1 => prefix.to_string(),
        Some(prefix) => {
            let stem = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "input".to_string());
            format!("{}.{}", prefix, stem)
        }
        None => file.display().to_string(),
    }
}
