//! DP Release CLI Tool
//!
//! Release one category of a sensitive CSV dataset with identifiers masked
//! and numeric columns noised.
//!
//! Usage:
//!   dp-release categories
//!   dp-release plan <input.csv> --category <name>
//!   dp-release release <input.csv> --category <name> [--epsilon <e>] [--output-dir <dir>]

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use dp_release_core::csv_io::{read_table_from_path, write_release};
use dp_release_core::{Category, CategoryEngine, NoiseMechanism, ReleaseConfig, ReleaseError};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dp-release")]
#[command(version = "0.1.0")]
#[command(about = "Release sensitive tabular records by category with masking and calibrated noise", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List the release categories and their columns
    Categories,

    /// Show how each column of a category would be treated
    Plan {
        /// Input CSV file
        input: PathBuf,

        /// Category name (exact match)
        #[arg(short, long)]
        category: String,
    },

    /// Transform a category and write the result
    Release {
        /// Input CSV file
        input: PathBuf,

        /// Category name (exact match)
        #[arg(short, long)]
        category: String,

        /// Privacy budget; lower adds more noise
        #[arg(short, long)]
        epsilon: Option<f64>,

        /// Noise mechanism
        #[arg(short, long, value_enum)]
        mechanism: Option<MechanismArg>,

        /// Delta for the Gaussian mechanism (default 1e-6, or the config file's)
        #[arg(long)]
        delta: Option<f64>,

        /// Explicit sensitivity for a column, as COLUMN=VALUE (repeatable)
        #[arg(short, long = "sensitivity", value_parser = parse_sensitivity)]
        sensitivities: Vec<(String, f64)>,

        /// Directory the release is written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: OutputFormat,

        /// Print the JSON release report to stdout
        #[arg(long)]
        report: bool,

        /// Transform columns in parallel
        #[arg(long)]
        parallel: bool,

        /// JSON file holding a release configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MechanismArg {
    Laplace,
    Gaussian,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

/// Delta used when Gaussian noise is requested without one
const DEFAULT_DELTA: f64 = 1e-6;

/// Combine the configured mechanism with `--mechanism` / `--delta`
fn resolve_mechanism(
    configured: NoiseMechanism,
    requested: Option<MechanismArg>,
    delta: Option<f64>,
) -> NoiseMechanism {
    match (requested, configured) {
        (Some(MechanismArg::Laplace), _) | (None, NoiseMechanism::Laplace) => {
            if delta.is_some() {
                tracing::warn!("--delta ignored: the Laplace mechanism takes no delta");
            }
            NoiseMechanism::Laplace
        }
        (_, NoiseMechanism::Gaussian { delta: configured }) => NoiseMechanism::Gaussian {
            delta: delta.unwrap_or(configured),
        },
        (Some(MechanismArg::Gaussian), NoiseMechanism::Laplace) => NoiseMechanism::Gaussian {
            delta: delta.unwrap_or(DEFAULT_DELTA),
        },
    }
}

fn parse_sensitivity(raw: &str) -> Result<(String, f64), String> {
    let (column, value) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{}'", raw))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid sensitivity '{}': {}", value, e))?;
    Ok((column.trim().to_string(), value))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let category = e.category().unwrap_or("-");
            eprintln!(
                "{} {} (category: '{}'): {}",
                "[dp-release]".red().bold(),
                e.kind().red(),
                category,
                e
            );
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), ReleaseError> {
    match command {
        Commands::Categories => {
            for category in Category::ALL {
                println!("{}", category.name().bold());
                for column in category.columns() {
                    println!("  {}", column);
                }
            }
            Ok(())
        }
        Commands::Plan { input, category } => {
            let source = read_table_from_path(&input)?;
            let plan = CategoryEngine::default().plan(&source, &category)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
        Commands::Release {
            input,
            category,
            epsilon,
            mechanism,
            delta,
            sensitivities,
            output_dir,
            format,
            report,
            parallel,
            config,
        } => {
            let mut release_config = match config {
                Some(path) => load_config(&path)?,
                None => ReleaseConfig::default(),
            };
            if let Some(epsilon) = epsilon {
                release_config = release_config.with_epsilon(epsilon);
            }
            let resolved = resolve_mechanism(release_config.mechanism, mechanism, delta);
            release_config = release_config.with_mechanism(resolved);
            for (column, value) in sensitivities {
                release_config = release_config.with_sensitivity(column, value);
            }
            if parallel {
                release_config = release_config.with_parallel(true);
            }

            let source = read_table_from_path(&input)?;
            let release =
                CategoryEngine::new(release_config).transform_with_report(&source, &category)?;
            let released_category = release.report.category;

            let path = match format {
                OutputFormat::Csv => write_release(&output_dir, released_category, &release.table)?,
                OutputFormat::Json => {
                    let path = output_dir
                        .join(released_category.output_file_name())
                        .with_extension("json");
                    let body = serde_json::to_string_pretty(&release.table)?;
                    fs::write(&path, body)?;
                    path
                }
            };

            eprintln!(
                "{} DP data for category '{}' saved to '{}'",
                "✓".green().bold(),
                released_category,
                path.display()
            );

            if report {
                println!("{}", serde_json::to_string_pretty(&release.report)?);
            }
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<ReleaseConfig, ReleaseError> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| ReleaseError::Config {
        path: path.display().to_string(),
        source,
    })
}
