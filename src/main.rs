//! CLI entry point for the Moral Machine feature-engineering tool.
//!
//! Provides subcommands for running the full pipeline, recomputing feature
//! statistics from an existing featured CSV, and writing the feature
//! description tables.

use anyhow::Result;
use clap::{Parser, Subcommand};
use mm_featurizer::features::pipeline::{self, PipelineConfig};
use mm_featurizer::{dataset, report};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "mm_featurizer")]
#[command(about = "Feature engineering for Moral Machine survey data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full feature-engineering pipeline
    Run {
        /// Cleaned survey CSV (one row per presented option)
        #[arg(short, long)]
        input: PathBuf,

        /// Per-country AMCE CSV; skipped with a warning when absent
        #[arg(short, long)]
        countries: Option<PathBuf>,

        /// Directory for the featured table, splits and profiles
        #[arg(short, long, default_value = "data/processed")]
        output_dir: PathBuf,

        /// Directory for statistics tables and the report draft
        #[arg(short, long, default_value = "outputs/tables")]
        report_dir: PathBuf,

        /// Fraction of users assigned to the test split
        #[arg(short, long, default_value_t = 0.2)]
        test_size: f64,

        /// RNG seed for the user-level split
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
    },
    /// Recompute scenario feature statistics from an existing featured CSV
    Stats {
        /// Featured CSV produced by a previous run
        #[arg(short, long)]
        input: PathBuf,

        /// Statistics CSV to write
        #[arg(short, long, default_value = "outputs/tables/scenario_feature_stats.csv")]
        output: PathBuf,
    },
    /// Write the feature description tables (CSV and JSON)
    Describe {
        /// Directory to write the description tables into
        #[arg(short, long, default_value = "outputs/tables")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/mm_featurizer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("mm_featurizer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            countries,
            output_dir,
            report_dir,
            test_size,
            seed,
        } => pipeline::run(&PipelineConfig {
            input,
            countries,
            output_dir,
            report_dir,
            test_size,
            seed,
        }),
        Commands::Stats { input, output } => dataset::load_featured(&input)
            .and_then(|featured| report::write_feature_stats(&featured, &output)),
        Commands::Describe { output_dir } => report::write_descriptions(&output_dir),
    };

    if let Err(ref e) = result {
        error!(error = %format!("{e:#}"), "Command failed");
    }
    result
}
