//! CLI entry point for the transit ridership pipeline.
//!
//! Running without a subcommand cleans the raw subway and bus files in the
//! data directory. Other subcommands download the raw datasets, print
//! summary metrics over the cleaned files and fit the ridership model.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use transit_ridership::analyzers::analyzer::summarize;
use transit_ridership::analyzers::model::{DEFAULT_SEED, train_ridership_model};
use transit_ridership::cleaner::{CleanOutcome, clean_all};
use transit_ridership::config::{DEFAULT_ROW_LIMIT, DataPaths, default_sources};
use transit_ridership::download::download_all;
use transit_ridership::fetch::BasicClient;

#[derive(Parser)]
#[command(name = "transit_ridership")]
#[command(about = "Clean and summarize NYC subway ridership and bus speed data", long_about = None)]
struct Cli {
    /// Directory holding raw and cleaned CSV files
    #[arg(long, global = true, env = "TRANSIT_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the raw subway and bus files (default)
    Clean,
    /// Download the raw datasets from NYC open data
    Download {
        /// Maximum number of rows requested per dataset
        #[arg(short, long, default_value_t = DEFAULT_ROW_LIMIT)]
        limit: usize,
    },
    /// Print ridership and bus speed metrics from the cleaned files as JSON
    Summarize {
        /// Only include these boroughs (repeatable)
        #[arg(short, long = "borough")]
        boroughs: Vec<String>,
    },
    /// Fit the baseline ridership regression on the cleaned subway file
    Model {
        /// Seed for the train/test shuffle
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _guard = init_tracing();

    let cli = Cli::parse();
    let paths = DataPaths::new(&cli.data_dir);

    match cli.command.unwrap_or(Commands::Clean) {
        Commands::Clean => run_clean(&paths)?,
        Commands::Download { limit } => {
            let client = BasicClient::new()?;
            let summary = download_all(&client, &default_sources(limit), &paths.data_dir).await?;

            for saved in &summary.saved {
                println!("Downloaded {} rows to {}", saved.rows, saved.path.display());
            }
            if !summary.is_success() {
                let names: Vec<_> = summary.failed.iter().map(|(name, _)| name.as_str()).collect();
                bail!("failed to download: {}", names.join(", "));
            }
            info!(datasets = summary.saved.len(), "Download complete");
        }
        Commands::Summarize { boroughs } => {
            let summary = summarize(&paths, &boroughs)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Model { seed } => match train_ridership_model(&paths, seed)? {
            Some(report) => {
                println!("Mean Squared Error: {}", report.mean_squared_error);
                println!("R^2 Score: {}", report.r2);
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            None => println!(
                "No cleaned subway file at {}, run the cleaner first.",
                paths.subway.output.display()
            ),
        },
    }

    Ok(())
}

/// Cleans both datasets, printing each preview, and fails if either failed.
fn run_clean(paths: &DataPaths) -> Result<()> {
    let report = clean_all(paths);

    for (label, outcome, output) in [
        ("subway", &report.subway, &paths.subway.output),
        ("bus", &report.bus, &paths.bus.output),
    ] {
        match outcome {
            CleanOutcome::Skipped { path } => {
                println!("No {label} file found at {}, skipped.", path.display());
            }
            CleanOutcome::Completed { preview, .. } => {
                println!("Saved cleaned {label} data to {}", output.display());
                println!("{preview}");
            }
            CleanOutcome::Failed(e) => {
                warn!(label, error = %e, "Cleaned file was not written");
            }
        }
    }

    if report.has_failures() {
        let failed: Vec<_> = [("subway", &report.subway), ("bus", &report.bus)]
            .into_iter()
            .filter(|(_, o)| o.is_failed())
            .map(|(label, _)| label)
            .collect();
        bail!("cleaning failed for: {}", failed.join(", "));
    }
    Ok(())
}

/// Colored stderr output plus a JSON daily rolling log file.
///
/// The returned guard flushes the file writer on drop.
fn init_tracing() -> WorkerGuard {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/transit_ridership.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("transit_ridership.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info"));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}

fn env_filter(var: &str, default: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(default))
}
