//! Level Aggregator (rnx-la) - Main entry point
//!
//! Reads a batch of Rion NL-52 exports, energy-averages the Leq/Lmax/Lmin
//! band levels of each file and writes one row per file to an xlsx report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use rnx_common::config::ConfigFileResolver;
use rnx_common::logging::init_tracing;
use rnx_la::config::{LevelOverrides, LevelSettings};
use rnx_la::models::LevelCategory;
use rnx_la::LevelWorkflow;

/// Command-line arguments for rnx-la
#[derive(Parser, Debug)]
#[command(name = "rnx-la")]
#[command(about = "Energy-averaged band levels for Rion NL-52 exports")]
#[command(version)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"), " (", env!("RNX_SOURCE_REVISION"), ", ",
    env!("RNX_BUILD_DATE"), ", ", env!("RNX_BUILD_PROFILE"), ")"
))]
struct Args {
    /// Export files to process, in order (skips directory discovery)
    files: Vec<PathBuf>,

    /// Directory scanned for exports
    #[arg(short, long, env = "RNX_INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Export file extension
    #[arg(short, long, env = "RNX_EXTENSION")]
    extension: Option<String>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Output workbook
    #[arg(short, long, env = "RNX_OUTPUT")]
    output: Option<PathBuf>,

    /// Level category written to the report (leq, lmax, lmin)
    #[arg(short, long)]
    category: Option<LevelCategory>,

    /// Write one sheet per level category
    #[arg(long)]
    all_categories: bool,

    /// Also write the per-file descriptors as JSON
    #[arg(long)]
    json_summary: Option<PathBuf>,

    /// Config file (overrides RNX_CONFIG and the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (overrides the config file; RUST_LOG takes precedence)
    #[arg(long, env = "RNX_LOG_LEVEL")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ConfigFileResolver::new()
        .load(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config.logging).context("Failed to initialize logging")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        revision = env!("RNX_SOURCE_REVISION"),
        built = env!("RNX_BUILD_DATE"),
        profile = env!("RNX_BUILD_PROFILE"),
        "Starting rnx-la (Level Aggregator)"
    );

    let overrides = LevelOverrides {
        files: args.files,
        input_dir: args.input_dir,
        extension: args.extension,
        recursive: args.recursive,
        output: args.output,
        category: args.category,
        all_categories: args.all_categories,
        json_summary: args.json_summary,
    };
    let settings = LevelSettings::resolve(&config.levels, overrides)
        .context("Invalid level aggregation settings")?;

    let workflow = LevelWorkflow::new(&settings).context("Invalid report layout")?;
    let files = LevelWorkflow::discover(&settings).context("File discovery failed")?;
    info!(
        count = files.len(),
        dir = %settings.input_dir.display(),
        "Discovered {} export(s)",
        files.len()
    );

    let table = workflow
        .run_and_report(&files)
        .context("Level aggregation failed")?;

    info!(
        files = table.file_count(),
        output = %workflow.output().display(),
        "rnx-la finished"
    );

    Ok(())
}
