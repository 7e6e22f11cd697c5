//! Spectral Analyzer (rnx-sa) - Main entry point
//!
//! Computes the single-sided FFT amplitude spectrum of one channel of a
//! vibration waveform export and writes the frequency axis and amplitudes
//! as text files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use rnx_common::config::ConfigFileResolver;
use rnx_common::logging::init_tracing;
use rnx_sa::analyzer::{SpectrumOverrides, SpectrumSettings};
use rnx_sa::{SpectrumAnalyzer, SpectrumSummary};

/// Command-line arguments for rnx-sa
#[derive(Parser, Debug)]
#[command(name = "rnx-sa")]
#[command(about = "FFT amplitude spectrum of a vibration waveform export")]
#[command(version)]
struct Args {
    /// Whitespace-delimited waveform file (time column, then channels)
    waveform: PathBuf,

    /// Directory receiving xf_<N/2>.txt and Yf_<N/2>.txt
    #[arg(short, long, env = "RNX_SA_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Channel column to transform (1 = X, 2 = Y, 3 = Z)
    #[arg(short, long, env = "RNX_SA_CHANNEL")]
    channel: Option<usize>,

    /// Effective band factor (usable FFT lines per sample)
    #[arg(short, long)]
    effective_band_factor: Option<f64>,

    /// Also write the analysis summary as JSON
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

    info!("Starting rnx-sa (Spectral Analyzer) v{}", env!("CARGO_PKG_VERSION"));

    let overrides = SpectrumOverrides {
        channel: args.channel,
        effective_band_factor: args.effective_band_factor,
        output_dir: args.output_dir,
        json_summary: args.json_summary,
    };
    let settings = SpectrumSettings::resolve(&config.spectrum, overrides)
        .context("Invalid spectrum settings")?;

    let summary = SpectrumAnalyzer::new(settings)
        .analyze(&args.waveform)
        .with_context(|| format!("Spectral analysis of {} failed", args.waveform.display()))?;

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &SpectrumSummary) {
    let s = &summary.sampling;
    println!("Frequency domain calculation");
    println!("****************************");
    println!("file: {}", summary.file.display());
    println!("channel: {}", summary.channel);
    println!("fmax: {} Hz", s.fmax);
    println!("N: {} samples", s.n);
    println!("FFT: {} lines", s.lines);
    println!("Eb: {}", s.effective_band_factor);
    println!("fs: {} Hz", s.fs);
    println!("df: {} Hz", s.df);
    println!("T: {} s", s.duration);
    if let Some((frequency, amplitude)) = summary.peak {
        println!("peak: {:.3} at {:.3} Hz", amplitude, frequency);
    }
    println!("xf: {}", summary.outputs.frequencies.display());
    println!("Yf: {}", summary.outputs.amplitudes.display());
}
