//! Spectral analysis of one waveform file
//!
//! Load, derive sampling parameters, transform the selected channel and
//! write the two spectrum files. Settings resolve per value: command line,
//! then the `[spectrum]` TOML section, then defaults.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use rnx_common::config::SpectrumConfig;
use serde::Serialize;
use tracing::info;

use crate::error::{Result, SpectrumError};
use crate::sampling::{SamplingParameters, DEFAULT_EFFECTIVE_BAND_FACTOR};
use crate::spectrum::compute_spectrum;
use crate::waveform::{load_waveform, DEFAULT_CHANNEL};
use crate::writer::{write_spectrum, SpectrumFiles};

/// Command-line overrides
#[derive(Debug, Clone, Default)]
pub struct SpectrumOverrides {
    pub channel: Option<usize>,
    pub effective_band_factor: Option<f64>,
    pub output_dir: Option<PathBuf>,
    pub json_summary: Option<PathBuf>,
}

/// Resolved analyzer settings
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumSettings {
    /// 1-based channel column
    pub channel: usize,
    pub effective_band_factor: f64,
    pub output_dir: PathBuf,
    /// Optional JSON summary path
    pub json_summary: Option<PathBuf>,
}

impl Default for SpectrumSettings {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL,
            effective_band_factor: DEFAULT_EFFECTIVE_BAND_FACTOR,
            output_dir: PathBuf::from("."),
            json_summary: None,
        }
    }
}

impl SpectrumSettings {
    pub fn resolve(config: &SpectrumConfig, overrides: SpectrumOverrides) -> Result<Self> {
        let defaults = Self::default();
        let settings = Self {
            channel: overrides.channel.or(config.channel).unwrap_or(defaults.channel),
            effective_band_factor: overrides
                .effective_band_factor
                .or(config.effective_band_factor)
                .unwrap_or(defaults.effective_band_factor),
            output_dir: overrides
                .output_dir
                .or_else(|| config.output_dir.clone())
                .unwrap_or(defaults.output_dir),
            json_summary: overrides
                .json_summary
                .or_else(|| config.json_summary.clone()),
        };

        if settings.channel == 0 {
            return Err(SpectrumError::Configuration(
                "channel is 1-based; column 0 is the time axis".to_string(),
            ));
        }

        Ok(settings)
    }
}

/// Outcome of one analysis
#[derive(Debug, Clone, Serialize)]
pub struct SpectrumSummary {
    pub file: PathBuf,
    pub channel: usize,
    #[serde(flatten)]
    pub sampling: SamplingParameters,
    /// Largest amplitude bin as (frequency [Hz], amplitude)
    pub peak: Option<(f64, f64)>,
    pub outputs: SpectrumFiles,
}

/// Spectral analyzer
#[derive(Debug, Clone)]
pub struct SpectrumAnalyzer {
    settings: SpectrumSettings,
}

impl SpectrumAnalyzer {
    pub fn new(settings: SpectrumSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SpectrumSettings {
        &self.settings
    }

    /// Analyze `path` and write `xf_<N/2>.txt` / `Yf_<N/2>.txt`
    pub fn analyze(&self, path: &Path) -> Result<SpectrumSummary> {
        let waveform = load_waveform(path)?;
        let samples = waveform.channel(self.settings.channel)?;
        let sampling = SamplingParameters::from_time_axis(waveform.time(), self.settings.effective_band_factor)?;

        let spectrum = compute_spectrum(samples, &sampling);
        let peak = spectrum
            .peak()
            .map(|(index, amplitude)| (spectrum.frequencies[index], amplitude));
        let outputs = write_spectrum(&self.settings.output_dir, &spectrum)?;

        let summary = SpectrumSummary {
            file: path.to_path_buf(),
            channel: self.settings.channel,
            sampling,
            peak,
            outputs,
        };

        info!(
            file = %path.display(),
            fmax_hz = sampling.fmax,
            n = sampling.n,
            lines = sampling.lines,
            eb = sampling.effective_band_factor,
            fs_hz = sampling.fs,
            df_hz = sampling.df,
            t_s = sampling.duration,
            xf = %summary.outputs.frequencies.display(),
            yf = %summary.outputs.amplitudes.display(),
            "Frequency domain calculation complete"
        );

        if let Some(json_path) = &self.settings.json_summary {
            write_json_summary(&summary, json_path)?;
        }

        Ok(summary)
    }
}

/// Serialize a summary as pretty JSON
pub fn write_json_summary(summary: &SpectrumSummary, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| SpectrumError::io(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .map_err(|e| SpectrumError::io(path, e.into()))?;

    info!(path = %path.display(), "Spectrum summary written");
    Ok(())
}
