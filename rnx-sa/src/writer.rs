//! Spectrum text output
//!
//! Two single-column files per run, named by spectrum length:
//! `xf_<N/2>.txt` (frequency axis) and `Yf_<N/2>.txt` (amplitudes). Values
//! use 18 fractional digits and a signed, at least two-digit exponent
//! (`1.250000000000000000e+02`), the layout common numeric tools load back
//! without configuration.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, SpectrumError};
use crate::spectrum::Spectrum;

/// Paths of the written spectrum files
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumFiles {
    pub frequencies: PathBuf,
    pub amplitudes: PathBuf,
}

/// Format one value as `d.dddddddddddddddddde±XX`
pub fn format_scientific(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let formatted = format!("{:.18e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => formatted,
    }
}

/// Write values one per line
pub fn write_column(path: &Path, values: &[f64]) -> Result<()> {
    let file = File::create(path).map_err(|e| SpectrumError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for value in values {
        writeln!(writer, "{}", format_scientific(*value)).map_err(|e| SpectrumError::io(path, e))?;
    }
    writer.flush().map_err(|e| SpectrumError::io(path, e))
}

/// Write both spectrum files into `output_dir`, creating it if needed
pub fn write_spectrum(output_dir: &Path, spectrum: &Spectrum) -> Result<SpectrumFiles> {
    fs::create_dir_all(output_dir).map_err(|e| SpectrumError::io(output_dir, e))?;

    let files = SpectrumFiles {
        frequencies: output_dir.join(format!("xf_{}.txt", spectrum.len())),
        amplitudes: output_dir.join(format!("Yf_{}.txt", spectrum.len())),
    };

    write_column(&files.frequencies, &spectrum.frequencies)?;
    write_column(&files.amplitudes, &spectrum.amplitudes)?;

    tracing::debug!(
        xf = %files.frequencies.display(),
        yf = %files.amplitudes.display(),
        points = spectrum.len(),
        "Spectrum files written"
    );

    Ok(files)
}
