//! Sampling parameters derived from the waveform time axis

use serde::Serialize;

use crate::error::{Result, SpectrumError};

/// Default effective band factor (usable FFT lines per sample)
pub const DEFAULT_EFFECTIVE_BAND_FACTOR: f64 = 0.5;

/// Relative slack absorbing representation error before rounding `fs` up
const FS_ROUNDING_TOLERANCE: f64 = 1e-9;

/// Acquisition and frequency-domain parameters of one waveform
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingParameters {
    /// Sampling frequency [Hz], rounded up to an integer
    pub fs: f64,
    /// Number of samples
    pub n: usize,
    /// Acquisition time [s]
    pub duration: f64,
    /// Sampling interval [s]
    pub dt: f64,
    /// Frequency resolution [Hz]
    pub df: f64,
    /// Maximum analysed frequency [Hz]
    pub fmax: f64,
    /// Effective band factor
    pub effective_band_factor: f64,
    /// Usable FFT lines
    pub lines: f64,
}

impl SamplingParameters {
    /// Derive parameters from the time column
    ///
    /// The sampling frequency comes from the first interval,
    /// `fs = ceil(1 / (t[1] - t[0]))`; the rest follows from `fs` and `N`.
    pub fn from_time_axis(time: &[f64], effective_band_factor: f64) -> Result<Self> {
        if time.len() < 2 {
            return Err(SpectrumError::InsufficientSamples { count: time.len() });
        }
        if !effective_band_factor.is_finite() || effective_band_factor <= 0.0 {
            return Err(SpectrumError::Configuration(format!(
                "effective band factor must be positive, got {}",
                effective_band_factor
            )));
        }

        let step = time[1] - time[0];
        if !step.is_finite() || step <= 0.0 {
            return Err(SpectrumError::InvalidTimeAxis(format!(
                "first time step is {} s (t0 = {}, t1 = {})",
                step, time[0], time[1]
            )));
        }

        let raw_fs = 1.0 / step;
        let fs = (raw_fs * (1.0 - FS_ROUNDING_TOLERANCE)).ceil();
        let n = time.len();
        let duration = n as f64 / fs;

        Ok(Self {
            fs,
            n,
            duration,
            dt: duration / n as f64,
            df: 1.0 / duration,
            fmax: fs / 2.0,
            effective_band_factor,
            lines: effective_band_factor * n as f64,
        })
    }

    /// Spectrum length, `N / 2`
    pub fn half_length(&self) -> usize {
        self.n / 2
    }
}
