//! rnx-sa library interface
//!
//! FFT amplitude spectrum of one channel of a datalogger waveform export.

pub mod analyzer;
pub mod error;
pub mod sampling;
pub mod spectrum;
pub mod waveform;
pub mod writer;

pub use crate::analyzer::{SpectrumAnalyzer, SpectrumSettings, SpectrumSummary};
pub use crate::error::{Result, SpectrumError};
