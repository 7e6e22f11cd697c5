//! Waveform loader
//!
//! Datalogger exports are whitespace-delimited numeric rows:
//!
//! ```text
//! 0.000000  0.0123 -0.0045  9.8123
//! 0.000125  0.0119 -0.0051  9.7981
//! ```
//!
//! Column 0 is time in seconds, the remaining columns are channels
//! (X, Y, Z for a triaxial accelerometer). Blank lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, SpectrumError};

/// Channel transformed when none is configured (Z axis)
pub const DEFAULT_CHANNEL: usize = 3;

/// Loaded waveform, stored column-wise
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    time: Vec<f64>,
    channels: Vec<Vec<f64>>,
}

impl Waveform {
    /// Number of samples (rows)
    pub fn sample_count(&self) -> usize {
        self.time.len()
    }

    /// Number of channel columns (time excluded)
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Time column
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Channel samples by 1-based column index
    pub fn channel(&self, channel: usize) -> Result<&[f64]> {
        channel
            .checked_sub(1)
            .and_then(|index| self.channels.get(index))
            .map(|samples| samples.as_slice())
            .ok_or(SpectrumError::ChannelOutOfRange {
                channel,
                channels: self.channels.len(),
            })
    }
}

/// Load a waveform file
pub fn load_waveform(path: &Path) -> Result<Waveform> {
    let file = File::open(path).map_err(|e| SpectrumError::io(path, e))?;
    let waveform = parse_waveform(BufReader::new(file)).map_err(|e| match e {
        SpectrumError::Io { source, .. } => SpectrumError::io(path, source),
        other => other,
    })?;

    tracing::debug!(
        path = %path.display(),
        samples = waveform.sample_count(),
        channels = waveform.channel_count(),
        "Waveform loaded"
    );

    Ok(waveform)
}

/// Parse a waveform from any buffered reader
///
/// Every non-blank row must have the same column count as the first one,
/// and at least two columns (time plus one channel).
pub fn parse_waveform<R: BufRead>(reader: R) -> Result<Waveform> {
    let mut time = Vec::new();
    let mut channels: Vec<Vec<f64>> = Vec::new();
    let mut width: Option<usize> = None;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|e| SpectrumError::io("<waveform>", e))?;

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        let expected = *width.get_or_insert(tokens.len());
        if expected < 2 {
            return Err(SpectrumError::MalformedInput {
                line: line_number,
                reason: "expected a time column and at least one channel".to_string(),
            });
        }
        if tokens.len() != expected {
            return Err(SpectrumError::MalformedInput {
                line: line_number,
                reason: format!("expected {} columns, found {}", expected, tokens.len()),
            });
        }
        if channels.is_empty() {
            channels = vec![Vec::new(); expected - 1];
        }

        let mut values = tokens.iter().map(|token| {
            token.parse::<f64>().map_err(|_| SpectrumError::MalformedInput {
                line: line_number,
                reason: format!("token '{}' is not a number", token),
            })
        });

        if let Some(t) = values.next() {
            time.push(t?);
        }
        for (column, value) in channels.iter_mut().zip(values) {
            column.push(value?);
        }
    }

    if time.len() < 2 {
        return Err(SpectrumError::InsufficientSamples { count: time.len() });
    }

    Ok(Waveform { time, channels })
}
