//! Error types for rnx-sa

use std::path::PathBuf;
use thiserror::Error;

/// Spectral analysis errors
#[derive(Error, Debug)]
pub enum SpectrumError {
    /// Waveform row could not be parsed
    #[error("Malformed waveform at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// Fewer than two samples; the sampling interval is undefined
    #[error("Insufficient samples: {count} (at least 2 required)")]
    InsufficientSamples { count: usize },

    /// Time column does not advance
    #[error("Invalid time axis: {0}")]
    InvalidTimeAxis(String),

    /// Requested channel column does not exist
    #[error("Channel {channel} out of range (waveform has {channels} channels)")]
    ChannelOutOfRange { channel: usize, channels: usize },

    /// Invalid analysis parameter
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// File I/O errors
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SpectrumError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for rnx-sa operations
pub type Result<T> = std::result::Result<T, SpectrumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = SpectrumError::MalformedInput {
            line: 7,
            reason: "token 'abc' is not a number".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed waveform at line 7: token 'abc' is not a number"
        );

        let err = SpectrumError::ChannelOutOfRange { channel: 4, channels: 3 };
        assert!(err.to_string().contains("Channel 4"));
    }

    #[test]
    fn test_io_names_path() {
        let err = SpectrumError::io(
            "/data/wave.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("/data/wave.txt"));
    }
}
