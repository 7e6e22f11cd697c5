//! Error types for rnx-la
//!
//! Every error is fatal for the run: no partial report is written once a file
//! fails. Errors carry the offending file identifier and level category so the
//! user can locate the problem in the export.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::LevelCategory;
use crate::services::file_scanner::ScanError;

/// Shape or content violation inside one measurement file
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedKind {
    /// Level row length differs from the run's band count
    #[error("{category} record {record}: expected {expected} bands, found {actual}")]
    BandCount {
        category: LevelCategory,
        /// 1-based record index within the category
        record: usize,
        expected: usize,
        actual: usize,
    },

    /// Averaged descriptor band vector differs from the table's band count
    #[error("{category} descriptor: expected {expected} bands, found {actual}")]
    DescriptorBandCount {
        category: LevelCategory,
        expected: usize,
        actual: usize,
    },

    /// Level token is not a floating point number
    #[error("{category} record {record}: band {field} value '{token}' is not a number")]
    InvalidNumber {
        category: LevelCategory,
        /// 1-based record index within the category
        record: usize,
        /// 0-based band index
        field: usize,
        token: String,
    },

    /// Level row without any band values
    #[error("{category} record {record}: row has no band values")]
    EmptyLevelRow {
        category: LevelCategory,
        /// 1-based record index within the category
        record: usize,
    },

    /// `Start Time` row without a timestamp field
    #[error("line {line}: 'Start Time' row has no timestamp")]
    MissingTimestamp { line: usize },

    /// Timestamp and level accumulators have different lengths
    #[error(
        "misaligned records: {timestamps} timestamps, {leq} Leq, {lmax} Lmax, {lmin} Lmin rows"
    )]
    Misaligned {
        timestamps: usize,
        leq: usize,
        lmax: usize,
        lmin: usize,
    },
}

/// Main error type for rnx-la
#[derive(Debug, Error)]
pub enum LevelError {
    /// Schema/shape violation in a measurement file
    #[error("Malformed input in {file}: {kind}")]
    MalformedInput { file: String, kind: MalformedKind },

    /// No records for a required level category
    #[error("Empty file {file}: no {category} records")]
    EmptyFile {
        file: String,
        category: LevelCategory,
    },

    /// Invalid run configuration (band labels, category names, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// File I/O errors
    #[error("File I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report writing errors
    #[error("Report error: {0}")]
    Report(String),

    /// File discovery errors
    #[error("Discovery error: {0}")]
    Scan(#[from] ScanError),
}

impl LevelError {
    /// Build a malformed-input error for a file
    pub fn malformed(file: impl Into<String>, kind: MalformedKind) -> Self {
        LevelError::MalformedInput {
            file: file.into(),
            kind,
        }
    }

    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LevelError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for LevelError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        LevelError::Report(err.to_string())
    }
}

/// Convenience Result type using rnx-la LevelError
pub type Result<T> = std::result::Result<T, LevelError>;
