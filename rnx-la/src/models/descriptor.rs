//! Per-file descriptors derived from a measurement file

use serde::{Deserialize, Serialize};

use super::record::LevelCategory;

/// Energy-averaged descriptors for one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Timestamp of the first record (positional, not chronological minimum)
    pub start_time: String,
    /// Timestamp of the last record (positional, not chronological maximum)
    pub end_time: String,
    /// Count of `Address` marker rows, reported as seconds
    pub duration_seconds: f64,
    /// Number of records averaged
    pub record_count: usize,
    /// Energy-averaged Leq per band
    pub leq_bands: Vec<f64>,
    /// Energy-averaged Lmax per band
    pub lmax_bands: Vec<f64>,
    /// Energy-averaged Lmin per band
    pub lmin_bands: Vec<f64>,
}

impl FileDescriptor {
    /// Averaged bands for a category
    pub fn bands(&self, category: LevelCategory) -> &[f64] {
        match category {
            LevelCategory::Leq => &self.leq_bands,
            LevelCategory::Lmax => &self.lmax_bands,
            LevelCategory::Lmin => &self.lmin_bands,
        }
    }

    /// Band count of the averaged vectors
    pub fn band_count(&self) -> usize {
        self.leq_bands.len()
    }
}
