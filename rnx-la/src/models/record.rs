//! Parsed measurement records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Level category exported by the meter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelCategory {
    /// Equivalent continuous level
    Leq,
    /// Maximum level
    Lmax,
    /// Minimum level
    Lmin,
}

impl LevelCategory {
    /// All categories, in report order
    pub const ALL: [LevelCategory; 3] = [LevelCategory::Leq, LevelCategory::Lmax, LevelCategory::Lmin];

    /// Marker token identifying this category's rows in an export
    pub fn marker(&self) -> &'static str {
        match self {
            LevelCategory::Leq => "Leq",
            LevelCategory::Lmax => "Lmax",
            LevelCategory::Lmin => "Lmin",
        }
    }

    /// Worksheet name used in reports
    pub fn sheet_name(&self) -> &'static str {
        match self {
            LevelCategory::Leq => "LEQ",
            LevelCategory::Lmax => "LMAX",
            LevelCategory::Lmin => "LMIN",
        }
    }
}

impl fmt::Display for LevelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

impl FromStr for LevelCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "leq" => Ok(LevelCategory::Leq),
            "lmax" => Ok(LevelCategory::Lmax),
            "lmin" => Ok(LevelCategory::Lmin),
            other => Err(format!(
                "unknown level category '{}' (expected leq, lmax or lmin)",
                other
            )),
        }
    }
}

/// One timestamped record spanning all bands for the three categories
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Acquisition instant in meter-local format (not parsed)
    pub timestamp: String,
    /// Leq per band, broadband value first
    pub leq: Vec<f64>,
    /// Lmax per band
    pub lmax: Vec<f64>,
    /// Lmin per band
    pub lmin: Vec<f64>,
}

impl Record {
    /// Band values for a category
    pub fn levels(&self, category: LevelCategory) -> &[f64] {
        match category {
            LevelCategory::Leq => &self.leq,
            LevelCategory::Lmax => &self.lmax,
            LevelCategory::Lmin => &self.lmin,
        }
    }

    /// Band count (all three categories share it)
    pub fn band_count(&self) -> usize {
        self.leq.len()
    }
}

/// One parsed input file
#[derive(Debug, Clone)]
pub struct MeasurementFile {
    /// File name, used as the row identifier in reports
    pub identifier: String,
    /// Records in the order they appear in the file
    pub records: Vec<Record>,
    /// Number of `Address` marker rows
    pub marker_rows: usize,
    /// Rows without a recognized marker
    pub ignored_rows: usize,
}

impl MeasurementFile {
    /// Number of records
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}
