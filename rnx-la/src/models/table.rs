//! Cross-file result table
//!
//! Row `i` of every array belongs to the `i`-th file pushed into the builder.
//! Rows are never reordered or merged, even when identifiers repeat.

use serde::{Deserialize, Serialize};

use super::descriptor::FileDescriptor;
use super::record::LevelCategory;
use crate::error::{LevelError, MalformedKind, Result};

/// Row-major `(rows × band_count)` matrix of levels in dB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelMatrix {
    band_count: usize,
    values: Vec<f64>,
}

impl LevelMatrix {
    fn new(band_count: usize) -> Self {
        Self {
            band_count,
            values: Vec::new(),
        }
    }

    fn push_row(&mut self, row: &[f64]) {
        debug_assert_eq!(row.len(), self.band_count);
        self.values.extend_from_slice(row);
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        if self.band_count == 0 {
            0
        } else {
            self.values.len() / self.band_count
        }
    }

    /// `(rows, band_count)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.band_count)
    }

    /// Row slice, if in range
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.band_count)?;
        self.values.get(start..start + self.band_count)
    }

    /// Single value at `(row, band)`
    pub fn get(&self, row: usize, band: usize) -> Option<f64> {
        if band >= self.band_count {
            return None;
        }
        self.row(row).map(|r| r[band])
    }

    /// Iterate rows in order
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.band_count.max(1))
    }
}

/// One result row: file identifier and its descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// File identifier (name) as discovered
    pub identifier: String,
    /// Energy-averaged descriptors
    pub descriptor: FileDescriptor,
}

/// Finished, immutable result table
#[derive(Debug, Clone)]
pub struct ResultTable {
    band_count: usize,
    rows: Vec<TableRow>,
    leq: LevelMatrix,
    lmax: LevelMatrix,
    lmin: LevelMatrix,
    durations: Vec<f64>,
}

impl ResultTable {
    /// Number of files (rows)
    pub fn file_count(&self) -> usize {
        self.rows.len()
    }

    /// Band count per row
    pub fn band_count(&self) -> usize {
        self.band_count
    }

    /// Rows in discovery order
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Row by 0-based file index
    pub fn row(&self, index: usize) -> Option<&TableRow> {
        self.rows.get(index)
    }

    /// Level matrix for a category
    pub fn levels(&self, category: LevelCategory) -> &LevelMatrix {
        match category {
            LevelCategory::Leq => &self.leq,
            LevelCategory::Lmax => &self.lmax,
            LevelCategory::Lmin => &self.lmin,
        }
    }

    /// Duration per file, in row order
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    /// Identifiers in row order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.identifier.as_str())
    }
}

/// Incremental builder; the only way to mutate a table
#[derive(Debug)]
pub struct ResultTableBuilder {
    table: ResultTable,
}

impl ResultTableBuilder {
    /// Create builder for a fixed band count
    pub fn new(band_count: usize) -> Self {
        Self {
            table: ResultTable {
                band_count,
                rows: Vec::new(),
                leq: LevelMatrix::new(band_count),
                lmax: LevelMatrix::new(band_count),
                lmin: LevelMatrix::new(band_count),
                durations: Vec::new(),
            },
        }
    }

    /// Append one file's descriptor as the next row
    ///
    /// Fails if any category's band count differs from the table's. The table
    /// is unchanged on failure.
    pub fn push(&mut self, identifier: impl Into<String>, descriptor: FileDescriptor) -> Result<()> {
        let identifier = identifier.into();
        let expected = self.table.band_count;

        for category in LevelCategory::ALL {
            let actual = descriptor.bands(category).len();
            if actual != expected {
                return Err(LevelError::malformed(
                    identifier,
                    MalformedKind::DescriptorBandCount {
                        category,
                        expected,
                        actual,
                    },
                ));
            }
        }

        self.table.leq.push_row(&descriptor.leq_bands);
        self.table.lmax.push_row(&descriptor.lmax_bands);
        self.table.lmin.push_row(&descriptor.lmin_bands);
        self.table.durations.push(descriptor.duration_seconds);
        self.table.rows.push(TableRow {
            identifier,
            descriptor,
        });

        Ok(())
    }

    /// Rows pushed so far
    pub fn len(&self) -> usize {
        self.table.rows.len()
    }

    /// True when no rows were pushed
    pub fn is_empty(&self) -> bool {
        self.table.rows.is_empty()
    }

    /// Freeze the table
    pub fn finish(self) -> ResultTable {
        self.table
    }
}
