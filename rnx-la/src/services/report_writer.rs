//! Tabular report output
//!
//! The report has one header row and one row per file:
//!
//! | Item | File | Start | End | Duration [s] | Main [dB] | 12.5 Hz | ... | 20 kHz |
//!
//! The band columns hold one level category per sheet. `ReportTable` is the
//! format-independent model; `ReportWriter` renders it into an xlsx workbook.

use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::error::{LevelError, Result};
use crate::models::{LevelCategory, ResultTable};

/// Fixed metadata columns preceding the band columns
pub const METADATA_HEADERS: [&str; 5] = ["Item", "File", "Start", "End", "Duration [s]"];

/// Validated band column labels
#[derive(Debug, Clone)]
pub struct ReportLayout {
    band_labels: Vec<String>,
}

impl ReportLayout {
    /// Create layout; the label count must equal the run's band count
    pub fn new(band_labels: Vec<String>, band_count: usize) -> Result<Self> {
        if band_labels.len() != band_count {
            return Err(LevelError::Configuration(format!(
                "{} band labels configured for {} bands",
                band_labels.len(),
                band_count
            )));
        }
        Ok(Self { band_labels })
    }

    /// Band count covered by the layout
    pub fn band_count(&self) -> usize {
        self.band_labels.len()
    }

    /// Band labels, broadband first
    pub fn band_labels(&self) -> &[String] {
        &self.band_labels
    }

    /// Full header row
    pub fn headers(&self) -> Vec<String> {
        METADATA_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain(self.band_labels.iter().cloned())
            .collect()
    }
}

/// One report cell
#[derive(Debug, Clone, PartialEq)]
pub enum ReportCell {
    Text(String),
    Number(f64),
}

/// Format-independent report for one category
#[derive(Debug, Clone)]
pub struct ReportTable {
    pub category: LevelCategory,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<ReportCell>>,
}

impl ReportTable {
    /// Build the rows for a category from a finished result table
    pub fn build(table: &ResultTable, category: LevelCategory, layout: &ReportLayout) -> Result<Self> {
        if table.band_count() != layout.band_count() {
            return Err(LevelError::Configuration(format!(
                "report layout has {} band columns, result table has {} bands",
                layout.band_count(),
                table.band_count()
            )));
        }

        let levels = table.levels(category);
        let rows = table
            .rows()
            .iter()
            .zip(levels.iter_rows())
            .enumerate()
            .map(|(index, (row, bands))| {
                let d = &row.descriptor;
                let mut cells = Vec::with_capacity(METADATA_HEADERS.len() + bands.len());
                cells.push(ReportCell::Number((index + 1) as f64));
                cells.push(ReportCell::Text(row.identifier.clone()));
                cells.push(ReportCell::Text(d.start_time.clone()));
                cells.push(ReportCell::Text(d.end_time.clone()));
                cells.push(ReportCell::Number(d.duration_seconds));
                cells.extend(bands.iter().map(|v| ReportCell::Number(*v)));
                cells
            })
            .collect();

        Ok(Self {
            category,
            headers: layout.headers(),
            rows,
        })
    }
}

/// Writes result tables into xlsx workbooks
#[derive(Debug, Clone)]
pub struct ReportWriter {
    layout: ReportLayout,
    categories: Vec<LevelCategory>,
}

impl ReportWriter {
    /// Writer producing one sheet per listed category, in order
    pub fn new(layout: ReportLayout, categories: Vec<LevelCategory>) -> Result<Self> {
        if categories.is_empty() {
            return Err(LevelError::Configuration(
                "at least one level category must be reported".to_string(),
            ));
        }
        Ok(Self { layout, categories })
    }

    /// Categories written, one sheet each
    pub fn categories(&self) -> &[LevelCategory] {
        &self.categories
    }

    /// Build the report models for every selected category
    pub fn build(&self, table: &ResultTable) -> Result<Vec<ReportTable>> {
        self.categories
            .iter()
            .map(|category| ReportTable::build(table, *category, &self.layout))
            .collect()
    }

    /// Write the workbook to `path`
    ///
    /// All sheets are built before anything touches the filesystem, so a
    /// layout error leaves no partial file behind.
    pub fn write(&self, table: &ResultTable, path: &Path) -> Result<()> {
        let reports = self.build(table)?;
        let mut workbook = Workbook::new();

        for report in &reports {
            let sheet = workbook.add_worksheet();
            sheet.set_name(report.category.sheet_name())?;

            for (col, header) in report.headers.iter().enumerate() {
                sheet.write_string(0, col as u16, header.as_str())?;
            }

            for (row_index, row) in report.rows.iter().enumerate() {
                let excel_row = (row_index + 1) as u32;
                for (col, cell) in row.iter().enumerate() {
                    match cell {
                        ReportCell::Text(text) => sheet.write_string(excel_row, col as u16, text.as_str())?,
                        ReportCell::Number(value) => sheet.write_number(excel_row, col as u16, *value)?,
                    };
                }
            }
        }

        workbook.save(path)?;

        tracing::info!(
            path = %path.display(),
            sheets = reports.len(),
            rows = table.file_count(),
            "Report written"
        );

        Ok(())
    }
}
