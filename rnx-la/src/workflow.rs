//! Level aggregation workflow
//!
//! Sequential pipeline over the input files, in discovery order:
//! 1. Parse the export into records
//! 2. Energy-average each category per band
//! 3. Append the descriptor to the result table
//!
//! The first failure aborts the run and names the offending file; the report
//! is only written once every file has been aggregated.

use std::fs::File;
use std::io::BufWriter;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use crate::config::LevelSettings;
use crate::error::{LevelError, Result};
use crate::models::{ResultTable, ResultTableBuilder};
use crate::services::{average_file, FileScanner, RecordParser, ReportLayout, ReportWriter};

/// Level aggregation workflow
#[derive(Debug, Clone)]
pub struct LevelWorkflow {
    parser: RecordParser,
    writer: ReportWriter,
    band_count: usize,
    output: PathBuf,
    json_summary: Option<PathBuf>,
}

impl LevelWorkflow {
    /// Create workflow; the report layout is validated before any file is read
    pub fn new(settings: &LevelSettings) -> Result<Self> {
        let layout = ReportLayout::new(settings.band_labels.clone(), settings.band_count)?;
        let writer = ReportWriter::new(layout, settings.categories.clone())?;

        Ok(Self {
            parser: RecordParser::new().with_band_count(settings.band_count),
            writer,
            band_count: settings.band_count,
            output: settings.output.clone(),
            json_summary: settings.json_summary.clone(),
        })
    }

    /// Input files for a run: the explicit list, or a directory scan
    pub fn discover(settings: &LevelSettings) -> Result<Vec<PathBuf>> {
        if !settings.files.is_empty() {
            debug!(count = settings.files.len(), "Using explicit input files");
            return Ok(settings.files.clone());
        }

        let files = FileScanner::new(&settings.extension)
            .recursive(settings.recursive)
            .scan(&settings.input_dir)?;
        Ok(files)
    }

    /// Aggregate `files` into a result table, one row per file in order
    pub fn run(&self, files: &[PathBuf]) -> Result<ResultTable> {
        let started = Instant::now();
        let mut builder = ResultTableBuilder::new(self.band_count);
        let mut total_records = 0usize;

        let identifiers = file_identifiers(files)?;
        for (path, identifier) in files.iter().zip(&identifiers) {
            let parsed = self.parser.parse_file_as(path, identifier)?;

            let descriptor = average_file(&parsed)?;
            total_records += descriptor.record_count;
            builder.push(parsed.identifier, descriptor)?;
        }

        let table = builder.finish();
        info!(
            files = table.file_count(),
            bands = table.band_count(),
            records = total_records,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Level aggregation complete"
        );

        Ok(table)
    }

    /// Aggregate `files`, then write the workbook and the optional JSON summary
    pub fn run_and_report(&self, files: &[PathBuf]) -> Result<ResultTable> {
        let table = self.run(files)?;
        self.writer.write(&table, &self.output)?;

        if let Some(path) = &self.json_summary {
            write_json_summary(&table, path)?;
        }

        Ok(table)
    }

    /// Workbook path
    pub fn output(&self) -> &Path {
        &self.output
    }
}

/// Report identifiers for a run's input files
///
/// Each identifier is the path relative to the deepest directory shared by
/// all inputs, with `/` separators: files in one folder are named by file
/// name, files from a recursive scan keep their subdirectory
/// (`day1/site.csv`). Listing the same path twice is a configuration error.
pub fn file_identifiers(files: &[PathBuf]) -> Result<Vec<String>> {
    let parents: Vec<Vec<Component>> = files
        .iter()
        .map(|f| f.parent().map(|p| p.components().collect()).unwrap_or_default())
        .collect();

    let shared = match parents.split_first() {
        Some((first, rest)) => rest.iter().fold(first.len(), |len, other| {
            first
                .iter()
                .zip(other)
                .take(len)
                .take_while(|(a, b)| a == b)
                .count()
        }),
        None => 0,
    };

    let mut seen = HashSet::new();
    files
        .iter()
        .map(|path| {
            let identifier = path
                .components()
                .skip(shared)
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if !seen.insert(identifier.clone()) {
                return Err(LevelError::Configuration(format!(
                    "input file listed more than once: {}",
                    path.display()
                )));
            }
            Ok(identifier)
        })
        .collect()
}

/// Serialize the per-file rows as pretty JSON
pub fn write_json_summary(table: &ResultTable, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| LevelError::io(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), table.rows())
        .map_err(|e| LevelError::Report(format!("JSON summary {}: {}", path.display(), e)))?;

    info!(path = %path.display(), rows = table.file_count(), "JSON summary written");
    Ok(())
}
