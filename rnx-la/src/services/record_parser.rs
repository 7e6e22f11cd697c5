//! Record parser for sound level meter exports
//!
//! Export rows are comma separated and identified by a marker token:
//!
//! ```text
//! Address,1,
//! Start Time,2016/04/01 10:00:00,
//! Leq,62.1,45.3,...,58.0,
//! Lmax,70.4,52.8,...,64.2,
//! Lmin,55.0,39.9,...,50.1,
//! ```
//!
//! Records are not delimited in the file. The k-th `Start Time`, `Leq`, `Lmax`
//! and `Lmin` rows together form record k; the parser zips them after the pass
//! and rejects files whose row counts disagree. Level rows carry the band
//! values between the marker and the final (empty) field.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{LevelError, MalformedKind, Result};
use crate::models::{LevelCategory, MeasurementFile, Record};

const ADDRESS_MARKER: &str = "Address";
const START_TIME_MARKER: &str = "Start Time";

/// Classification of one export row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Record address row, counted toward the duration
    Address,
    /// Record start timestamp in the second field
    StartTime,
    /// Band levels for one category
    Level(LevelCategory),
    /// Header, metadata or blank row; ignored
    Unrecognized,
}

/// Classify a row by the first field that matches a marker token
pub fn classify_row(fields: &[&str]) -> RowKind {
    for field in fields {
        match field.trim() {
            ADDRESS_MARKER => return RowKind::Address,
            START_TIME_MARKER => return RowKind::StartTime,
            "Leq" => return RowKind::Level(LevelCategory::Leq),
            "Lmax" => return RowKind::Level(LevelCategory::Lmax),
            "Lmin" => return RowKind::Level(LevelCategory::Lmin),
            _ => {}
        }
    }
    RowKind::Unrecognized
}

/// Per-category accumulators filled during the single pass over a file
#[derive(Debug, Default)]
struct Accumulators {
    timestamps: Vec<String>,
    leq: Vec<Vec<f64>>,
    lmax: Vec<Vec<f64>>,
    lmin: Vec<Vec<f64>>,
    marker_rows: usize,
    ignored_rows: usize,
}

impl Accumulators {
    fn level_rows(&self, category: LevelCategory) -> usize {
        match category {
            LevelCategory::Leq => self.leq.len(),
            LevelCategory::Lmax => self.lmax.len(),
            LevelCategory::Lmin => self.lmin.len(),
        }
    }

    fn levels_mut(&mut self, category: LevelCategory) -> &mut Vec<Vec<f64>> {
        match category {
            LevelCategory::Leq => &mut self.leq,
            LevelCategory::Lmax => &mut self.lmax,
            LevelCategory::Lmin => &mut self.lmin,
        }
    }
}

/// Record parser
///
/// The band count is either fixed up front (`with_band_count`) or taken from
/// the first level row of each file.
#[derive(Debug, Clone, Default)]
pub struct RecordParser {
    band_count: Option<usize>,
}

impl RecordParser {
    /// Create parser that infers the band count per file
    pub fn new() -> Self {
        Self { band_count: None }
    }

    /// Require every level row to carry exactly `band_count` values
    pub fn with_band_count(mut self, band_count: usize) -> Self {
        self.band_count = Some(band_count);
        self
    }

    /// Parse one export file; the identifier is the file name
    pub fn parse_file(&self, path: &Path) -> Result<MeasurementFile> {
        let identifier = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        self.parse_file_as(path, &identifier)
    }

    /// Parse one export file under a caller-chosen identifier
    ///
    /// The file is closed before returning, on success and on failure.
    pub fn parse_file_as(&self, path: &Path, identifier: &str) -> Result<MeasurementFile> {
        let file = File::open(path).map_err(|e| LevelError::io(path, e))?;
        self.parse_reader(identifier, BufReader::new(file))
            .map_err(|e| match e {
                LevelError::Io { source, .. } => LevelError::io(path, source),
                other => other,
            })
    }

    /// Parse an export from any buffered reader
    ///
    /// Lines are decoded lossily so stray non-UTF-8 bytes in meter metadata
    /// rows do not abort the parse.
    pub fn parse_reader<R: BufRead>(&self, identifier: &str, mut reader: R) -> Result<MeasurementFile> {
        let mut acc = Accumulators::default();
        let mut band_count = self.band_count;
        let mut buf = Vec::new();
        let mut line_number = 0usize;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| LevelError::io(identifier, e))?;
            if read == 0 {
                break;
            }
            line_number += 1;

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(&['\n', '\r'][..]);
            let fields: Vec<&str> = line.split(',').collect();

            match classify_row(&fields) {
                RowKind::Address => acc.marker_rows += 1,
                RowKind::StartTime => {
                    let timestamp = fields
                        .get(1)
                        .map(|t| t.trim())
                        .filter(|t| !t.is_empty())
                        .ok_or_else(|| {
                            LevelError::malformed(
                                identifier,
                                MalformedKind::MissingTimestamp { line: line_number },
                            )
                        })?;
                    acc.timestamps.push(timestamp.to_string());
                }
                RowKind::Level(category) => {
                    let record = acc.levels_mut(category).len() + 1;
                    let values = parse_level_values(identifier, category, record, &fields)?;

                    let expected = *band_count.get_or_insert(values.len());
                    if values.len() != expected {
                        return Err(LevelError::malformed(
                            identifier,
                            MalformedKind::BandCount {
                                category,
                                record,
                                expected,
                                actual: values.len(),
                            },
                        ));
                    }

                    acc.levels_mut(category).push(values);
                }
                RowKind::Unrecognized => {
                    acc.ignored_rows += 1;
                    tracing::trace!(file = identifier, line = line_number, "Ignoring unrecognized row");
                }
            }
        }

        let file = assemble(identifier, acc)?;

        tracing::debug!(
            file = identifier,
            records = file.record_count(),
            marker_rows = file.marker_rows,
            ignored_rows = file.ignored_rows,
            "Parsed measurement file"
        );

        Ok(file)
    }
}

/// Parse the band values of a level row: every field between the marker
/// and the final field
fn parse_level_values(
    identifier: &str,
    category: LevelCategory,
    record: usize,
    fields: &[&str],
) -> Result<Vec<f64>> {
    let band_fields = if fields.len() >= 2 {
        &fields[1..fields.len() - 1]
    } else {
        &[][..]
    };

    if band_fields.is_empty() {
        return Err(LevelError::malformed(
            identifier,
            MalformedKind::EmptyLevelRow { category, record },
        ));
    }

    band_fields
        .iter()
        .enumerate()
        .map(|(field, token)| {
            token.trim().parse::<f64>().map_err(|_| {
                LevelError::malformed(
                    identifier,
                    MalformedKind::InvalidNumber {
                        category,
                        record,
                        field,
                        token: token.to_string(),
                    },
                )
            })
        })
        .collect()
}

/// Zip the accumulators into explicit records
///
/// A category with no rows while others have some is reported as an empty
/// category rather than as misalignment.
fn assemble(identifier: &str, acc: Accumulators) -> Result<MeasurementFile> {
    let count = acc.timestamps.len();
    let any_levels = !(acc.leq.is_empty() && acc.lmax.is_empty() && acc.lmin.is_empty());
    if count > 0 || any_levels {
        if let Some(category) = LevelCategory::ALL
            .into_iter()
            .find(|c| acc.level_rows(*c) == 0)
        {
            return Err(LevelError::EmptyFile {
                file: identifier.to_string(),
                category,
            });
        }
    }

    if acc.leq.len() != count || acc.lmax.len() != count || acc.lmin.len() != count {
        return Err(LevelError::malformed(
            identifier,
            MalformedKind::Misaligned {
                timestamps: count,
                leq: acc.leq.len(),
                lmax: acc.lmax.len(),
                lmin: acc.lmin.len(),
            },
        ));
    }

    let records = acc
        .timestamps
        .into_iter()
        .zip(acc.leq)
        .zip(acc.lmax)
        .zip(acc.lmin)
        .map(|(((timestamp, leq), lmax), lmin)| Record {
            timestamp,
            leq,
            lmax,
            lmin,
        })
        .collect();

    Ok(MeasurementFile {
        identifier: identifier.to_string(),
        records,
        marker_rows: acc.marker_rows,
        ignored_rows: acc.ignored_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_row(marker: &str, values: &[f64]) -> String {
        let joined: Vec<String> = values.iter().map(|v| format!("{:.1}", v)).collect();
        format!("{},{},\n", marker, joined.join(","))
    }

    fn record_block(address: usize, time: &str, bands: usize, value: f64) -> String {
        let values = vec![value; bands];
        format!(
            "Address,{},\nStart Time,{},\n{}{}{}",
            address,
            time,
            level_row("Leq", &values),
            level_row("Lmax", &values),
            level_row("Lmin", &values)
        )
    }

    fn parse(content: &str) -> Result<MeasurementFile> {
        RecordParser::new().parse_reader("test.csv", content.as_bytes())
    }

    #[test]
    fn test_classify_rows() {
        assert_eq!(classify_row(&["Address", "1", ""]), RowKind::Address);
        assert_eq!(classify_row(&["Start Time", "2016/04/01 10:00:00"]), RowKind::StartTime);
        assert_eq!(classify_row(&["Leq", "60.0", ""]), RowKind::Level(LevelCategory::Leq));
        assert_eq!(classify_row(&["Lmax", "60.0", ""]), RowKind::Level(LevelCategory::Lmax));
        assert_eq!(classify_row(&["Lmin", "60.0", ""]), RowKind::Level(LevelCategory::Lmin));
        assert_eq!(classify_row(&["Model", "NL-52"]), RowKind::Unrecognized);
        assert_eq!(classify_row(&[""]), RowKind::Unrecognized);
        // Marker tokens match whole fields only
        assert_eq!(classify_row(&["Leq,A"]), RowKind::Unrecognized);
        assert_eq!(classify_row(&["LeqT", "1"]), RowKind::Unrecognized);
    }

    #[test]
    fn test_parse_two_records() {
        let content = format!(
            "Model,NL-52,\n{}{}",
            record_block(1, "2016/04/01 10:00:00", 4, 60.0),
            record_block(2, "2016/04/01 10:00:01", 4, 63.0)
        );
        let file = parse(&content).unwrap();

        assert_eq!(file.identifier, "test.csv");
        assert_eq!(file.record_count(), 2);
        assert_eq!(file.marker_rows, 2);
        assert_eq!(file.ignored_rows, 1);
        assert_eq!(file.records[0].timestamp, "2016/04/01 10:00:00");
        assert_eq!(file.records[1].leq, vec![63.0; 4]);
        assert_eq!(file.records[1].band_count(), 4);
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = record_block(1, "10:00:00", 3, 50.0).replace('\n', "\r\n");
        let file = parse(&content).unwrap();
        assert_eq!(file.records[0].timestamp, "10:00:00");
        assert_eq!(file.records[0].lmin, vec![50.0; 3]);
    }

    #[test]
    fn test_band_count_inferred_from_first_row() {
        let content = format!(
            "Start Time,t0,\n{}{}{}",
            level_row("Leq", &[60.0, 61.0, 62.0]),
            level_row("Lmax", &[70.0, 71.0]),
            level_row("Lmin", &[50.0, 51.0, 52.0])
        );
        match parse(&content).unwrap_err() {
            LevelError::MalformedInput { kind, .. } => assert_eq!(
                kind,
                MalformedKind::BandCount {
                    category: LevelCategory::Lmax,
                    record: 1,
                    expected: 3,
                    actual: 2,
                }
            ),
            other => panic!("Expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_configured_band_count_enforced() {
        let content = record_block(1, "t0", 30, 60.0);
        let err = RecordParser::new()
            .with_band_count(34)
            .parse_reader("short.csv", content.as_bytes())
            .unwrap_err();
        match err {
            LevelError::MalformedInput { file, kind } => {
                assert_eq!(file, "short.csv");
                assert_eq!(
                    kind,
                    MalformedKind::BandCount {
                        category: LevelCategory::Leq,
                        record: 1,
                        expected: 34,
                        actual: 30,
                    }
                );
            }
            other => panic!("Expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_number() {
        let content = "Start Time,t0,\nLeq,60.0,abc,\n";
        match parse(content).unwrap_err() {
            LevelError::MalformedInput { kind, .. } => assert_eq!(
                kind,
                MalformedKind::InvalidNumber {
                    category: LevelCategory::Leq,
                    record: 1,
                    field: 1,
                    token: "abc".to_string(),
                }
            ),
            other => panic!("Expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_level_row() {
        match parse("Leq\n").unwrap_err() {
            LevelError::MalformedInput { kind, .. } => assert_eq!(
                kind,
                MalformedKind::EmptyLevelRow {
                    category: LevelCategory::Leq,
                    record: 1,
                }
            ),
            other => panic!("Expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_timestamp() {
        match parse("Model,NL-52,\nStart Time\n").unwrap_err() {
            LevelError::MalformedInput { kind, .. } => {
                assert_eq!(kind, MalformedKind::MissingTimestamp { line: 2 })
            }
            other => panic!("Expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_misaligned_accumulators() {
        let mut content = record_block(1, "t0", 2, 60.0);
        content.push_str("Start Time,t1,\n");
        content.push_str(&level_row("Leq", &[61.0, 61.0]));

        match parse(&content).unwrap_err() {
            LevelError::MalformedInput { kind, .. } => assert_eq!(
                kind,
                MalformedKind::Misaligned {
                    timestamps: 2,
                    leq: 2,
                    lmax: 1,
                    lmin: 1,
                }
            ),
            other => panic!("Expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_leq_rows() {
        let content = "Address,1,\nStart Time,t0,\nLmax,70.0,70.0,\nLmin,50.0,50.0,\n";
        match parse(content).unwrap_err() {
            LevelError::EmptyFile { file, category } => {
                assert_eq!(file, "test.csv");
                assert_eq!(category, LevelCategory::Leq);
            }
            other => panic!("Expected EmptyFile, got {:?}", other),
        }
    }

    #[test]
    fn test_no_records() {
        let file = parse("Model,NL-52,\nAddress,1,\n\n").unwrap();
        assert_eq!(file.record_count(), 0);
        assert_eq!(file.marker_rows, 1);
        assert_eq!(file.ignored_rows, 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RecordParser::new()
            .parse_file(Path::new("/nonexistent/export.csv"))
            .unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
    }
}
