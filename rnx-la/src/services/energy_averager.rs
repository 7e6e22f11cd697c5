//! Per-file energy averaging
//!
//! Each band of each level category is averaged independently in the linear
//! power domain (see `rnx_common::decibel`). Metadata is taken literally from
//! the export:
//! - start/end time are the first and last timestamps in file order
//! - duration is the number of `Address` rows, reported as seconds

use rnx_common::decibel::energy_average_bands;

use crate::error::{LevelError, MalformedKind, Result};
use crate::models::{FileDescriptor, LevelCategory, MeasurementFile};

/// Compute the descriptor of one parsed file
///
/// Fails with `EmptyFile` naming the first category (Leq, Lmax, Lmin order)
/// that has no records, and with `MalformedInput` when a record's band
/// vectors differ in length from the first record's Leq vector.
pub fn average_file(file: &MeasurementFile) -> Result<FileDescriptor> {
    let (first, last) = match (file.records.first(), file.records.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(LevelError::EmptyFile {
                file: file.identifier.clone(),
                category: LevelCategory::Leq,
            })
        }
    };

    let band_count = first.band_count();
    for (index, record) in file.records.iter().enumerate() {
        for category in LevelCategory::ALL {
            let actual = record.levels(category).len();
            if actual != band_count {
                return Err(LevelError::malformed(
                    file.identifier.clone(),
                    MalformedKind::BandCount {
                        category,
                        record: index + 1,
                        expected: band_count,
                        actual,
                    },
                ));
            }
        }
    }

    let average = |category: LevelCategory| -> Result<Vec<f64>> {
        energy_average_bands(file.records.iter().map(|r| r.levels(category)), band_count).ok_or_else(
            || LevelError::EmptyFile {
                file: file.identifier.clone(),
                category,
            },
        )
    };

    let descriptor = FileDescriptor {
        start_time: first.timestamp.clone(),
        end_time: last.timestamp.clone(),
        duration_seconds: file.marker_rows as f64,
        record_count: file.record_count(),
        leq_bands: average(LevelCategory::Leq)?,
        lmax_bands: average(LevelCategory::Lmax)?,
        lmin_bands: average(LevelCategory::Lmin)?,
    };

    tracing::info!(
        file = %file.identifier,
        records = descriptor.record_count,
        start = %descriptor.start_time,
        end = %descriptor.end_time,
        duration_s = descriptor.duration_seconds,
        leq_main = ?descriptor.leq_bands.first(),
        lmax_main = ?descriptor.lmax_bands.first(),
        lmin_main = ?descriptor.lmin_bands.first(),
        "File descriptors computed"
    );

    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;

    const EPSILON: f64 = 1e-9;

    fn record(time: &str, leq: Vec<f64>) -> Record {
        Record {
            timestamp: time.to_string(),
            lmax: leq.iter().map(|v| v + 10.0).collect(),
            lmin: leq.iter().map(|v| v - 10.0).collect(),
            leq,
        }
    }

    fn file(records: Vec<Record>, marker_rows: usize) -> MeasurementFile {
        MeasurementFile {
            identifier: "site.csv".to_string(),
            records,
            marker_rows,
            ignored_rows: 0,
        }
    }

    #[test]
    fn test_two_record_average() {
        let f = file(
            vec![record("t0", vec![60.0, 40.0]), record("t1", vec![63.0, 40.0])],
            2,
        );
        let d = average_file(&f).unwrap();

        let expected = 10.0 * (0.5 * (1e6 + 10f64.powf(6.3))).log10();
        assert!((d.leq_bands[0] - expected).abs() < EPSILON);
        assert!((d.leq_bands[0] - 61.76).abs() < 0.01);
        assert!((d.leq_bands[1] - 40.0).abs() < EPSILON);
        assert!((d.lmax_bands[1] - 50.0).abs() < EPSILON);
        assert!((d.lmin_bands[1] - 30.0).abs() < EPSILON);
    }

    #[test]
    fn test_uniform_records_are_idempotent() {
        let records = (0..25).map(|i| record(&format!("t{}", i), vec![55.5; 34])).collect();
        let d = average_file(&file(records, 25)).unwrap();
        for band in 0..34 {
            assert!((d.leq_bands[band] - 55.5).abs() < EPSILON);
            assert!((d.lmax_bands[band] - 65.5).abs() < EPSILON);
            assert!((d.lmin_bands[band] - 45.5).abs() < EPSILON);
        }
    }

    #[test]
    fn test_record_order_invariance() {
        let levels = [48.2, 71.9, 55.0, 62.4, 39.7, 80.1];
        let forward: Vec<Record> = levels.iter().map(|v| record("t", vec![*v, v - 3.0])).collect();
        let mut reversed = forward.clone();
        reversed.reverse();
        let mut rotated = forward.clone();
        rotated.rotate_left(2);

        let a = average_file(&file(forward, 6)).unwrap();
        let b = average_file(&file(reversed, 6)).unwrap();
        let c = average_file(&file(rotated, 6)).unwrap();
        for band in 0..2 {
            assert!((a.leq_bands[band] - b.leq_bands[band]).abs() < 1e-9);
            assert!((a.leq_bands[band] - c.leq_bands[band]).abs() < 1e-9);
            assert!((a.lmin_bands[band] - c.lmin_bands[band]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_positional_start_and_end() {
        // Out-of-order timestamps are reported positionally, not sorted
        let f = file(
            vec![
                record("10:00:05", vec![50.0]),
                record("10:00:01", vec![50.0]),
                record("10:00:03", vec![50.0]),
            ],
            3,
        );
        let d = average_file(&f).unwrap();
        assert_eq!(d.start_time, "10:00:05");
        assert_eq!(d.end_time, "10:00:03");
        assert_eq!(d.record_count, 3);
    }

    #[test]
    fn test_duration_is_marker_row_count() {
        let f = file(vec![record("t0", vec![50.0]), record("t1", vec![50.0])], 7);
        let d = average_file(&f).unwrap();
        assert_eq!(d.duration_seconds, 7.0);
    }

    #[test]
    fn test_ragged_record_is_malformed() {
        let records = vec![
            record("t0", vec![60.0, 60.0]),
            Record {
                timestamp: "t1".to_string(),
                leq: vec![60.0, 60.0],
                lmax: vec![70.0],
                lmin: vec![50.0, 50.0],
            },
        ];
        match average_file(&file(records, 2)).unwrap_err() {
            LevelError::MalformedInput { file, kind } => {
                assert_eq!(file, "site.csv");
                assert_eq!(
                    kind,
                    MalformedKind::BandCount {
                        category: LevelCategory::Lmax,
                        record: 2,
                        expected: 2,
                        actual: 1,
                    }
                );
            }
            other => panic!("Expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file() {
        match average_file(&file(Vec::new(), 3)).unwrap_err() {
            LevelError::EmptyFile { file, category } => {
                assert_eq!(file, "site.csv");
                assert_eq!(category, LevelCategory::Leq);
            }
            other => panic!("Expected EmptyFile, got {:?}", other),
        }
    }
}
