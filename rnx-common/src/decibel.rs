//! Decibel conversions and energy averaging
//!
//! Sound and vibration levels are logarithms of a power quantity. Averages
//! are taken in the linear power domain and converted back:
//!
//! ```text
//! L_avg = 10 * log10( (1/R) * Σ 10^(L_r / 10) )
//! ```
//!
//! Arithmetic means of decibel values are never used.

/// Convert a level in dB to a linear power ratio: 10^(L/10)
#[inline]
pub fn db_to_power(level_db: f64) -> f64 {
    10f64.powf(level_db / 10.0)
}

/// Convert a linear power ratio to a level in dB: 10 * log10(p)
///
/// Returns `-inf` for a zero ratio, matching the logarithm.
#[inline]
pub fn power_to_db(power: f64) -> f64 {
    10.0 * power.log10()
}

/// Energy average of a sequence of levels in dB
///
/// Returns `None` for an empty sequence (the average is undefined).
pub fn energy_average<I>(levels: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut count = 0usize;
    let mut power_sum = 0.0f64;

    for level in levels {
        power_sum += db_to_power(level);
        count += 1;
    }

    if count == 0 {
        return None;
    }

    Some(power_to_db(power_sum / count as f64))
}

/// Per-band energy average over a set of equally sized band vectors
///
/// `rows` yields one band vector per record. Returns `None` when there are
/// no rows or when a row's length differs from `band_count`.
pub fn energy_average_bands<'a, I>(rows: I, band_count: usize) -> Option<Vec<f64>>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut power_sums = vec![0.0f64; band_count];
    let mut count = 0usize;

    for row in rows {
        if row.len() != band_count {
            return None;
        }
        for (sum, level) in power_sums.iter_mut().zip(row) {
            *sum += db_to_power(*level);
        }
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let scale = 1.0 / count as f64;
    Some(power_sums.into_iter().map(|sum| power_to_db(sum * scale)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_round_trip_conversion() {
        for level in [-20.0, 0.0, 35.5, 94.0, 120.0] {
            let back = power_to_db(db_to_power(level));
            assert!((back - level).abs() < EPSILON, "{} -> {}", level, back);
        }
    }

    #[test]
    fn test_known_values() {
        assert!((db_to_power(0.0) - 1.0).abs() < EPSILON);
        assert!((db_to_power(10.0) - 10.0).abs() < EPSILON);
        assert!((db_to_power(30.0) - 1000.0).abs() < 1e-6);
        assert!(power_to_db(0.0).is_infinite());
    }

    #[test]
    fn test_energy_average_two_levels() {
        // 10*log10(0.5*(10^6 + 10^6.3)) = 61.764...
        let avg = energy_average([60.0, 63.0]).unwrap();
        assert!((avg - 61.764).abs() < 1e-3, "got {}", avg);
    }

    #[test]
    fn test_energy_average_is_not_arithmetic_mean() {
        let avg = energy_average([40.0, 80.0]).unwrap();
        // Dominated by the louder level, far above the 60 dB arithmetic mean
        assert!(avg > 76.9 && avg < 77.1, "got {}", avg);
    }

    #[test]
    fn test_energy_average_uniform_input() {
        let avg = energy_average(std::iter::repeat(72.3).take(50)).unwrap();
        assert!((avg - 72.3).abs() < EPSILON);
    }

    #[test]
    fn test_energy_average_empty() {
        assert_eq!(energy_average(std::iter::empty()), None);
    }

    #[test]
    fn test_energy_average_bands() {
        let rows: Vec<Vec<f64>> = vec![vec![60.0, 50.0, 30.0], vec![63.0, 50.0, 30.0]];
        let avg = energy_average_bands(rows.iter().map(|r| r.as_slice()), 3).unwrap();
        assert_eq!(avg.len(), 3);
        assert!((avg[0] - 61.764).abs() < 1e-3);
        assert!((avg[1] - 50.0).abs() < EPSILON);
        assert!((avg[2] - 30.0).abs() < EPSILON);
    }

    #[test]
    fn test_energy_average_bands_empty() {
        let rows: Vec<Vec<f64>> = Vec::new();
        assert!(energy_average_bands(rows.iter().map(|r| r.as_slice()), 34).is_none());
    }

    #[test]
    fn test_energy_average_bands_length_mismatch() {
        let rows: Vec<Vec<f64>> = vec![vec![60.0, 50.0, 30.0], vec![60.0, 50.0]];
        assert!(energy_average_bands(rows.iter().map(|r| r.as_slice()), 3).is_none());
    }
}
