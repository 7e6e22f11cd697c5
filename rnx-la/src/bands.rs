//! One-third-octave band layout of the sound level meter exports
//!
//! Each level row carries the broadband ("Main") value followed by the 33
//! one-third-octave bands from 12.5 Hz to 20 kHz.

/// Broadband value + 33 one-third-octave bands
pub const DEFAULT_BAND_COUNT: usize = 34;

/// Report column labels, broadband first then ascending center frequency
pub const DEFAULT_BAND_LABELS: [&str; DEFAULT_BAND_COUNT] = [
    "Main [dB]", "12.5 Hz", "16 Hz", "20 Hz", "25 Hz", "31.5 Hz", "40 Hz", "50 Hz", "63 Hz",
    "80 Hz", "100 Hz", "125 Hz", "160 Hz", "200 Hz", "250 Hz", "315 Hz", "400 Hz", "500 Hz",
    "630 Hz", "800 Hz", "1 kHz", "1.25 kHz", "1.6 kHz", "2 kHz", "2.5 kHz", "3.15 kHz", "4 kHz",
    "5 kHz", "6.3 kHz", "8 kHz", "10 kHz", "12.5 kHz", "16 kHz", "20 kHz",
];

/// Default labels as owned strings
pub fn default_band_labels() -> Vec<String> {
    DEFAULT_BAND_LABELS.iter().map(|s| s.to_string()).collect()
}
