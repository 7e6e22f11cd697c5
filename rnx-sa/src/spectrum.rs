//! Single-sided amplitude spectrum

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::sampling::SamplingParameters;

/// Frequency axis and peak amplitudes, both of length `N / 2`
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub frequencies: Vec<f64>,
    pub amplitudes: Vec<f64>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// Index and amplitude of the largest bin
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.amplitudes
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (index, value)| match best {
                Some((_, max)) if max >= value => best,
                _ => Some((index, value)),
            })
    }
}

/// Compute the spectrum of `samples`
///
/// `Yf[k] = 2/N * |FFT(x)[k]|` for `k < N/2`. The frequency axis spans
/// `0 ..= 1/(2 dt)` in `N/2` evenly spaced points.
pub fn compute_spectrum(samples: &[f64], params: &SamplingParameters) -> Spectrum {
    let n = samples.len();
    let half = n / 2;

    let mut buffer: Vec<Complex<f64>> = samples.iter().map(|&x| Complex::new(x, 0.0)).collect();
    if n > 0 {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(n);
        fft.process(&mut buffer);
    }

    let scale = if n > 0 { 2.0 / n as f64 } else { 0.0 };
    let amplitudes = buffer[..half].iter().map(|c| scale * c.norm()).collect();
    let frequencies = linspace(0.0, 1.0 / (2.0 * params.dt), half);

    Spectrum {
        frequencies,
        amplitudes,
    }
}

/// `num` evenly spaced values from `start` to `stop`, both ends included
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            values[num - 1] = stop;
            values
        }
    }
}
