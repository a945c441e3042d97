//! Frequency-domain low-pass filter for dense scalar series.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Index of the first frequency bin removed for `n` samples.
///
/// Never below 1, so the mean (DC bin) always survives.
pub fn cutoff_bin(n: usize, cutoff_freq: f64, sampling_freq: f64) -> usize {
    let bin = (cutoff_freq * n as f64 / sampling_freq).floor();
    if bin.is_finite() && bin >= 1.0 {
        bin as usize
    } else {
        1
    }
}

/// Removes every frequency component at or above `cutoff_freq` from `samples`.
///
/// The series is transformed forward, every bin `k` with
/// `min(k, n - k) >= cutoff_bin` is zeroed, and the inverse transform (scaled
/// by `1/n`) overwrites `samples` with its real part. Empty input is left
/// untouched. A fresh planner is built per call.
pub fn lowpass_filter(samples: &mut [f64], cutoff_freq: f64, sampling_freq: f64) {
    let n = samples.len();
    if n == 0 {
        return;
    }

    let mut spectrum: Vec<Complex<f64>> =
        samples.iter().map(|&s| Complex::new(s, 0.0)).collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut spectrum);

    let cutoff = cutoff_bin(n, cutoff_freq, sampling_freq);
    for (k, bin) in spectrum.iter_mut().enumerate() {
        if k.min(n - k) >= cutoff {
            *bin = Complex::new(0.0, 0.0);
        }
    }

    let ifft = planner.plan_fft_inverse(n);
    ifft.process(&mut spectrum);

    let scale = 1.0 / n as f64;
    for (sample, bin) in samples.iter_mut().zip(&spectrum) {
        *sample = bin.re * scale;
    }
}
