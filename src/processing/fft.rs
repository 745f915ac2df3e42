//! FFT computation using rustfft
//!
//! Magnitude spectrum of a real time-domain buffer for vibration analysis.
//!
//! # Scaling
//!
//! `magnitude[i] = |X[i]| / N` and `frequency[i] = i * sample_rate / N`, where
//! `N` is the transform length after optional zero padding. Only bins below
//! Nyquist are returned; the mirrored upper half is discarded.
//!
//! # Example
//!
//! ```ignore
//! use vibration_health::processing::{apply_window, compute_spectrum, Window};
//!
//! let windowed = apply_window(&samples, Window::Hann);
//! let spectrum = compute_spectrum(&windowed, 2560.0)?;
//! ```

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::sync::Arc;

use super::{FrequencySpectrum, ProcessingError};

// ============================================================================
// Windowing
// ============================================================================

/// Pre-FFT window applied to a time-domain buffer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    #[default]
    Hann,
    /// Rectangular (no windowing)
    None,
}

impl Window {
    /// Mean of the window coefficients for a buffer of length `n`.
    ///
    /// Dividing a windowed spectrum by this restores sinusoid amplitudes.
    pub fn coherent_gain(self, n: usize) -> f64 {
        match self {
            Window::None => 1.0,
            Window::Hann => {
                if n == 0 {
                    return 1.0;
                }
                let sum: f64 = hann_window(n).iter().sum();
                if sum > 0.0 {
                    sum / n as f64
                } else {
                    1.0
                }
            }
        }
    }
}

/// Hann coefficients: `w[i] = 0.5 * (1 - cos(2πi / (N-1)))`.
pub fn hann_window(n: usize) -> Vec<f64> {
    let denom = n.saturating_sub(1).max(1) as f64;
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / denom).cos()))
        .collect()
}

/// Multiply `samples` by the window coefficients.
pub fn apply_window(samples: &[f64], window: Window) -> Vec<f64> {
    match window {
        Window::None => samples.to_vec(),
        Window::Hann => samples
            .iter()
            .zip(hann_window(samples.len()))
            .map(|(&x, w)| x * w)
            .collect(),
    }
}

// ============================================================================
// Standalone FFT Functions
// ============================================================================

/// Compute the one-sided magnitude spectrum of `samples`.
///
/// The transform length is rounded up to the next power of two and the
/// buffer zero-padded; frequency bins are computed for the padded length.
///
/// # Errors
///
/// - [`ProcessingError::InsufficientData`] for an empty buffer
/// - [`ProcessingError::NonFiniteSample`] if any sample is NaN or infinite
/// - [`ProcessingError::InvalidSamplingRate`] for a non-positive or non-finite rate
pub fn compute_spectrum(
    samples: &[f64],
    sample_rate: f64,
) -> Result<FrequencySpectrum, ProcessingError> {
    compute_spectrum_with(samples, sample_rate, true)
}

/// [`compute_spectrum`] with explicit control over zero padding.
pub fn compute_spectrum_with(
    samples: &[f64],
    sample_rate: f64,
    zero_pad: bool,
) -> Result<FrequencySpectrum, ProcessingError> {
    if samples.is_empty() {
        return Err(ProcessingError::InsufficientData {
            needed: 1,
            available: 0,
        });
    }
    if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
        return Err(ProcessingError::NonFiniteSample { index });
    }

    let size = if zero_pad {
        samples.len().next_power_of_two()
    } else {
        samples.len()
    };
    let processor = FftProcessor::new(size, sample_rate)?;
    processor.compute(samples)
}

// ============================================================================
// FFT Processor (Pre-planned for repeated use)
// ============================================================================

/// FFT processor with a pre-planned transform for repeated computation.
///
/// Use this when computing many FFTs of the same size.
pub struct FftProcessor {
    fft: Arc<dyn Fft<f64>>,
    size: usize,
    sampling_rate: f64,
}

impl FftProcessor {
    /// Create a processor for transforms of exactly `size` points.
    pub fn new(size: usize, sampling_rate: f64) -> Result<Self, ProcessingError> {
        if !sampling_rate.is_finite() || sampling_rate <= 0.0 {
            return Err(ProcessingError::InvalidSamplingRate(sampling_rate));
        }
        if size == 0 {
            return Err(ProcessingError::InsufficientData {
                needed: 1,
                available: 0,
            });
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);

        Ok(Self {
            fft,
            size,
            sampling_rate,
        })
    }

    /// Compute the spectrum of `signal`, zero-padding it up to the planned size.
    pub fn compute(&self, signal: &[f64]) -> Result<FrequencySpectrum, ProcessingError> {
        if signal.len() > self.size {
            return Err(ProcessingError::BufferTooLong {
                len: signal.len(),
                size: self.size,
            });
        }

        let mut buffer: Vec<Complex<f64>> = signal
            .iter()
            .map(|&x| Complex::new(x, 0.0))
            .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
            .take(self.size)
            .collect();

        self.fft.process(&mut buffer);

        let n = self.size as f64;
        let n_positive = self.size / 2;

        let frequencies = self.frequency_bins();
        let magnitudes: Vec<f64> = buffer
            .iter()
            .take(n_positive)
            .map(|c| c.norm() / n)
            .collect();

        Ok(FrequencySpectrum {
            frequencies,
            magnitudes,
            sample_rate: self.sampling_rate,
            fft_size: self.size,
        })
    }

    /// Frequency bins below Nyquist for this configuration
    pub fn frequency_bins(&self) -> Vec<f64> {
        let resolution = self.frequency_resolution();
        (0..self.size / 2).map(|i| i as f64 * resolution).collect()
    }

    /// Get the FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the frequency resolution (Hz per bin)
    pub fn frequency_resolution(&self) -> f64 {
        self.sampling_rate / self.size as f64
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, amplitude: f64, sample_rate: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_fft_processor_creation() {
        let processor = FftProcessor::new(1024, 10000.0).expect("processor");
        assert_eq!(processor.size(), 1024);
        assert!((processor.frequency_resolution() - 10000.0 / 1024.0).abs() < 0.001);
        assert_eq!(processor.frequency_bins().len(), 512);
    }

    #[test]
    fn test_invalid_sampling_rate() {
        assert!(matches!(
            FftProcessor::new(8, 0.0),
            Err(ProcessingError::InvalidSamplingRate(_))
        ));
        assert!(matches!(
            compute_spectrum(&[1.0, 2.0], f64::NAN),
            Err(ProcessingError::InvalidSamplingRate(_))
        ));
    }

    #[test]
    fn test_buffer_longer_than_plan_rejected() {
        let processor = FftProcessor::new(8, 1000.0).expect("processor");
        let err = processor.compute(&[0.0; 12]).unwrap_err();
        assert_eq!(err, ProcessingError::BufferTooLong { len: 12, size: 8 });
        assert_eq!(err.to_string(), "Buffer of 12 samples exceeds FFT size 8");
        assert!(processor.compute(&[0.0; 5]).is_ok());
    }

    #[test]
    fn test_empty_and_non_finite_rejected() {
        assert!(matches!(
            compute_spectrum(&[], 1000.0),
            Err(ProcessingError::InsufficientData { .. })
        ));
        assert_eq!(
            compute_spectrum(&[0.0, f64::INFINITY, 1.0], 1000.0),
            Err(ProcessingError::NonFiniteSample { index: 1 })
        );
    }

    #[test]
    fn test_sine_magnitude_scaling() {
        // 100 Hz lands exactly on bin 40 at 2560 Hz / 1024 points
        let samples = sine(100.0, 2.0, 2560.0, 1024);
        let spectrum = compute_spectrum(&samples, 2560.0).expect("FFT failed");

        assert_eq!(spectrum.len(), 512);
        assert!((spectrum.resolution() - 2.5).abs() < 1e-12);
        assert!((spectrum.frequencies[40] - 100.0).abs() < 1e-9);
        // |X|/N of a sinusoid with amplitude A is A/2
        assert!((spectrum.magnitudes[40] - 1.0).abs() < 1e-9);
        assert!(spectrum.magnitudes[10] < 1e-9);
    }

    #[test]
    fn test_zero_padding_recomputes_bins() {
        let samples = sine(50.0, 1.0, 1000.0, 1000);
        let padded = compute_spectrum(&samples, 1000.0).expect("FFT failed");
        assert_eq!(padded.fft_size, 1024);
        assert_eq!(padded.len(), 512);
        assert!((padded.frequencies[1] - 1000.0 / 1024.0).abs() < 1e-12);

        let exact = compute_spectrum_with(&samples, 1000.0, false).expect("FFT failed");
        assert_eq!(exact.fft_size, 1000);
        assert_eq!(exact.len(), 500);
        assert!((exact.frequencies[50] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_hann_window_endpoints() {
        let w = hann_window(64);
        assert!(w[0].abs() < 1e-12);
        assert!(w[63].abs() < 1e-12);
        let mid = w.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!((mid - 1.0).abs() < 0.01);
        assert_eq!(hann_window(1), vec![0.0]);
        assert!(hann_window(0).is_empty());
    }

    #[test]
    fn test_window_none_is_identity() {
        let samples = vec![1.0, -2.0, 3.0];
        assert_eq!(apply_window(&samples, Window::None), samples);
        assert_eq!(Window::None.coherent_gain(3), 1.0);
    }

    #[test]
    fn test_hann_coherent_gain_near_half() {
        let gain = Window::Hann.coherent_gain(4096);
        assert!((gain - 0.5).abs() < 0.001, "gain {gain}");
    }
}
