//! Signal processing - unit conversion, FFT and peak extraction for vibration analysis

mod axis;
mod fft;
mod peaks;
mod units;

pub use axis::{analyze_axis, AxisAnalysis};
pub use fft::*;
pub use peaks::{find_top_peaks, find_top_peaks_above, TopPeaks};
pub use units::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::SpectrumPoint;

/// Errors in signal processing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessingError {
    #[error("Insufficient data: need {needed}, have {available}")]
    InsufficientData { needed: usize, available: usize },

    #[error("Buffer of {len} samples exceeds FFT size {size}")]
    BufferTooLong { len: usize, size: usize },

    #[error("Non-finite sample at index {index}")]
    NonFiniteSample { index: usize },

    #[error("Invalid sampling rate: {0}")]
    InvalidSamplingRate(f64),
}

/// One-sided frequency spectrum (DC up to, not including, Nyquist).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrequencySpectrum {
    /// Frequency bins (Hz)
    pub frequencies: Vec<f64>,
    /// Magnitude at each frequency
    pub magnitudes: Vec<f64>,
    /// Sample rate used
    pub sample_rate: f64,
    /// Transform length after any zero padding
    pub fft_size: usize,
}

impl FrequencySpectrum {
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Width of one bin (Hz)
    pub fn resolution(&self) -> f64 {
        if self.fft_size == 0 {
            0.0
        } else {
            self.sample_rate / self.fft_size as f64
        }
    }

    pub fn points(&self) -> impl Iterator<Item = SpectrumPoint> + '_ {
        self.frequencies
            .iter()
            .zip(self.magnitudes.iter())
            .map(|(&frequency, &magnitude)| SpectrumPoint {
                frequency,
                magnitude,
            })
    }
}
