//! Raw ADC buffer → spectra → peaks → [`AxisStats`] for one axis.
//!
//! This is the only place a window is applied before peak search, so every
//! caller gets the same policy (`[spectrum] window` in the engine config).

use serde::Serialize;
use statrs::statistics::Statistics;
use tracing::{debug, warn};

use super::{
    apply_window, compute_spectrum_with, counts_to_g, find_top_peaks, find_top_peaks_above,
    g_to_si, integrate_to_velocity, FrequencySpectrum, ProcessingError, TopPeaks, Window,
};
use crate::config::EngineConfig;
use crate::types::{Axis, AxisConfig, AxisStats, RawAxisSample};

/// A local maximum needs a neighbour on each side.
const MIN_SPECTRUM_BINS: usize = 3;

/// Full analysis of one axis, kept for display alongside the governing stats.
#[derive(Debug, Clone, Serialize)]
pub struct AxisAnalysis {
    pub axis: Option<Axis>,
    pub stats: AxisStats,
    /// Acceleration spectrum (g)
    pub accel_spectrum: Option<FrequencySpectrum>,
    pub accel_peaks: TopPeaks,
    /// Velocity spectrum (mm/s)
    pub velocity_spectrum: Option<FrequencySpectrum>,
    pub velocity_peaks: TopPeaks,
    /// Why the axis produced no data, if it did not
    pub no_data_reason: Option<String>,
}

impl AxisAnalysis {
    fn no_data(axis: Option<Axis>, reason: &ProcessingError) -> Self {
        Self {
            axis,
            stats: AxisStats::no_data(),
            accel_spectrum: None,
            accel_peaks: TopPeaks::default(),
            velocity_spectrum: None,
            velocity_peaks: TopPeaks::default(),
            no_data_reason: Some(reason.to_string()),
        }
    }
}

/// Analyse one raw axis buffer.
///
/// Never fails: empty, non-finite or too-short input yields the explicit
/// "no data" result (`stats.has_data == false`).
pub fn analyze_axis(
    sample: &RawAxisSample,
    calibration: &AxisConfig,
    config: &EngineConfig,
) -> AxisAnalysis {
    match try_analyze_axis(sample, calibration, config) {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!(axis = ?sample.axis, error = %e, "Axis produced no data");
            AxisAnalysis::no_data(sample.axis, &e)
        }
    }
}

fn try_analyze_axis(
    sample: &RawAxisSample,
    calibration: &AxisConfig,
    config: &EngineConfig,
) -> Result<AxisAnalysis, ProcessingError> {
    if sample.is_empty() {
        return Err(ProcessingError::InsufficientData {
            needed: calibration.lor(),
            available: 0,
        });
    }
    if sample.len() != calibration.lor() {
        debug!(
            axis = ?sample.axis,
            samples = sample.len(),
            lor = calibration.lor(),
            "Buffer length differs from configured LOR"
        );
    }

    let spectrum_cfg = &config.spectrum;
    let sample_rate = calibration.sample_rate(config.acquisition.sample_rate_factor);
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(ProcessingError::InvalidSamplingRate(sample_rate));
    }

    // Acceleration path (g)
    let accel_g = counts_to_g(&sample.counts, calibration.g_scale());
    let accel_spectrum = windowed_spectrum(
        &remove_mean(&accel_g),
        sample_rate,
        spectrum_cfg.window,
        spectrum_cfg.zero_pad,
    )?;
    if accel_spectrum.len() < MIN_SPECTRUM_BINS {
        return Err(ProcessingError::InsufficientData {
            needed: MIN_SPECTRUM_BINS,
            available: accel_spectrum.len(),
        });
    }
    let accel_peaks = find_top_peaks(
        &accel_spectrum.magnitudes,
        &accel_spectrum.frequencies,
        spectrum_cfg.top_peaks,
    );

    // Velocity path (mm/s²  → mm/s), DC removed before and after integration
    let accel_si: Vec<f64> = accel_g.iter().map(|&g| g_to_si(g)).collect();
    let velocity = remove_mean(&integrate_to_velocity(
        &remove_mean(&accel_si),
        1.0 / sample_rate,
    ));
    let velocity_overall_rms = velocity.iter().quadratic_mean();
    let velocity_spectrum = windowed_spectrum(
        &velocity,
        sample_rate,
        spectrum_cfg.window,
        spectrum_cfg.zero_pad,
    )?;
    let velocity_peaks = find_top_peaks_above(
        &velocity_spectrum.magnitudes,
        &velocity_spectrum.frequencies,
        spectrum_cfg.top_peaks,
        spectrum_cfg.velocity_low_cut_hz,
    );

    let stats = AxisStats {
        accel_top_peak: accel_peaks.top().map_or(0.0, |p| p.magnitude),
        velocity_top_peak: velocity_peaks.top().map_or(0.0, |p| p.rms),
        dominant_freq: accel_peaks.top().map_or(0.0, |p| p.frequency),
        velocity_overall_rms: if velocity_overall_rms.is_finite() {
            velocity_overall_rms
        } else {
            0.0
        },
        has_data: true,
    };

    debug!(
        axis = ?sample.axis,
        accel_top_peak = stats.accel_top_peak,
        velocity_top_peak = stats.velocity_top_peak,
        dominant_freq = stats.dominant_freq,
        "Axis analysed"
    );

    Ok(AxisAnalysis {
        axis: sample.axis,
        stats,
        accel_spectrum: Some(accel_spectrum),
        accel_peaks,
        velocity_spectrum: Some(velocity_spectrum),
        velocity_peaks,
        no_data_reason: None,
    })
}

/// Window, transform and undo the window's coherent gain.
fn windowed_spectrum(
    samples: &[f64],
    sample_rate: f64,
    window: Window,
    zero_pad: bool,
) -> Result<FrequencySpectrum, ProcessingError> {
    let windowed = apply_window(samples, window);
    let mut spectrum = compute_spectrum_with(&windowed, sample_rate, zero_pad)?;
    let gain = window.coherent_gain(samples.len());
    for m in &mut spectrum.magnitudes {
        *m /= gain;
    }
    Ok(spectrum)
}

fn remove_mean(samples: &[f64]) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }
    let mean = samples.iter().mean();
    samples.iter().map(|&x| x - mean).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    /// 100 Hz tone at fs = 2560 Hz (fmax 1000 × 2.56), 1024 lines
    fn tone_counts(freq: f64, amplitude_counts: f64, offset: i32) -> Vec<i32> {
        (0..1024)
            .map(|i| {
                let t = i as f64 / 2560.0;
                offset + (amplitude_counts * (2.0 * PI * freq * t).sin()).round() as i32
            })
            .collect()
    }

    fn calibration() -> AxisConfig {
        AxisConfig::new(2.0, 1000.0, 1024).unwrap()
    }

    #[test]
    fn test_tone_detected_within_one_bin() {
        let sample = RawAxisSample::new(Axis::H, tone_counts(100.0, 1000.0, 0));
        let analysis = analyze_axis(&sample, &calibration(), &EngineConfig::default());

        assert!(analysis.stats.has_data);
        let bin = 2560.0 / 1024.0;
        assert!((analysis.stats.dominant_freq - 100.0).abs() <= bin);
        let v_top = analysis.velocity_peaks.top().expect("velocity peak");
        assert!((v_top.frequency - 100.0).abs() <= bin);
        assert!(analysis.stats.velocity_top_peak > 0.0);
        assert!(analysis.stats.velocity_overall_rms > 0.0);
    }

    #[test]
    fn test_hann_gain_correction_recovers_amplitude() {
        // 1000 counts at g_scale 2 → 0.488 g amplitude → |X|/N ≈ 0.244 g
        let sample = RawAxisSample::new(Axis::V, tone_counts(100.0, 1000.0, 0));
        let analysis = analyze_axis(&sample, &calibration(), &EngineConfig::default());
        let expected = 1000.0 / 4096.0 * 2.0 / 2.0;
        assert!(
            (analysis.stats.accel_top_peak - expected).abs() < expected * 0.02,
            "peak {} expected {}",
            analysis.stats.accel_top_peak,
            expected
        );
    }

    #[test]
    fn test_dc_offset_does_not_create_peak() {
        let with_offset = RawAxisSample::new(Axis::A, tone_counts(100.0, 500.0, 2048));
        let analysis = analyze_axis(&with_offset, &calibration(), &EngineConfig::default());
        assert!((analysis.stats.dominant_freq - 100.0).abs() <= 2.5);
    }

    #[test]
    fn test_empty_buffer_is_no_data() {
        let sample = RawAxisSample::new(Axis::H, Vec::new());
        let analysis = analyze_axis(&sample, &calibration(), &EngineConfig::default());
        assert!(!analysis.stats.has_data);
        assert_eq!(analysis.stats, AxisStats::no_data());
        assert!(analysis.no_data_reason.is_some());
        assert!(analysis.accel_spectrum.is_none());
    }

    #[test]
    fn test_buffer_too_short_for_peaks_is_no_data() {
        for counts in [vec![4000], vec![4000, -4000], vec![4000, -4000, 4000]] {
            let sample = RawAxisSample::new(Axis::H, counts);
            let analysis = analyze_axis(&sample, &calibration(), &EngineConfig::default());
            assert!(!analysis.stats.has_data, "{} samples", sample.len());
            assert_eq!(analysis.stats, AxisStats::no_data());
            assert!(analysis.no_data_reason.is_some());
        }
    }

    #[test]
    fn test_flat_signal_has_data_but_no_peaks() {
        let sample = RawAxisSample::new(Axis::H, vec![100; 256]);
        let analysis = analyze_axis(&sample, &calibration(), &EngineConfig::default());
        assert!(analysis.stats.has_data);
        assert_eq!(analysis.stats.velocity_top_peak, 0.0);
        assert!(analysis.velocity_peaks.peaks.is_empty());
    }
}
