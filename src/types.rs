//! Core value types shared by the processing, threshold and classification layers.
//!
//! Everything here is a plain value: no identity, no interior mutability.
//! Loosely typed payloads are converted into these types by [`crate::ingest`]
//! before they reach the engine.

use serde::{Deserialize, Serialize};

use crate::thresholds::ThresholdError;

// ============================================================================
// Axes
// ============================================================================

/// Measurement axis of a triaxial accelerometer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// Horizontal
    H,
    /// Vertical
    V,
    /// Axial
    A,
}

impl Axis {
    /// All axes in reporting order.
    pub const ALL: [Axis; 3] = [Axis::H, Axis::V, Axis::A];
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::H => write!(f, "H"),
            Axis::V => write!(f, "V"),
            Axis::A => write!(f, "A"),
        }
    }
}

/// Physical quantity a threshold set applies to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// Vibration velocity, mm/s RMS
    Velocity,
    /// Surface temperature, °C
    Temperature,
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quantity::Velocity => write!(f, "velocity"),
            Quantity::Temperature => write!(f, "temperature"),
        }
    }
}

// ============================================================================
// Acquisition
// ============================================================================

/// Ordered ADC counts for one axis captured in one acquisition window.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawAxisSample {
    pub axis: Option<Axis>,
    pub counts: Vec<i32>,
}

impl RawAxisSample {
    pub fn new(axis: Axis, counts: Vec<i32>) -> Self {
        Self {
            axis: Some(axis),
            counts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }
}

/// Per-sensor calibration.
///
/// Only constructed through [`AxisConfig::new`], so `g_scale` and `fmax` are
/// always finite and positive and `lor` is non-zero.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct AxisConfig {
    g_scale: f64,
    fmax: f64,
    lor: usize,
}

impl AxisConfig {
    pub fn new(g_scale: f64, fmax: f64, lor: usize) -> Result<Self, crate::ingest::IngestError> {
        use crate::ingest::IngestError;

        if !g_scale.is_finite() || g_scale <= 0.0 {
            return Err(IngestError::InvalidCalibration {
                field: "g_scale",
                value: g_scale,
            });
        }
        if !fmax.is_finite() || fmax <= 0.0 {
            return Err(IngestError::InvalidCalibration {
                field: "fmax",
                value: fmax,
            });
        }
        if lor == 0 {
            return Err(IngestError::InvalidCalibration {
                field: "lor",
                value: 0.0,
            });
        }
        Ok(Self { g_scale, fmax, lor })
    }

    /// ADC-to-g factor
    pub fn g_scale(&self) -> f64 {
        self.g_scale
    }

    /// Maximum analysed frequency (Hz)
    pub fn fmax(&self) -> f64 {
        self.fmax
    }

    /// Lines of resolution, which is also the acquisition buffer length
    pub fn lor(&self) -> usize {
        self.lor
    }

    /// Effective sampling rate for a given `fmax` multiplier (2.56 by convention).
    pub fn sample_rate(&self, factor: f64) -> f64 {
        self.fmax * factor
    }
}

// ============================================================================
// Spectral output
// ============================================================================

/// One bin of a one-sided spectrum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SpectrumPoint {
    pub frequency: f64,
    pub magnitude: f64,
}

/// A retained spectral peak.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PeakStat {
    /// Bin frequency (Hz)
    pub frequency: f64,
    /// Spectral magnitude at the bin
    pub magnitude: f64,
    /// `magnitude / sqrt(2)`, assuming a sinusoidal component
    pub rms: f64,
}

impl PeakStat {
    pub fn new(frequency: f64, magnitude: f64) -> Self {
        Self {
            frequency,
            magnitude,
            rms: magnitude / std::f64::consts::SQRT_2,
        }
    }
}

/// Governing measurement for one axis.
///
/// `has_data == false` marks the explicit "no data" result: every numeric
/// field is zero and downstream classification treats the axis as unknown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct AxisStats {
    /// Largest acceleration peak magnitude (g)
    pub accel_top_peak: f64,
    /// RMS of the largest velocity peak (mm/s)
    pub velocity_top_peak: f64,
    /// Frequency of the largest acceleration peak (Hz)
    pub dominant_freq: f64,
    /// Time-domain RMS of the detrended velocity signal (mm/s)
    pub velocity_overall_rms: f64,
    pub has_data: bool,
}

impl AxisStats {
    /// The "no data" result.
    pub fn no_data() -> Self {
        Self::default()
    }

    /// Value used for velocity classification, or `None` when there is nothing to classify.
    pub fn classification_value(&self) -> Option<f64> {
        (self.has_data && self.velocity_top_peak.is_finite()).then_some(self.velocity_top_peak)
    }
}

// ============================================================================
// Thresholds
// ============================================================================

/// Three ascending boundaries defining Normal/Warning/Concern/Critical bands.
///
/// Construction rejects zero, negative, non-finite and inverted boundaries,
/// so every `ThresholdSet` in circulation satisfies `0 < min <= medium <= max`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ThresholdSet {
    min: f64,
    medium: f64,
    max: f64,
}

impl ThresholdSet {
    pub fn new(min: f64, medium: f64, max: f64) -> Result<Self, ThresholdError> {
        for (name, value) in [("min", min), ("medium", medium), ("max", max)] {
            if !value.is_finite() {
                return Err(ThresholdError::NonFiniteBoundary { boundary: name, value });
            }
            if value <= 0.0 {
                return Err(ThresholdError::NonPositiveBoundary { boundary: name, value });
            }
        }
        if min > medium || medium > max {
            return Err(ThresholdError::InvalidThresholdOrder { min, medium, max });
        }
        Ok(Self { min, medium, max })
    }

    /// Build a set from compile-time table values.
    ///
    /// Only for literals already known to be positive and ascending.
    pub(crate) const fn from_table(min: f64, medium: f64, max: f64) -> Self {
        Self { min, medium, max }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn medium(&self) -> f64 {
        self.medium
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

// ============================================================================
// Status
// ============================================================================

/// Numeric condition level, totally ordered so the worst axis wins.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub enum StatusLevel {
    #[default]
    Normal = 0,
    Warning = 1,
    Concern = 2,
    Critical = 3,
}

impl std::fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusLevel::Normal => write!(f, "NORMAL"),
            StatusLevel::Warning => write!(f, "WARNING"),
            StatusLevel::Concern => write!(f, "CONCERN"),
            StatusLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Link state reported by the gateway for a sensor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    #[default]
    Online,
    Offline,
}

/// Whether the monitored machine is running.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OperationalMode {
    #[default]
    Running,
    Standby,
}

/// Final status of one sensor.
///
/// `Lost` and `Standby` pre-empt numeric classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SensorStatus {
    Level(StatusLevel),
    Standby,
    Lost,
}

impl From<StatusLevel> for SensorStatus {
    fn from(level: StatusLevel) -> Self {
        SensorStatus::Level(level)
    }
}

impl std::fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorStatus::Level(level) => write!(f, "{level}"),
            SensorStatus::Standby => write!(f, "STANDBY"),
            SensorStatus::Lost => write!(f, "LOST"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_order_is_total() {
        assert!(StatusLevel::Normal < StatusLevel::Warning);
        assert!(StatusLevel::Warning < StatusLevel::Concern);
        assert!(StatusLevel::Concern < StatusLevel::Critical);
        let worst = [StatusLevel::Warning, StatusLevel::Critical, StatusLevel::Normal]
            .into_iter()
            .max();
        assert_eq!(worst, Some(StatusLevel::Critical));
    }

    #[test]
    fn threshold_set_rejects_zero_and_inverted() {
        assert!(matches!(
            ThresholdSet::new(0.0, 1.0, 2.0),
            Err(ThresholdError::NonPositiveBoundary { boundary: "min", .. })
        ));
        assert!(matches!(
            ThresholdSet::new(1.0, f64::NAN, 2.0),
            Err(ThresholdError::NonFiniteBoundary { boundary: "medium", .. })
        ));
        assert!(matches!(
            ThresholdSet::new(3.0, 2.0, 4.0),
            Err(ThresholdError::InvalidThresholdOrder { .. })
        ));
        assert!(ThresholdSet::new(1.0, 1.0, 1.0).is_ok());
    }

    #[test]
    fn axis_config_validates_calibration() {
        assert!(AxisConfig::new(2.0, 1000.0, 1024).is_ok());
        assert!(AxisConfig::new(0.0, 1000.0, 1024).is_err());
        assert!(AxisConfig::new(2.0, f64::INFINITY, 1024).is_err());
        assert!(AxisConfig::new(2.0, 1000.0, 0).is_err());

        let cfg = AxisConfig::new(2.0, 1000.0, 1024).unwrap();
        assert!((cfg.sample_rate(2.56) - 2560.0).abs() < 1e-9);
    }

    #[test]
    fn no_data_stats_are_not_classifiable() {
        let stats = AxisStats::no_data();
        assert_eq!(stats.classification_value(), None);
        assert_eq!(stats.velocity_top_peak, 0.0);
    }

    #[test]
    fn peak_rms_from_amplitude() {
        let peak = PeakStat::new(50.0, 2.0);
        assert!((peak.rms - std::f64::consts::SQRT_2).abs() < 1e-12);
    }
}
