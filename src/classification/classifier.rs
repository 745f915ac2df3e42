//! Measurement + resolved thresholds → [`StatusLevel`].

use crate::thresholds::ThresholdError;
use crate::types::{StatusLevel, ThresholdSet};

/// Classify `value` against `thresholds`.
///
/// Escalation is strictly greater-than: a reading exactly at `min` is
/// Normal, at `medium` Warning, at `max` Concern.
///
/// `ThresholdSet` cannot hold zero, negative or inverted boundaries, so the
/// zero-threshold misclassification cannot reach this function. Callers with
/// raw numbers go through [`classify_checked`].
pub fn classify(value: f64, thresholds: &ThresholdSet) -> StatusLevel {
    if value > thresholds.max() {
        StatusLevel::Critical
    } else if value > thresholds.medium() {
        StatusLevel::Concern
    } else if value > thresholds.min() {
        StatusLevel::Warning
    } else {
        StatusLevel::Normal
    }
}

/// Classify against raw boundaries, rejecting zero/negative/non-finite or
/// out-of-order values instead of misclassifying.
pub fn classify_checked(
    value: f64,
    min: f64,
    medium: f64,
    max: f64,
) -> Result<StatusLevel, ThresholdError> {
    ThresholdSet::new(min, medium, max).map(|set| classify(value, &set))
}

/// Classify an optional reading; missing or non-finite readings are unknown.
pub fn classify_reading(value: Option<f64>, thresholds: &ThresholdSet) -> Option<StatusLevel> {
    value
        .filter(|v| v.is_finite())
        .map(|v| classify(v, thresholds))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(min: f64, medium: f64, max: f64) -> ThresholdSet {
        ThresholdSet::new(min, medium, max).unwrap()
    }

    #[test]
    fn test_bands() {
        let t = set(2.3, 4.5, 7.1);
        assert_eq!(classify(0.5, &t), StatusLevel::Normal);
        assert_eq!(classify(3.0, &t), StatusLevel::Warning);
        assert_eq!(classify(5.2, &t), StatusLevel::Concern);
        assert_eq!(classify(9.0, &t), StatusLevel::Critical);
    }

    #[test]
    fn test_boundaries_escalate_strictly() {
        let t = set(1.0, 2.0, 3.0);
        assert_eq!(classify(1.0, &t), StatusLevel::Normal);
        assert_eq!(classify(2.0, &t), StatusLevel::Warning);
        assert_eq!(classify(3.0, &t), StatusLevel::Concern);
        assert_eq!(classify(3.000_001, &t), StatusLevel::Critical);
    }

    #[test]
    fn test_monotonic() {
        let t = set(0.71, 1.8, 4.5);
        let mut previous = StatusLevel::Normal;
        for i in 0..=600 {
            let status = classify(f64::from(i) * 0.01, &t);
            assert!(status >= previous, "value {}", f64::from(i) * 0.01);
            previous = status;
        }
    }

    #[test]
    fn test_checked_rejects_zero_thresholds() {
        assert!(matches!(
            classify_checked(0.05, 0.0, 0.0, 0.0),
            Err(ThresholdError::NonPositiveBoundary { .. })
        ));
        assert!(matches!(
            classify_checked(1.0, 3.0, 2.0, 4.0),
            Err(ThresholdError::InvalidThresholdOrder { .. })
        ));
        assert_eq!(classify_checked(0.05, 0.1, 0.125, 0.15), Ok(StatusLevel::Normal));
    }

    #[test]
    fn test_reading_unknown() {
        let t = set(1.0, 2.0, 3.0);
        assert_eq!(classify_reading(None, &t), None);
        assert_eq!(classify_reading(Some(f64::NAN), &t), None);
        assert_eq!(classify_reading(Some(2.5), &t), Some(StatusLevel::Concern));
    }
}
