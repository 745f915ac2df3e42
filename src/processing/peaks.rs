//! Top-N spectral peak extraction

use serde::{Deserialize, Serialize};

use crate::types::PeakStat;

/// Retained peaks plus a per-bin mask for chart annotation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TopPeaks {
    /// Sorted by magnitude descending, ties in bin order
    pub peaks: Vec<PeakStat>,
    /// `highlight_mask[i]` is true iff `magnitude[i]` equals a retained peak magnitude
    pub highlight_mask: Vec<bool>,
}

impl TopPeaks {
    pub fn top(&self) -> Option<&PeakStat> {
        self.peaks.first()
    }
}

/// Find the `count` largest local maxima of `magnitude`.
///
/// A local peak is an interior bin strictly greater than both neighbours.
/// Fewer than three bins yields no peaks.
pub fn find_top_peaks(magnitude: &[f64], frequency: &[f64], count: usize) -> TopPeaks {
    find_top_peaks_above(magnitude, frequency, count, f64::NEG_INFINITY)
}

/// [`find_top_peaks`] restricted to bins at or above `min_frequency`.
///
/// Local-maximum detection still compares against the full spectrum, so the
/// first bin of the band is not promoted to a peak just because the band starts there.
pub fn find_top_peaks_above(
    magnitude: &[f64],
    frequency: &[f64],
    count: usize,
    min_frequency: f64,
) -> TopPeaks {
    let len = magnitude.len().min(frequency.len());
    let mut highlight_mask = vec![false; magnitude.len()];

    if len < 3 || count == 0 {
        return TopPeaks {
            peaks: Vec::new(),
            highlight_mask,
        };
    }

    let mut candidates: Vec<usize> = (1..len - 1)
        .filter(|&i| magnitude[i] > magnitude[i - 1] && magnitude[i] > magnitude[i + 1])
        .filter(|&i| frequency[i] >= min_frequency)
        .collect();

    // Stable sort keeps bin order among equal magnitudes
    candidates.sort_by(|&a, &b| {
        magnitude[b]
            .partial_cmp(&magnitude[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(count);

    let peaks: Vec<PeakStat> = candidates
        .iter()
        .map(|&i| PeakStat::new(frequency[i], magnitude[i]))
        .collect();

    for (flag, m) in highlight_mask.iter_mut().zip(magnitude.iter()) {
        *flag = peaks.iter().any(|p| p.magnitude == *m);
    }

    TopPeaks {
        peaks,
        highlight_mask,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bins(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_true_peak_detection() {
        let mut magnitudes = vec![0.1; 100];
        magnitudes[10] = 0.5;
        magnitudes[30] = 0.8;
        magnitudes[50] = 0.3;

        let result = find_top_peaks(&magnitudes, &bins(100), 3);

        assert_eq!(result.peaks.len(), 3);
        assert!((result.peaks[0].frequency - 30.0).abs() < 0.001);
        assert!((result.peaks[1].frequency - 10.0).abs() < 0.001);
        assert!((result.peaks[2].frequency - 50.0).abs() < 0.001);
        assert!((result.peaks[0].rms - 0.8 / std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_count_truncates() {
        let magnitudes = vec![0.0, 3.0, 0.0, 2.0, 0.0, 1.0, 0.0];
        let result = find_top_peaks(&magnitudes, &bins(7), 2);
        assert_eq!(result.peaks.len(), 2);
        assert_eq!(result.peaks[0].magnitude, 3.0);
        assert_eq!(result.peaks[1].magnitude, 2.0);
        assert_eq!(
            result.highlight_mask,
            vec![false, true, false, true, false, false, false]
        );
    }

    #[test]
    fn test_ties_keep_bin_order() {
        let magnitudes = vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        let result = find_top_peaks(&magnitudes, &bins(7), 2);
        assert_eq!(result.peaks[0].frequency, 1.0);
        assert_eq!(result.peaks[1].frequency, 3.0);
    }

    #[test]
    fn test_edges_and_plateaus_are_not_peaks() {
        // Bin 0 and the last bin are never candidates; a flat top is not strictly greater
        let magnitudes = vec![5.0, 1.0, 2.0, 2.0, 1.0, 6.0];
        let result = find_top_peaks(&magnitudes, &bins(6), 5);
        assert!(result.peaks.is_empty());
        assert!(result.highlight_mask.iter().all(|&h| !h));
    }

    #[test]
    fn test_fewer_than_three_bins() {
        let result = find_top_peaks(&[1.0, 2.0], &[0.0, 1.0], 5);
        assert!(result.peaks.is_empty());
        assert_eq!(result.highlight_mask, vec![false, false]);
        assert!(find_top_peaks(&[], &[], 5).top().is_none());
    }

    #[test]
    fn test_mask_marks_equal_magnitudes_outside_retained_set() {
        // Edge bin 6 equals the retained peak magnitude and is highlighted too
        let magnitudes = vec![0.0, 2.0, 0.0, 1.0, 0.0, 0.5, 2.0];
        let result = find_top_peaks(&magnitudes, &bins(7), 1);
        assert_eq!(result.peaks.len(), 1);
        assert!(result.highlight_mask[1]);
        assert!(result.highlight_mask[6]);
        assert!(!result.highlight_mask[3]);
    }

    #[test]
    fn test_band_limit_uses_full_neighbourhood() {
        let magnitudes = vec![0.0, 9.0, 4.0, 3.0, 5.0, 1.0];
        let result = find_top_peaks_above(&magnitudes, &bins(6), 5, 2.0);
        // Bin 2 sits on the falling edge of bin 1 and is not a local max
        assert_eq!(result.peaks.len(), 1);
        assert_eq!(result.peaks[0].frequency, 4.0);
    }
}
