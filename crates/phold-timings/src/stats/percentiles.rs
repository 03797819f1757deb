//! Percentile calculations over timing samples.

use std::cmp::Ordering;

/// Calculate percentile value from a slice of f64 samples.
///
/// Uses linear interpolation between closest ranks, the same definition
/// numpy uses by default, so quartiles match the values the sweep
/// scripts report.
///
/// # Arguments
///
/// * `samples` - Slice of samples (sorted internally)
/// * `p` - Percentile to calculate (0.0 to 100.0)
///
/// # Returns
///
/// * `Some(value)` - The percentile value
/// * `None` - If samples is empty or p is out of range
///
/// # Examples
///
/// ```
/// use phold_timings::stats::percentiles::percentile;
///
/// let data = vec![1.0, 2.0, 3.0, 4.0];
/// assert_eq!(percentile(&data, 50.0), Some(2.5));
/// assert_eq!(percentile(&data, 25.0), Some(1.75));
/// ```
pub fn percentile(samples: &[f64], p: f64) -> Option<f64> {
    if samples.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }

    let sorted = sorted_copy(samples);
    Some(percentile_of_sorted(&sorted, p))
}

/// Median of the samples, `None` when empty.
pub fn median(samples: &[f64]) -> Option<f64> {
    percentile(samples, 50.0)
}

pub(crate) fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// `sorted` must be non-empty and ascending.
pub(crate) fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower_index = rank.floor() as usize;
    let upper_index = rank.ceil() as usize;

    if lower_index == upper_index {
        sorted[lower_index]
    } else {
        let lower_value = sorted[lower_index];
        let upper_value = sorted[upper_index];
        let fraction = rank - lower_index as f64;
        lower_value + fraction * (upper_value - lower_value)
    }
}
