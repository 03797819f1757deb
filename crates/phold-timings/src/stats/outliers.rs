//! Outlier filtering for per-configuration timing samples.
//!
//! Filtering runs in two stages. A low-cluster pass first drops samples far
//! below the median, which is what a failed or truncated run looks like.
//! An Interquartile Range (IQR) pass then trims the remaining tails.
//! Without the first pass a handful of near-zero runs skews Q1 far enough
//! that the IQR pass would reject the healthy majority instead.

use super::percentiles::{median, percentile_of_sorted, sorted_copy};

/// Samples below this fraction of the median are treated as failed runs
pub const LOW_CLUSTER_FRACTION: f64 = 0.1;

/// Fence multiplier for the IQR pass
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Fewer samples than this are returned unfiltered
pub const MIN_SAMPLES_TO_FILTER: usize = 3;

/// Minimum survivors of the low-cluster pass; otherwise filtering is abandoned
pub const MIN_SAMPLES_AFTER_LOW_CLUSTER: usize = 2;

/// Minimum samples for a meaningful IQR pass
pub const MIN_SAMPLES_FOR_IQR: usize = 4;

/// Quartile fences used by the IQR pass.
///
/// Samples outside `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]` are outliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrFences {
    /// First quartile (25th percentile)
    pub q1: f64,
    /// Third quartile (75th percentile)
    pub q3: f64,
    /// Interquartile range (Q3 - Q1)
    pub iqr: f64,
    /// Lower fence (Q1 - 1.5*IQR)
    pub lower_fence: f64,
    /// Upper fence (Q3 + 1.5*IQR)
    pub upper_fence: f64,
}

impl IqrFences {
    /// Compute fences, or `None` if there are too few samples for a meaningful IQR.
    ///
    /// # Examples
    ///
    /// ```
    /// use phold_timings::stats::outliers::IqrFences;
    ///
    /// let fences = IqrFences::from_samples(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
    /// assert!(fences.contains(5.0));
    /// assert!(!fences.contains(100.0));
    /// ```
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.len() < MIN_SAMPLES_FOR_IQR {
            return None;
        }

        let sorted = sorted_copy(samples);
        let q1 = percentile_of_sorted(&sorted, 25.0);
        let q3 = percentile_of_sorted(&sorted, 75.0);
        let iqr = q3 - q1;

        Some(IqrFences {
            q1,
            q3,
            iqr,
            lower_fence: q1 - IQR_MULTIPLIER * iqr,
            upper_fence: q3 + IQR_MULTIPLIER * iqr,
        })
    }

    /// Whether `value` lies within the fences (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower_fence && value <= self.upper_fence
    }
}

/// Result of filtering one sample set.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierFilter {
    /// Samples kept, in their original relative order
    pub retained: Vec<f64>,
    /// Number of samples dropped by either pass
    pub removed: usize,
    /// Cutoff applied by the low-cluster pass, if it ran and was kept
    pub low_cutoff: Option<f64>,
    /// Fences applied by the IQR pass, if it ran
    pub fences: Option<IqrFences>,
}

impl OutlierFilter {
    fn unfiltered(samples: &[f64]) -> Self {
        OutlierFilter {
            retained: samples.to_vec(),
            removed: 0,
            low_cutoff: None,
            fences: None,
        }
    }
}

/// Remove failed runs and outliers from a sample set.
///
/// 1. Fewer than 3 samples are returned unchanged.
/// 2. Samples below 10% of the median are dropped. If that leaves fewer
///    than 2 samples the original set is returned unchanged.
/// 3. With at least 4 samples left, samples outside the 1.5×IQR fences of
///    the remaining set are dropped.
///
/// # Examples
///
/// ```
/// use phold_timings::stats::outliers::remove_outliers;
///
/// // The last run crashed early and reported almost no time
/// let result = remove_outliers(&[100.0, 102.0, 98.0, 101.0, 1.0]);
/// assert_eq!(result.retained, vec![100.0, 102.0, 98.0, 101.0]);
/// assert_eq!(result.removed, 1);
/// ```
pub fn remove_outliers(samples: &[f64]) -> OutlierFilter {
    if samples.len() < MIN_SAMPLES_TO_FILTER {
        return OutlierFilter::unfiltered(samples);
    }

    let low_cutoff = match median(samples) {
        Some(m) => m * LOW_CLUSTER_FRACTION,
        None => return OutlierFilter::unfiltered(samples),
    };

    let above_cutoff: Vec<f64> = samples
        .iter()
        .copied()
        .filter(|&value| value >= low_cutoff)
        .collect();

    if above_cutoff.len() < MIN_SAMPLES_AFTER_LOW_CLUSTER {
        return OutlierFilter::unfiltered(samples);
    }

    let fences = IqrFences::from_samples(&above_cutoff);
    let retained = match fences {
        Some(fences) => above_cutoff
            .into_iter()
            .filter(|&value| fences.contains(value))
            .collect(),
        None => above_cutoff,
    };

    OutlierFilter {
        removed: samples.len() - retained.len(),
        retained,
        low_cutoff: Some(low_cutoff),
        fences,
    }
}
