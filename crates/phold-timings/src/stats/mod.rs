//! Statistical analysis of timing samples
//!
//! This module provides percentile calculations, the two-stage outlier
//! filter, and the per-configuration summary statistics built on them.
//!
//! # Examples
//!
//! ```
//! use phold_timings::stats::{remove_outliers, TimingStats};
//!
//! // Five trials, one of which crashed almost immediately
//! let samples = vec![100.0, 102.0, 98.0, 101.0, 1.0];
//!
//! let filtered = remove_outliers(&samples);
//! assert_eq!(filtered.removed, 1);
//!
//! let stats = TimingStats::from_samples(&samples).unwrap();
//! println!("mean: {:.3}, max: {:.3}", stats.mean, stats.max);
//! ```

pub mod outliers;
pub mod percentiles;
pub mod summary;

// Re-export main types and functions
pub use outliers::{remove_outliers, IqrFences, OutlierFilter};
pub use percentiles::{median, percentile};
pub use summary::{compute_statistics, StatsTable, TimingStats};
