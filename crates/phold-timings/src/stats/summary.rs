//! Per-configuration summary statistics.

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::outliers::remove_outliers;
use super::percentiles::median;
use crate::model::{ConfigKey, TimingCategory, TimingData};

/// Summary of one (configuration, category) sample set after filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingStats {
    pub mean: f64,
    /// Population standard deviation of the retained samples
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// Samples kept after outlier filtering
    pub values: Vec<f64>,
    pub outliers_removed: usize,
}

impl TimingStats {
    /// Filter outliers and summarize what remains.
    ///
    /// Returns `None` if nothing is left to summarize.
    ///
    /// # Examples
    ///
    /// ```
    /// use phold_timings::stats::TimingStats;
    ///
    /// let stats = TimingStats::from_samples(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    /// assert_eq!(stats.mean, 3.0);
    /// assert!((stats.std_dev - 2.0_f64.sqrt()).abs() < 1e-12);
    /// assert_eq!(stats.count(), 5);
    /// ```
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let filtered = remove_outliers(samples);
        let values = filtered.retained;
        if values.is_empty() {
            return None;
        }

        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let variance = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / count;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let median = median(&values)?;

        Some(TimingStats {
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
            median,
            values,
            outliers_removed: filtered.removed,
        })
    }

    /// Number of retained trials
    pub fn count(&self) -> usize {
        self.values.len()
    }
}

/// Statistics for every (configuration, category) with retained samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsTable {
    configs: BTreeMap<ConfigKey, BTreeMap<TimingCategory, TimingStats>>,
}

impl StatsTable {
    pub fn insert(&mut self, key: ConfigKey, category: TimingCategory, stats: TimingStats) {
        self.configs.entry(key).or_default().insert(category, stats);
    }

    pub fn get(&self, key: &ConfigKey, category: TimingCategory) -> Option<&TimingStats> {
        self.configs
            .get(key)
            .and_then(|categories| categories.get(&category))
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Configurations in key order, each with its categories in label order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&ConfigKey, &BTreeMap<TimingCategory, TimingStats>)> {
        self.configs.iter()
    }

    /// Flat (configuration, category, stats) view in report order.
    pub fn records(&self) -> impl Iterator<Item = (&ConfigKey, TimingCategory, &TimingStats)> {
        self.configs.iter().flat_map(|(key, categories)| {
            categories
                .iter()
                .map(move |(category, stats)| (key, *category, stats))
        })
    }
}

impl Serialize for StatsTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.records().map(|(config, category, stats)| StatsRecord {
            config,
            category,
            stats,
        }))
    }
}

struct StatsRecord<'a> {
    config: &'a ConfigKey,
    category: TimingCategory,
    stats: &'a TimingStats,
}

impl Serialize for StatsRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("StatsRecord", 3)?;
        record.serialize_field("config", self.config)?;
        record.serialize_field("category", &self.category)?;
        record.serialize_field("stats", self.stats)?;
        record.end()
    }
}

/// Summarize every sample set in `data`.
///
/// Pairs whose retained set is empty are left out, as are configurations
/// left with no categories at all.
pub fn compute_statistics(data: &TimingData) -> StatsTable {
    let mut table = StatsTable::default();
    for (key, categories) in data.iter() {
        for (category, samples) in categories {
            if let Some(stats) = TimingStats::from_samples(samples) {
                table.insert(*key, *category, stats);
            }
        }
    }
    table
}
