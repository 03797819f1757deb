//! Re-indexing of statistics for plotting.
//!
//! Plots are laid out per `(height, width)` grid size, so the statistics
//! table is regrouped as size → category → node count → points.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::PlotMetric;
use crate::model::TimingCategory;
use crate::stats::StatsTable;

/// One plotted configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    /// `num_nodes * num_ranks`
    pub total_ranks: u64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl PlotPoint {
    pub fn value(&self, metric: PlotMetric) -> f64 {
        match metric {
            PlotMetric::Mean => self.mean,
            PlotMetric::Min => self.min,
            PlotMetric::Max => self.max,
        }
    }
}

/// Points grouped by node count
pub type NodeSeries = BTreeMap<u32, Vec<PlotPoint>>;

/// Statistics regrouped by `(height, width)`, then category, then node count.
///
/// Points within a node count are unordered; sort by `total_ranks` before drawing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizedData {
    sizes: BTreeMap<(u32, u32), BTreeMap<TimingCategory, NodeSeries>>,
}

impl OrganizedData {
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Grid sizes present in the data, sorted.
    pub fn sizes(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.sizes.keys().copied()
    }

    /// Distinct heights, sorted; the plot grid's rows.
    pub fn heights(&self) -> Vec<u32> {
        let heights: BTreeSet<u32> = self.sizes.keys().map(|&(h, _)| h).collect();
        heights.into_iter().collect()
    }

    /// Distinct widths, sorted; the plot grid's columns.
    pub fn widths(&self) -> Vec<u32> {
        let widths: BTreeSet<u32> = self.sizes.keys().map(|&(_, w)| w).collect();
        widths.into_iter().collect()
    }

    pub fn get(&self, size: (u32, u32)) -> Option<&BTreeMap<TimingCategory, NodeSeries>> {
        self.sizes.get(&size)
    }

    pub fn series(&self, size: (u32, u32), category: TimingCategory) -> Option<&NodeSeries> {
        self.get(size).and_then(|categories| categories.get(&category))
    }
}

/// Regroup the statistics table by grid size for plotting.
pub fn organize_by_size(stats: &StatsTable) -> OrganizedData {
    let mut organized = OrganizedData::default();

    for (key, category, stat) in stats.records() {
        organized
            .sizes
            .entry(key.size())
            .or_default()
            .entry(category)
            .or_default()
            .entry(key.num_nodes)
            .or_default()
            .push(PlotPoint {
                total_ranks: key.total_ranks(),
                mean: stat.mean,
                min: stat.min,
                max: stat.max,
            });
    }

    organized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConfigKey, TimingData};
    use crate::stats::compute_statistics;
    use pretty_assertions::assert_eq;

    fn sample_table() -> StatsTable {
        let mut data = TimingData::new();
        data.push(ConfigKey::new(2, 3, 1, 4, 8), TimingCategory::GenMpi, 1.5);
        data.push(ConfigKey::new(2, 3, 1, 4, 16), TimingCategory::GenMpi, 2.5);
        data.push(ConfigKey::new(2, 3, 1, 8, 8), TimingCategory::GenMpi, 3.0);
        data.push(ConfigKey::new(2, 3, 1, 4, 8), TimingCategory::GenPy, 9.0);
        data.push(ConfigKey::new(4, 3, 1, 4, 8), TimingCategory::BuildPy, 7.0);
        compute_statistics(&data)
    }

    #[test]
    fn test_grouped_by_size_category_nodes() {
        let organized = organize_by_size(&sample_table());

        assert_eq!(organized.sizes().collect::<Vec<_>>(), vec![(2, 3), (4, 3)]);

        let gen_mpi = organized.series((2, 3), TimingCategory::GenMpi).unwrap();
        assert_eq!(gen_mpi.keys().copied().collect::<Vec<_>>(), vec![4, 8]);

        let mut four_node: Vec<u64> = gen_mpi[&4].iter().map(|p| p.total_ranks).collect();
        four_node.sort();
        assert_eq!(four_node, vec![32, 64]);
        assert_eq!(gen_mpi[&8][0].total_ranks, 64);

        let gen_py = organized.series((2, 3), TimingCategory::GenPy).unwrap();
        assert_eq!(gen_py[&4][0].max, 9.0);
        assert!(organized.series((4, 3), TimingCategory::GenMpi).is_none());
    }

    #[test]
    fn test_heights_and_widths() {
        let organized = organize_by_size(&sample_table());
        assert_eq!(organized.heights(), vec![2, 4]);
        assert_eq!(organized.widths(), vec![3]);
    }

    #[test]
    fn test_empty_table() {
        let organized = organize_by_size(&StatsTable::default());
        assert!(organized.is_empty());
        assert!(organized.heights().is_empty());
    }

    #[test]
    fn test_point_value_by_metric() {
        let point = PlotPoint {
            total_ranks: 32,
            mean: 2.0,
            min: 1.0,
            max: 3.0,
        };
        assert_eq!(point.value(PlotMetric::Mean), 2.0);
        assert_eq!(point.value(PlotMetric::Min), 1.0);
        assert_eq!(point.value(PlotMetric::Max), 3.0);
    }
}
