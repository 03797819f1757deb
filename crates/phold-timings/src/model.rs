//! Core data model: configuration keys, timing categories and raw samples.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::extract::ExtractorKind;

lazy_static! {
    // Generation files must carry a numeric trial id
    static ref GEN_MPI_FILE: Regex = Regex::new(r"^gen_mpi_time_trial_\d.*\.txt$").unwrap();
    static ref GEN_PY_FILE: Regex = Regex::new(r"^gen_py_trial_\d.*_elapsed\.txt$").unwrap();
    static ref BUILD_MPI_FILE: Regex = Regex::new(r"^sim_mpi_timing_trial_.*\.json$").unwrap();
    static ref BUILD_PY_FILE: Regex = Regex::new(r"^sim_py_timing_trial_.*\.json$").unwrap();
}

/// One experiment setting, parsed from a run directory name.
///
/// Ordering is lexicographic over
/// `(height, width, num_rings, num_nodes, num_ranks)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConfigKey {
    pub height: u32,
    pub width: u32,
    pub num_rings: u32,
    pub num_nodes: u32,
    pub num_ranks: u32,
}

impl ConfigKey {
    pub fn new(height: u32, width: u32, num_rings: u32, num_nodes: u32, num_ranks: u32) -> Self {
        Self {
            height,
            width,
            num_rings,
            num_nodes,
            num_ranks,
        }
    }

    /// Total MPI ranks across all nodes, the x-axis of the comparison plots.
    pub fn total_ranks(&self) -> u64 {
        u64::from(self.num_nodes) * u64::from(self.num_ranks)
    }

    /// The `(height, width)` grid size this configuration belongs to.
    pub fn size(&self) -> (u32, u32) {
        (self.height, self.width)
    }

    /// Directory name this key was (or would be) parsed from.
    pub fn dir_name(&self) -> String {
        format!(
            "height-{}_width-{}_numRings-{}_numNodes-{}_numRanks-{}",
            self.height, self.width, self.num_rings, self.num_nodes, self.num_ranks
        )
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "height={}, width={}, numRings={}, numNodes={}, numRanks={}",
            self.height, self.width, self.num_rings, self.num_nodes, self.num_ranks
        )
    }
}

/// Timing category collected for each configuration.
///
/// Variants are declared in label order so the derived `Ord` sorts by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingCategory {
    /// Model build time, native (MPI) runtime
    BuildMpi,
    /// Model build time, interpreted (Python) runtime
    BuildPy,
    /// Model generation time with SST
    GenMpi,
    /// Model generation time without SST
    GenPy,
}

impl TimingCategory {
    pub const ALL: [TimingCategory; 4] = [
        TimingCategory::BuildMpi,
        TimingCategory::BuildPy,
        TimingCategory::GenMpi,
        TimingCategory::GenPy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimingCategory::BuildMpi => "build_mpi",
            TimingCategory::BuildPy => "build_py",
            TimingCategory::GenMpi => "gen_mpi",
            TimingCategory::GenPy => "gen_py",
        }
    }

    /// Glob-style description of the files this category is read from.
    pub fn file_glob(&self) -> &'static str {
        match self {
            TimingCategory::BuildMpi => "sim_mpi_timing_trial_*.json",
            TimingCategory::BuildPy => "sim_py_timing_trial_*.json",
            TimingCategory::GenMpi => "gen_mpi_time_trial_*.txt",
            TimingCategory::GenPy => "gen_py_trial_*_elapsed.txt",
        }
    }

    /// Check whether a file name belongs to this category.
    pub fn matches_file_name(&self, name: &str) -> bool {
        let pattern: &Regex = match self {
            TimingCategory::BuildMpi => &BUILD_MPI_FILE,
            TimingCategory::BuildPy => &BUILD_PY_FILE,
            TimingCategory::GenMpi => &GEN_MPI_FILE,
            TimingCategory::GenPy => &GEN_PY_FILE,
        };
        pattern.is_match(name)
    }

    pub fn extractor(&self) -> ExtractorKind {
        match self {
            TimingCategory::GenMpi => ExtractorKind::RealTime,
            TimingCategory::GenPy => ExtractorKind::ElapsedTime,
            TimingCategory::BuildMpi | TimingCategory::BuildPy => ExtractorKind::MaxBuildTime,
        }
    }

    pub fn is_generation(&self) -> bool {
        matches!(self, TimingCategory::GenMpi | TimingCategory::GenPy)
    }

    /// Legend name used in the comparison plots.
    pub fn display_name(&self) -> &'static str {
        match self {
            TimingCategory::GenMpi => "With SST",
            TimingCategory::GenPy => "Without SST",
            TimingCategory::BuildMpi => "Build (MPI)",
            TimingCategory::BuildPy => "Build (Python)",
        }
    }
}

impl fmt::Display for TimingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw duration samples in seconds, grouped by configuration and category.
///
/// Sample order is the order files were visited and carries no meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingData {
    configs: BTreeMap<ConfigKey, BTreeMap<TimingCategory, Vec<f64>>>,
}

impl TimingData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: ConfigKey, category: TimingCategory, seconds: f64) {
        self.configs
            .entry(key)
            .or_default()
            .entry(category)
            .or_default()
            .push(seconds);
    }

    /// Number of configurations with at least one sample.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn samples(&self, key: &ConfigKey, category: TimingCategory) -> Option<&[f64]> {
        self.configs
            .get(key)
            .and_then(|categories| categories.get(&category))
            .map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConfigKey, &BTreeMap<TimingCategory, Vec<f64>>)> {
        self.configs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_ranks() {
        let key = ConfigKey::new(2, 3, 1, 4, 8);
        assert_eq!(key.total_ranks(), 32);
        assert_eq!(key.size(), (2, 3));
    }

    #[test]
    fn test_config_key_ordering() {
        let mut keys = vec![
            ConfigKey::new(2, 1, 1, 4, 8),
            ConfigKey::new(1, 9, 1, 4, 8),
            ConfigKey::new(1, 2, 1, 16, 1),
            ConfigKey::new(1, 2, 1, 4, 8),
        ];
        keys.sort();
        assert_eq!(keys[0], ConfigKey::new(1, 2, 1, 4, 8));
        assert_eq!(keys[1], ConfigKey::new(1, 2, 1, 16, 1));
        assert_eq!(keys[2], ConfigKey::new(1, 9, 1, 4, 8));
        assert_eq!(keys[3], ConfigKey::new(2, 1, 1, 4, 8));
    }

    #[test]
    fn test_dir_name_format() {
        let key = ConfigKey::new(2, 3, 1, 4, 8);
        assert_eq!(
            key.dir_name(),
            "height-2_width-3_numRings-1_numNodes-4_numRanks-8"
        );
    }

    #[test]
    fn test_category_sorts_by_label() {
        let mut categories = vec![
            TimingCategory::GenPy,
            TimingCategory::BuildMpi,
            TimingCategory::GenMpi,
            TimingCategory::BuildPy,
        ];
        categories.sort();

        let labels: Vec<_> = categories.iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["build_mpi", "build_py", "gen_mpi", "gen_py"]);
    }

    #[test]
    fn test_category_file_patterns() {
        assert!(TimingCategory::GenMpi.matches_file_name("gen_mpi_time_trial_1.txt"));
        assert!(!TimingCategory::GenMpi.matches_file_name("gen_mpi_time_trial_1.txt.bak"));
        assert!(TimingCategory::GenPy.matches_file_name("gen_py_trial_3_elapsed.txt"));
        assert!(!TimingCategory::GenPy.matches_file_name("gen_py_trial_3.txt"));
        assert!(!TimingCategory::GenPy.matches_file_name("gen_py_trial_x_elapsed.txt"));
        assert!(TimingCategory::BuildMpi.matches_file_name("sim_mpi_timing_trial_2.json"));
        assert!(TimingCategory::BuildPy.matches_file_name("sim_py_timing_trial_10.json"));
        assert!(!TimingCategory::BuildPy.matches_file_name("sim_mpi_timing_trial_10.json"));
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&TimingCategory::GenMpi).unwrap();
        assert_eq!(json, "\"gen_mpi\"");
    }

    #[test]
    fn test_timing_data_push_and_query() {
        let key = ConfigKey::new(2, 3, 1, 4, 8);
        let mut data = TimingData::new();
        assert!(data.is_empty());

        data.push(key, TimingCategory::GenMpi, 1.5);
        data.push(key, TimingCategory::GenMpi, 1.7);
        data.push(key, TimingCategory::BuildPy, 3.0);

        assert_eq!(data.len(), 1);
        assert_eq!(data.samples(&key, TimingCategory::GenMpi), Some(&[1.5, 1.7][..]));
        assert_eq!(data.samples(&key, TimingCategory::GenPy), None);
        assert_eq!(data.iter().map(|(_, c)| c.len()).collect::<Vec<_>>(), vec![2]);
    }
}
