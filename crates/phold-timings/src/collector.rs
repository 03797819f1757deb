//! Timing artifact collection
//!
//! Walks the sweep output root, parses each run directory's name into a
//! [`ConfigKey`], and extracts one sample per matching timing file.
//!
//! ```text
//! output/
//! ├── height-2_width-3_numRings-1_numNodes-4_numRanks-8/
//! │   ├── gen_mpi_time_trial_1.txt        → gen_mpi
//! │   ├── gen_py_trial_1_elapsed.txt      → gen_py
//! │   ├── sim_mpi_timing_trial_1.json     → build_mpi
//! │   └── sim_py_timing_trial_1.json      → build_py
//! └── notes/                              (skipped: name does not parse)
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::config::{AnalysisConfig, WarnPolicy};
use crate::error::AnalysisError;
use crate::model::{ConfigKey, TimingCategory, TimingData};

lazy_static! {
    /// Run directory name, matched from the start of the name
    static ref RUN_DIR_PATTERN: Regex = Regex::new(
        r"^height-(\d+)_width-(\d+)_numRings-(\d+)_numNodes-(\d+)_numRanks-(\d+)"
    )
    .unwrap();
}

/// Parse a run directory name into its configuration key.
///
/// Returns `None` for names that do not follow
/// `height-<h>_width-<w>_numRings-<r>_numNodes-<n>_numRanks-<k>`.
///
/// # Examples
///
/// ```
/// use phold_timings::{parse_directory_name, ConfigKey};
///
/// let key = parse_directory_name("height-2_width-3_numRings-1_numNodes-4_numRanks-8");
/// assert_eq!(key, Some(ConfigKey::new(2, 3, 1, 4, 8)));
/// assert_eq!(parse_directory_name("scratch"), None);
/// ```
pub fn parse_directory_name(name: &str) -> Option<ConfigKey> {
    let caps = RUN_DIR_PATTERN.captures(name)?;
    let field = |i: usize| caps[i].parse::<u32>().ok();
    Some(ConfigKey::new(field(1)?, field(2)?, field(3)?, field(4)?, field(5)?))
}

/// Collect every timing sample under `config.input.root`.
///
/// A missing root yields empty data. Run directories that cannot be listed
/// and unreadable or unparsable timing files are logged and skipped.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] if an existing root cannot be listed.
#[instrument(skip(config), fields(root = %config.input.root.display()))]
pub fn collect_timing_data(config: &AnalysisConfig) -> Result<TimingData, AnalysisError> {
    let root = &config.input.root;
    let mut data = TimingData::new();

    if !root.exists() {
        warn!("Output directory {} does not exist", root.display());
        return Ok(data);
    }

    let mut runs = Vec::new();
    for run_dir in sorted_entries(root)? {
        if !run_dir.is_dir() {
            continue;
        }

        let Some(key) = run_dir
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(parse_directory_name)
        else {
            debug!("Skipping {}: not a run directory", run_dir.display());
            continue;
        };

        runs.push((run_dir, key));
    }

    collect_runs(&runs, config.input.warn_policy, &mut data);
    info!("Collected timing data for {} configurations", data.len());
    Ok(data)
}

/// Collect each run directory, skipping any that cannot be listed.
fn collect_runs(runs: &[(PathBuf, ConfigKey)], warn_policy: WarnPolicy, data: &mut TimingData) {
    for (run_dir, key) in runs {
        if let Err(e) = collect_run_dir(run_dir, *key, warn_policy, data) {
            warn!("Skipping {}: {}", run_dir.display(), e);
        }
    }
}

fn collect_run_dir(
    run_dir: &Path,
    key: ConfigKey,
    warn_policy: WarnPolicy,
    data: &mut TimingData,
) -> Result<(), AnalysisError> {
    let files = sorted_entries(run_dir)?;

    for category in TimingCategory::ALL {
        let extractor = category.extractor();
        let matching: Vec<&PathBuf> = files
            .iter()
            .filter(|path| file_matches(path, category))
            .collect();
        debug!(
            "{}: {} files matching {}",
            run_dir.display(),
            matching.len(),
            category.file_glob()
        );

        for path in matching {
            match extractor.extract(path) {
                Some(seconds) => {
                    debug!("{} {}: {:.3}s from {}", key, category, seconds, path.display());
                    data.push(key, category, seconds);
                }
                None if warns_on_missing(warn_policy, category) => {
                    warn!(
                        "Could not extract {} timing from {}",
                        category,
                        path.display()
                    );
                }
                None => {}
            }
        }
    }

    Ok(())
}

fn file_matches(path: &Path, category: TimingCategory) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| category.matches_file_name(name))
}

fn warns_on_missing(policy: WarnPolicy, category: TimingCategory) -> bool {
    match policy {
        WarnPolicy::All => true,
        WarnPolicy::BuildOnly => !category.is_generation(),
    }
}

/// Entries of `dir`, sorted by file name.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
    let entries = fs::read_dir(dir).map_err(|e| AnalysisError::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AnalysisError::io(dir, e))?;
        paths.push(entry.path());
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}
