//! Integration tests for collecting and summarizing a sweep output tree

use phold_timings::{
    collect_timing_data, compute_statistics, organize_by_size, AnalysisConfig, ConfigKey,
    TimingCategory, WarnPolicy,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, dir: &str, file: &str, content: &str) {
    let dir = root.join(dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), content).unwrap();
}

fn collect(root: &TempDir) -> phold_timings::TimingData {
    collect_timing_data(&AnalysisConfig::with_root(root.path())).unwrap()
}

const RUN: &str = "height-2_width-3_numRings-1_numNodes-4_numRanks-8";

#[test]
fn test_real_time_sample() {
    let root = TempDir::new().unwrap();
    write(
        root.path(),
        RUN,
        "gen_mpi_time_trial_1.txt",
        "\nreal\t0m1.500s\nuser\t0m1.200s\nsys\t0m0.100s\n",
    );

    let data = collect(&root);
    let key = ConfigKey::new(2, 3, 1, 4, 8);
    assert_eq!(data.len(), 1);
    assert_eq!(data.samples(&key, TimingCategory::GenMpi), Some(&[1.5][..]));
}

#[test]
fn test_build_time_json_layouts() {
    let root = TempDir::new().unwrap();
    write(
        root.path(),
        RUN,
        "sim_mpi_timing_trial_1.json",
        r#"{"timing-info": {"max_build_time": 12.3, "min_build_time": 9.0}}"#,
    );
    write(
        root.path(),
        RUN,
        "sim_py_timing_trial_1.json",
        r#"{"max_build_time": 7.0}"#,
    );

    let data = collect(&root);
    let key = ConfigKey::new(2, 3, 1, 4, 8);
    assert_eq!(data.samples(&key, TimingCategory::BuildMpi), Some(&[12.3][..]));
    assert_eq!(data.samples(&key, TimingCategory::BuildPy), Some(&[7.0][..]));
}

#[test]
fn test_elapsed_time_trials() {
    let root = TempDir::new().unwrap();
    for (trial, seconds) in [(1, "3.25"), (2, "3.75")] {
        write(
            root.path(),
            RUN,
            &format!("gen_py_trial_{}_elapsed.txt", trial),
            &format!("Building model\nElapsed time (s): {}\n", seconds),
        );
    }

    let data = collect(&root);
    let key = ConfigKey::new(2, 3, 1, 4, 8);
    let mut samples = data.samples(&key, TimingCategory::GenPy).unwrap().to_vec();
    samples.sort_by(f64::total_cmp);
    assert_eq!(samples, vec![3.25, 3.75]);
}

#[test]
fn test_failed_run_filtered_from_statistics() {
    let root = TempDir::new().unwrap();
    for (trial, seconds) in [100.0, 102.0, 98.0, 101.0, 1.0].iter().enumerate() {
        write(
            root.path(),
            RUN,
            &format!("sim_py_timing_trial_{}.json", trial + 1),
            &format!(r#"{{"timing-info": {{"max_build_time": {}}}}}"#, seconds),
        );
    }

    let stats = compute_statistics(&collect(&root));
    let key = ConfigKey::new(2, 3, 1, 4, 8);
    let build = stats.get(&key, TimingCategory::BuildPy).unwrap();

    let mut retained = build.values.clone();
    retained.sort_by(f64::total_cmp);
    assert_eq!(retained, vec![98.0, 100.0, 101.0, 102.0]);
    assert_eq!(build.outliers_removed, 1);
    assert_eq!(build.min, 98.0);
}

#[test]
fn test_unparsable_and_unrelated_files_skipped() {
    let root = TempDir::new().unwrap();
    write(root.path(), RUN, "gen_mpi_time_trial_1.txt", "no timing here");
    write(root.path(), RUN, "sim_mpi_timing_trial_1.json", "{not json");
    write(root.path(), RUN, "sim_py_timing_trial_1.json", r#"{"max_build_time": "fast"}"#);
    write(root.path(), RUN, "notes.txt", "real\t0m9.000s");
    write(root.path(), RUN, "gen_mpi_time_trial_x.txt", "real\t0m9.000s");

    assert!(collect(&root).is_empty());
}

#[test]
fn test_non_run_directories_skipped() {
    let root = TempDir::new().unwrap();
    write(root.path(), "scratch", "gen_mpi_time_trial_1.txt", "real\t0m1.000s");
    write(
        root.path(),
        "height-2_width-3_numRings-1_numNodes-4",
        "gen_mpi_time_trial_1.txt",
        "real\t0m1.000s",
    );
    fs::write(root.path().join(RUN), "a file, not a directory").unwrap();

    assert!(collect(&root).is_empty());
}

#[test]
fn test_empty_root() {
    let root = TempDir::new().unwrap();
    assert!(collect(&root).is_empty());
}

#[test]
fn test_missing_root() {
    let root = TempDir::new().unwrap();
    let config = AnalysisConfig::with_root(root.path().join("missing"));
    assert!(collect_timing_data(&config).unwrap().is_empty());
}

#[test]
fn test_warn_policy_does_not_change_data() {
    let root = TempDir::new().unwrap();
    write(root.path(), RUN, "gen_mpi_time_trial_1.txt", "real\t0m2.000s");
    write(root.path(), RUN, "gen_py_trial_1_elapsed.txt", "crashed");

    let mut config = AnalysisConfig::with_root(root.path());
    let all = collect_timing_data(&config).unwrap();
    config.input.warn_policy = WarnPolicy::BuildOnly;
    let build_only = collect_timing_data(&config).unwrap();

    assert_eq!(all, build_only);
    assert_eq!(all.len(), 1);
}

#[test]
fn test_sweep_organized_by_size() {
    let root = TempDir::new().unwrap();
    let runs = [
        ("height-2_width-2_numRings-1_numNodes-4_numRanks-1", "1.0"),
        ("height-2_width-2_numRings-1_numNodes-4_numRanks-2", "2.0"),
        ("height-2_width-4_numRings-1_numNodes-8_numRanks-1", "3.0"),
        ("height-4_width-4_numRings-1_numNodes-16_numRanks-1", "4.0"),
    ];
    for (run, seconds) in runs {
        write(
            root.path(),
            run,
            "gen_py_trial_1_elapsed.txt",
            &format!("Elapsed time (s): {}", seconds),
        );
    }

    let organized = organize_by_size(&compute_statistics(&collect(&root)));
    assert_eq!(organized.heights(), vec![2, 4]);
    assert_eq!(organized.widths(), vec![2, 4]);
    assert_eq!(
        organized.sizes().collect::<Vec<_>>(),
        vec![(2, 2), (2, 4), (4, 4)]
    );

    let series = organized.series((2, 2), TimingCategory::GenPy).unwrap();
    let mut ranks: Vec<u64> = series[&4].iter().map(|p| p.total_ranks).collect();
    ranks.sort();
    assert_eq!(ranks, vec![4, 8]);
}
