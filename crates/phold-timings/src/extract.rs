//! Duration extractors for the three timing artifact formats.
//!
//! The `parse_*` functions work on file content and are pure. The
//! `extract_*` wrappers read a file, log any failure, and return `None`
//! so a single bad artifact never aborts the batch.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Key of the object that nests build timings in simulator JSON output
pub const TIMING_INFO_KEY: &str = "timing-info";

/// Field holding the slowest rank's build time in seconds
pub const MAX_BUILD_TIME_FIELD: &str = "max_build_time";

lazy_static! {
    /// Shell `time` output, e.g. `real	0m1.234s`
    static ref REAL_TIME_PATTERN: Regex = Regex::new(r"real\s+(\d+)m([\d.]+)s").unwrap();

    /// Generator log line, e.g. `Elapsed time (s): 123.456`
    static ref ELAPSED_TIME_PATTERN: Regex =
        Regex::new(r"Elapsed time \(s\):\s*([\d.]+)").unwrap();
}

/// Which parser a timing category is read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorKind {
    /// Shell `real` timing text
    RealTime,
    /// `Elapsed time (s): <float>` log text
    ElapsedTime,
    /// JSON with a `max_build_time` field
    MaxBuildTime,
}

impl ExtractorKind {
    /// Parse already-loaded file content.
    pub fn parse(&self, content: &str) -> Option<f64> {
        match self {
            ExtractorKind::RealTime => parse_real_time(content),
            ExtractorKind::ElapsedTime => parse_elapsed_time(content),
            ExtractorKind::MaxBuildTime => parse_max_build_time(content),
        }
    }

    /// Read `path` and parse it, returning `None` on any failure.
    pub fn extract(&self, path: &Path) -> Option<f64> {
        match self {
            ExtractorKind::RealTime => extract_real_time(path),
            ExtractorKind::ElapsedTime => extract_elapsed_time(path),
            ExtractorKind::MaxBuildTime => extract_max_build_time(path),
        }
    }
}

/// Parse the `real` line of shell `time` output into seconds.
///
/// # Examples
///
/// ```
/// use phold_timings::extract::parse_real_time;
///
/// let text = "real\t1m2.500s\nuser\t0m0.100s\nsys\t0m0.010s\n";
/// assert_eq!(parse_real_time(text), Some(62.5));
/// ```
pub fn parse_real_time(content: &str) -> Option<f64> {
    let caps = REAL_TIME_PATTERN.captures(content)?;
    let minutes: u64 = caps[1].parse().ok()?;
    let seconds: f64 = caps[2].parse().ok()?;
    Some(minutes as f64 * 60.0 + seconds)
}

/// Parse an `Elapsed time (s): <float>` line into seconds.
pub fn parse_elapsed_time(content: &str) -> Option<f64> {
    let caps = ELAPSED_TIME_PATTERN.captures(content)?;
    caps[1].parse().ok()
}

/// Parse `max_build_time` from simulator JSON output.
///
/// The field is looked up under `"timing-info"` first and then at the top
/// level. Invalid JSON and non-numeric values yield `None`.
///
/// # Examples
///
/// ```
/// use phold_timings::extract::parse_max_build_time;
///
/// assert_eq!(parse_max_build_time(r#"{"timing-info": {"max_build_time": 12.3}}"#), Some(12.3));
/// assert_eq!(parse_max_build_time(r#"{"max_build_time": 7.0}"#), Some(7.0));
/// assert_eq!(parse_max_build_time("not json"), None);
/// ```
pub fn parse_max_build_time(content: &str) -> Option<f64> {
    let data: Value = serde_json::from_str(content).ok()?;
    max_build_time(&data)
}

fn max_build_time(data: &Value) -> Option<f64> {
    data.get(TIMING_INFO_KEY)
        .and_then(|info| info.get(MAX_BUILD_TIME_FIELD))
        .and_then(Value::as_f64)
        .or_else(|| data.get(MAX_BUILD_TIME_FIELD).and_then(Value::as_f64))
}

pub fn extract_real_time(path: &Path) -> Option<f64> {
    read_artifact(path).and_then(|content| parse_real_time(&content))
}

pub fn extract_elapsed_time(path: &Path) -> Option<f64> {
    read_artifact(path).and_then(|content| parse_elapsed_time(&content))
}

/// Read a JSON timing file; malformed JSON is logged like a read failure.
pub fn extract_max_build_time(path: &Path) -> Option<f64> {
    let content = read_artifact(path)?;
    match serde_json::from_str::<Value>(&content) {
        Ok(data) => max_build_time(&data),
        Err(e) => {
            warn!("Error reading {}: {}", path.display(), e);
            None
        }
    }
}

fn read_artifact(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            warn!("Error reading {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_real_time_seconds_only() {
        assert_eq!(parse_real_time("real\t0m1.500s"), Some(1.5));
    }

    #[test]
    fn test_parse_real_time_with_minutes() {
        let text = "\nreal    2m03.250s\nuser    0m1.000s\nsys     0m0.200s\n";
        assert_eq!(parse_real_time(text), Some(123.25));
    }

    #[test]
    fn test_parse_real_time_ignores_user_and_sys() {
        assert_eq!(parse_real_time("user\t0m1.000s\nsys\t0m0.200s\n"), None);
    }

    #[test]
    fn test_parse_real_time_malformed_seconds() {
        assert_eq!(parse_real_time("real\t0m1.2.3s"), None);
    }

    #[test]
    fn test_parse_elapsed_time() {
        let text = "Building model...\nElapsed time (s): 42.125\nDone\n";
        assert_eq!(parse_elapsed_time(text), Some(42.125));
    }

    #[test]
    fn test_parse_elapsed_time_missing() {
        assert_eq!(parse_elapsed_time("Elapsed: 42.0"), None);
        assert_eq!(parse_elapsed_time(""), None);
    }

    #[test]
    fn test_parse_max_build_time_nested() {
        let json = r#"{"timing-info": {"max_build_time": 12.3, "min_build_time": 11.0}}"#;
        assert_eq!(parse_max_build_time(json), Some(12.3));
    }

    #[test]
    fn test_parse_max_build_time_top_level() {
        assert_eq!(parse_max_build_time(r#"{"max_build_time": 7.0}"#), Some(7.0));
    }

    #[test]
    fn test_parse_max_build_time_prefers_nested() {
        let json = r#"{"max_build_time": 1.0, "timing-info": {"max_build_time": 2.0}}"#;
        assert_eq!(parse_max_build_time(json), Some(2.0));
    }

    #[test]
    fn test_parse_max_build_time_integer_value() {
        assert_eq!(parse_max_build_time(r#"{"max_build_time": 9}"#), Some(9.0));
    }

    #[test]
    fn test_parse_max_build_time_missing_or_invalid() {
        assert_eq!(parse_max_build_time(r#"{"timing-info": {}}"#), None);
        assert_eq!(parse_max_build_time(r#"{"max_build_time": "fast"}"#), None);
        assert_eq!(parse_max_build_time(r#"[1, 2, 3]"#), None);
        assert_eq!(parse_max_build_time("{"), None);
    }

    #[test]
    fn test_extract_missing_file_is_none() {
        let path = Path::new("/nonexistent/gen_mpi_time_trial_1.txt");
        assert_eq!(extract_real_time(path), None);
        assert_eq!(ExtractorKind::MaxBuildTime.extract(path), None);
    }

    #[test]
    fn test_extract_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gen_py_trial_1_elapsed.txt");
        fs::write(&path, "Elapsed time (s): 3.75\n").unwrap();

        assert_eq!(extract_elapsed_time(&path), Some(3.75));
        assert_eq!(ExtractorKind::ElapsedTime.extract(&path), Some(3.75));
        assert_eq!(ExtractorKind::RealTime.extract(&path), None);
    }
}
