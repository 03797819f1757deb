//! Statistics reporting
//!
//! Formats the statistics table for people (console summary) or machines
//! (JSON export).
//!
//! # Example
//!
//! ```no_run
//! use phold_timings::reporter::{OutputFormat, Reporter};
//! use phold_timings::stats::StatsTable;
//!
//! # fn example(stats: StatsTable) -> anyhow::Result<()> {
//! Reporter::new(OutputFormat::Console).report(&stats)?;
//!
//! // Or write to a file
//! Reporter::new(OutputFormat::JsonPretty).write_to_file(&stats, "timings.json")?;
//! # Ok(())
//! # }
//! ```

mod console;
mod json;

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::stats::StatsTable;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

/// Output format for timing statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Console,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

/// Reporter for timing statistics
#[derive(Debug, Default)]
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the formatted statistics to stdout
    pub fn report(&self, stats: &StatsTable) -> Result<()> {
        self.write_to(stats, &mut io::stdout().lock())
    }

    /// Write the formatted statistics to `out`
    pub fn write_to<W: Write>(&self, stats: &StatsTable, out: &mut W) -> Result<()> {
        let output = self.format_results(stats)?;
        out.write_all(output.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Write the formatted statistics to `path`
    pub fn write_to_file<P: AsRef<Path>>(&self, stats: &StatsTable, path: P) -> Result<()> {
        let path = path.as_ref();
        let output = self.format_results(stats)?;
        fs::write(path, output)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }

    pub fn format_results(&self, stats: &StatsTable) -> Result<String> {
        match self.format {
            OutputFormat::Console => ConsoleReporter::format(stats),
            OutputFormat::Json => JsonReporter::format(stats, false),
            OutputFormat::JsonPretty => JsonReporter::format(stats, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConfigKey, TimingCategory, TimingData};
    use crate::stats::compute_statistics;

    fn create_test_stats() -> StatsTable {
        let mut data = TimingData::new();
        let key = ConfigKey::new(2, 3, 1, 4, 8);
        data.push(key, TimingCategory::GenMpi, 1.5);
        data.push(key, TimingCategory::GenPy, 4.0);
        compute_statistics(&data)
    }

    #[test]
    fn test_reporter_console_format() {
        let output = Reporter::new(OutputFormat::Console)
            .format_results(&create_test_stats())
            .unwrap();

        assert!(output.contains("TIMING DATA SUMMARY"));
        assert!(output.contains("gen_mpi"));
    }

    #[test]
    fn test_reporter_json_format() {
        let output = Reporter::new(OutputFormat::Json)
            .format_results(&create_test_stats())
            .unwrap();

        assert!(output.contains("\"category\":\"gen_py\""));
    }

    #[test]
    fn test_write_to_writer() {
        let mut out = Vec::new();
        Reporter::new(OutputFormat::Console)
            .write_to(&create_test_stats(), &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Configuration: height=2, width=3"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timings.json");

        Reporter::new(OutputFormat::JsonPretty)
            .write_to_file(&create_test_stats(), &path)
            .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_default_format() {
        let reporter = Reporter::default();
        assert_eq!(reporter.format, OutputFormat::Console);
    }
}
