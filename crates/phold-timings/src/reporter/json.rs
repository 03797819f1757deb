//! JSON export of timing statistics

use anyhow::Result;

use crate::stats::StatsTable;

/// JSON format reporter
pub struct JsonReporter;

impl JsonReporter {
    /// Serialize the statistics table as an array of
    /// `{ config, category, stats }` records.
    ///
    /// # Arguments
    ///
    /// * `stats` - The statistics table to format
    /// * `pretty` - Whether to pretty-print the JSON
    pub fn format(stats: &StatsTable, pretty: bool) -> Result<String> {
        let output = if pretty {
            serde_json::to_string_pretty(stats)?
        } else {
            serde_json::to_string(stats)?
        };
        Ok(output)
    }
}
