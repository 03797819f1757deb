//! Console summary of timing statistics

use anyhow::Result;
use std::fmt::Write;

use crate::model::{ConfigKey, TimingCategory};
use crate::stats::{StatsTable, TimingStats};

const RULE_WIDTH: usize = 80;

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Format the statistics table, one block per configuration.
    pub fn format(stats: &StatsTable) -> Result<String> {
        let mut output = String::new();

        let rule = "=".repeat(RULE_WIDTH);
        writeln!(output)?;
        writeln!(output, "{}", rule)?;
        writeln!(output, "TIMING DATA SUMMARY")?;
        writeln!(output, "{}", rule)?;

        for (key, categories) in stats.iter() {
            Self::format_config(&mut output, key)?;
            for (category, stat) in categories {
                Self::format_stat_line(&mut output, *category, stat)?;
            }
        }

        writeln!(output)?;
        Ok(output)
    }

    fn format_config(output: &mut String, key: &ConfigKey) -> Result<()> {
        writeln!(output)?;
        writeln!(output, "Configuration: {}", key)?;
        Ok(())
    }

    fn format_stat_line(
        output: &mut String,
        category: TimingCategory,
        stat: &TimingStats,
    ) -> Result<()> {
        write!(
            output,
            "  {:12}: {:8.3} s ± {:.3} (min: {:.3}, max: {:.3}) ({} trials",
            category.label(),
            stat.mean,
            stat.std_dev,
            stat.min,
            stat.max,
            stat.count()
        )?;
        if stat.outliers_removed > 0 {
            write!(output, ", {} outliers removed", stat.outliers_removed)?;
        }
        writeln!(output, ")")?;
        Ok(())
    }
}
