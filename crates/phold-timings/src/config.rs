//! Configuration for a timing analysis run
//!
//! Every path and policy the pipeline uses lives in [`AnalysisConfig`], which
//! is passed explicitly into each stage. It can be loaded from a TOML file;
//! all sections and fields are optional and fall back to the defaults below.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AnalysisError;

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Where run directories are read from
    #[serde(default)]
    pub input: InputConfig,
    /// Where results are written
    #[serde(default)]
    pub output: OutputConfig,
    /// Plot appearance
    #[serde(default)]
    pub plot: PlotConfig,
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed
    ///
    /// # Example
    ///
    /// ```no_run
    /// use phold_timings::config::AnalysisConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = AnalysisConfig::from_file("timings.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use phold_timings::config::{AnalysisConfig, PlotMetric};
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = AnalysisConfig::from_str(r#"
    ///     [input]
    ///     root = "sweep-output"
    ///
    ///     [plot]
    ///     metric = "mean"
    /// "#)?;
    /// assert_eq!(config.plot.metric, PlotMetric::Mean);
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.plot.subplot_width == 0 || self.plot.subplot_height == 0 {
            return Err(AnalysisError::Config(format!(
                "subplot size must be non-zero, got {}x{}",
                self.plot.subplot_width, self.plot.subplot_height
            )));
        }
        Ok(())
    }

    /// Configuration rooted at `root` with every other setting defaulted
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.input.root = root.into();
        config
    }
}

/// Input discovery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory holding one subdirectory per experiment run (default: `output`)
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Which categories warn when a matching file yields no value
    #[serde(default)]
    pub warn_policy: WarnPolicy,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            warn_policy: WarnPolicy::default(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("output")
}

/// Output locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Plot image path; `.svg` selects the SVG backend, anything else PNG
    #[serde(default = "default_plot_path")]
    pub plot: PathBuf,
    /// Optional JSON export of the computed statistics
    #[serde(default)]
    pub json: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            plot: default_plot_path(),
            json: None,
        }
    }
}

fn default_plot_path() -> PathBuf {
    PathBuf::from("generation_timings_combined.png")
}

/// Plot appearance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Statistic drawn on the y axis (default: max)
    #[serde(default)]
    pub metric: PlotMetric,
    /// Width of one subplot in pixels (default: 500)
    #[serde(default = "default_subplot_width")]
    pub subplot_width: u32,
    /// Height of one subplot in pixels (default: 400)
    #[serde(default = "default_subplot_height")]
    pub subplot_height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            metric: PlotMetric::default(),
            subplot_width: default_subplot_width(),
            subplot_height: default_subplot_height(),
        }
    }
}

fn default_subplot_width() -> u32 {
    500
}

fn default_subplot_height() -> u32 {
    400
}

/// Statistic plotted for each configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlotMetric {
    Mean,
    Min,
    #[default]
    Max,
}

impl PlotMetric {
    pub fn name(&self) -> &'static str {
        match self {
            PlotMetric::Mean => "mean",
            PlotMetric::Min => "min",
            PlotMetric::Max => "max",
        }
    }
}

impl std::str::FromStr for PlotMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mean" => Ok(PlotMetric::Mean),
            "min" => Ok(PlotMetric::Min),
            "max" => Ok(PlotMetric::Max),
            other => Err(format!("unknown metric '{}', expected mean, min or max", other)),
        }
    }
}

/// Which timing categories log a warning for files that yield no value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WarnPolicy {
    /// Every category warns
    #[default]
    All,
    /// Only the JSON build categories warn; text categories skip silently
    BuildOnly,
}
