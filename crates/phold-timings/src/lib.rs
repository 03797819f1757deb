//! Timing analysis for PHOLD benchmark sweeps
//!
//! This crate aggregates the timing artifacts written by a PHOLD experiment
//! sweep, filters failed runs and outliers, and reports the results as a
//! console summary, an optional JSON export, and a grid of log-log plots.
//!
//! # Pipeline
//!
//! ```text
//! output/<config dir>/*  ──collect──▶ TimingData ──stats──▶ StatsTable
//!                                                            │      │
//!                                                 organize ◀─┘      └─▶ Reporter
//!                                                     │
//!                                                     ▼
//!                                              generation_timings_combined.png
//! ```
//!
//! # Example
//!
//! ```no_run
//! use phold_timings::{
//!     collect_timing_data, compute_statistics, organize_by_size, plot_generation_timings,
//!     AnalysisConfig, OutputFormat, Reporter,
//! };
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = AnalysisConfig::default();
//!
//! let data = collect_timing_data(&config)?;
//! let stats = compute_statistics(&data);
//!
//! Reporter::new(OutputFormat::Console).report(&stats)?;
//!
//! let organized = organize_by_size(&stats);
//! plot_generation_timings(&organized, &config.plot, &config.output.plot)?;
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod organize;
pub mod plot;
pub mod reporter;
pub mod stats;

// Re-export main types for convenience
pub use collector::{collect_timing_data, parse_directory_name};
pub use config::{AnalysisConfig, PlotMetric, WarnPolicy};
pub use error::AnalysisError;
pub use model::{ConfigKey, TimingCategory, TimingData};
pub use organize::{organize_by_size, OrganizedData, PlotPoint};
pub use plot::{plot_generation_timings, PlotSummary};
pub use reporter::{OutputFormat, Reporter};
pub use stats::{compute_statistics, StatsTable, TimingStats};
