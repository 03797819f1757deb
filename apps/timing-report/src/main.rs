//! PHOLD timing report binary
//!
//! Collects the timing artifacts of a PHOLD sweep, prints a summary and
//! renders the generation timing comparison plot.

use anyhow::{Context, Result};
use clap::Parser;
use phold_timings::{
    collect_timing_data, compute_statistics, organize_by_size, plot_generation_timings,
    AnalysisConfig, OutputFormat, PlotMetric, Reporter, WarnPolicy,
};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "timing-report")]
#[command(version, about = "Summarize and plot PHOLD benchmark sweep timings")]
struct Args {
    /// Directory holding one subdirectory per run (default: output)
    root: Option<PathBuf>,

    /// Plot output path; .svg selects SVG, anything else PNG
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write the statistics as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Statistic to plot: mean, min or max
    #[arg(long)]
    metric: Option<PlotMetric>,

    /// Skip rendering the plot
    #[arg(long)]
    no_plot: bool,

    /// Warn about every timing file that yields no value
    #[arg(long, conflicts_with = "warn_build_only")]
    strict_warnings: bool,

    /// Only warn about build timing files that yield no value
    #[arg(long)]
    warn_build_only: bool,
}

impl Args {
    /// File (or default) configuration with command-line overrides applied
    fn into_config(self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)?,
            None => AnalysisConfig::default(),
        };

        if let Some(root) = self.root {
            config.input.root = root;
        }
        if let Some(plot) = self.output {
            config.output.plot = plot;
        }
        if let Some(json) = self.json {
            config.output.json = Some(json);
        }
        if let Some(metric) = self.metric {
            config.plot.metric = metric;
        }
        if self.strict_warnings {
            config.input.warn_policy = WarnPolicy::All;
        } else if self.warn_build_only {
            config.input.warn_policy = WarnPolicy::BuildOnly;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the summary only
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let no_plot = args.no_plot;
    let config = args.into_config()?;
    run(&config, no_plot, &mut std::io::stdout().lock())
}

/// Collect, summarize and plot; summary text goes to `out`.
fn run<W: Write>(config: &AnalysisConfig, no_plot: bool, out: &mut W) -> Result<()> {
    tracing::info!("Reading timings from {}", config.input.root.display());

    let data = collect_timing_data(config).context("Failed to collect timing data")?;
    if data.is_empty() {
        tracing::info!("No timing data under {}", config.input.root.display());
        writeln!(out, "No timing data found in output directory!")?;
        return Ok(());
    }
    writeln!(out, "Found {} configurations", data.len())?;

    let stats = compute_statistics(&data);
    Reporter::new(OutputFormat::Console).write_to(&stats, out)?;

    if let Some(json_path) = &config.output.json {
        Reporter::new(OutputFormat::JsonPretty).write_to_file(&stats, json_path)?;
        tracing::info!("Wrote statistics to {}", json_path.display());
    }

    if no_plot {
        return Ok(());
    }

    let organized = organize_by_size(&stats);
    let summary = plot_generation_timings(&organized, &config.plot, &config.output.plot)
        .with_context(|| format!("Failed to plot {}", config.output.plot.display()))?;
    tracing::info!(
        "Plotted {} of {} ({} subplots)",
        config.plot.metric.name(),
        config.output.plot.display(),
        summary.subplots
    );

    Ok(())
}
