//! bikeshare-report
//!
//! Command-line front end: loads a ride table once, runs the dashboard
//! pipeline for one date range and mode, and prints the result.
//!
//! ```bash
//! bikeshare-report --data day.csv --start 2011-03-01 --end 2011-06-30 --mode usage
//! bikeshare-report --config dashboard.toml --format json --pretty
//! RUST_LOG=debug bikeshare-report --data hour.csv
//! ```

use anyhow::Context;
use bikeshare_insights::config::DashboardConfig;
use bikeshare_insights::core::DateRange;
use bikeshare_insights::dashboard::{AnalysisMode, Dashboard};
use bikeshare_insights::render::{renderer_for, OutputFormat};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bikeshare-report")]
#[command(about = "Daily bike-sharing usage report", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV ride table (overrides the configured data path)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// First day of the range (defaults to the first day in the data)
    #[arg(long)]
    start: Option<String>,

    /// Last day of the range (defaults to the last day in the data)
    #[arg(long)]
    end: Option<String>,

    /// Analysis mode (overview, categories, usage, time-series, full)
    #[arg(short, long, default_value = "full")]
    mode: AnalysisMode,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(data) = cli.data {
        config = config.with_data_path(data);
    }

    let dashboard = Dashboard::open(config).context("opening ride table")?;
    let range = DateRange::resolve(
        cli.start.as_deref(),
        cli.end.as_deref(),
        dashboard.full_range(),
    )?;
    info!(mode = %cli.mode, format = %cli.format, "rendering report");

    let view = dashboard.view(range, cli.mode);
    let renderer = renderer_for(cli.format, cli.pretty);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    renderer.render(&view, &mut out)?;
    out.flush()?;
    Ok(())
}
