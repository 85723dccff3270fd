//! Plain-text presentation adapter.

use super::{io_error, Renderer};
use crate::classification::{UsageClass, UsageReport};
use crate::dashboard::{DashboardView, RideSummary};
use crate::error::Result;
use crate::seasonality::DecompositionOutcome;
use std::io::Write;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Human-readable report with one section per computed view.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TextRenderer {
    fn render(&self, view: &DashboardView, out: &mut dyn Write) -> Result<()> {
        write_report(view, out).map_err(io_error)
    }
}

fn write_report(view: &DashboardView, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "Bike Sharing Dashboard")?;
    match view.range {
        Some(range) => writeln!(
            out,
            "Date range: {} — {}",
            range.start().format("%B %d, %Y"),
            range.end().format("%B %d, %Y")
        )?,
        None => writeln!(out, "Date range: no data loaded")?,
    }
    writeln!(out, "Mode: {}", view.mode)?;

    let categories = view.mode != crate::dashboard::AnalysisMode::Overview;
    write_rides(&view.summary, categories, out)?;
    write_daily(view, categories, out)?;

    if let Some(usage) = &view.usage {
        write_usage(usage, out)?;
    }
    if let Some(outcome) = &view.decomposition {
        write_time_series(&view.summary, outcome, out)?;
    }
    Ok(())
}

fn write_rides(summary: &RideSummary, categories: bool, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Rides")?;
    writeln!(out, "  {:<18} {:>10}", "Total rides", summary.total_rides)?;
    if categories {
        writeln!(out, "  {:<18} {:>10}", "Casual rides", summary.casual_rides)?;
        writeln!(out, "  {:<18} {:>10}", "Registered rides", summary.registered_rides)?;
    }
    Ok(())
}

fn write_daily(view: &DashboardView, categories: bool, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Daily rides ({} days)", view.daily.len())?;
    if categories {
        writeln!(out, "  {:<10} {:>8} {:>11} {:>8}", "date", "casual", "registered", "total")?;
        for day in &view.daily {
            writeln!(
                out,
                "  {:<10} {:>8} {:>11} {:>8}",
                day.date().to_string(),
                day.casual_count(),
                day.registered_count(),
                day.total_count()
            )?;
        }
    } else {
        writeln!(out, "  {:<10} {:>8}", "date", "total")?;
        for day in &view.daily {
            writeln!(out, "  {:<10} {:>8}", day.date().to_string(), day.total_count())?;
        }
    }
    Ok(())
}

fn write_usage(usage: &UsageReport, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Rides classified by usage")?;
    let Some(thresholds) = usage.thresholds else {
        writeln!(out, "  no days to classify")?;
        return Ok(());
    };
    writeln!(
        out,
        "  thresholds: Low <= {:.2} < Medium <= {:.2} < High",
        thresholds.low, thresholds.high
    )?;
    for class in UsageClass::ALL {
        writeln!(
            out,
            "  {:<13} {:>10} rides over {} days",
            format!("{} usage", class),
            usage.class_totals.get(class),
            usage.count(class)
        )?;
    }

    writeln!(out, "  {:<10} {:>5} {:>7} {:>5}", "weekday", "Low", "Medium", "High")?;
    for (name, tally) in WEEKDAYS.iter().zip(usage.weekday_counts.iter()) {
        writeln!(
            out,
            "  {:<10} {:>5} {:>7} {:>5}",
            name, tally.low, tally.medium, tally.high
        )?;
    }
    Ok(())
}

fn write_time_series(
    summary: &RideSummary,
    outcome: &DecompositionOutcome,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Time series")?;
    if let (Some(mean), Some(min), Some(max)) =
        (summary.mean_daily, summary.min_daily, summary.max_daily)
    {
        writeln!(out, "  {:<15} {:>10.2}", "Average rides", mean)?;
        writeln!(out, "  {:<15} {:>10}", "Minimum", min)?;
        writeln!(out, "  {:<15} {:>10}", "Maximum", max)?;
    }

    match outcome {
        DecompositionOutcome::InsufficientData {
            available,
            required,
        } => writeln!(
            out,
            "  not enough data for seasonal decomposition: only {} of {} observations available; try widening the date range",
            available, required
        )?,
        DecompositionOutcome::Decomposed(result) => {
            writeln!(out, "  additive decomposition, period {}", result.period)?;
            writeln!(
                out,
                "  {:<10} {:>10} {:>10} {:>10} {:>10}",
                "date", "observed", "trend", "seasonal", "residual"
            )?;
            for i in 0..result.len() {
                writeln!(
                    out,
                    "  {:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
                    result.dates[i].to_string(),
                    result.observed[i],
                    result.trend[i],
                    result.seasonal[i],
                    result.residual[i]
                )?;
            }
            writeln!(
                out,
                "  seasonal strength {:.3}, trend strength {:.3}",
                result.seasonal_strength(),
                result.trend_strength()
            )?;
        }
    }
    Ok(())
}
