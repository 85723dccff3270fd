//! Classical additive seasonal decomposition of daily ride totals.
//!
//! The observed series is split as `observed = trend + seasonal + residual`:
//! - Trend: centred moving average over one seasonal period
//! - Seasonal: per-cycle-position mean of the detrended series, centred on zero
//! - Residual: what remains

use crate::aggregation::{fill_calendar_gaps, totals, DailyAggregate, GapFill};
use crate::error::{AnalyticsError, Result};
use crate::utils::{linear_fit, nan_mean, variance};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Weekly seasonality on daily data.
pub const DEFAULT_PERIOD: usize = 7;
/// Fewest aggregated days accepted for decomposition.
pub const DEFAULT_MIN_OBSERVATIONS: usize = 14;

/// How the trend is completed where the centred window does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendEdges {
    /// Extend a least-squares line fitted over the nearest period of trend values.
    #[default]
    Extrapolate,
    /// Leave edge trend (and residual) values as NaN.
    Missing,
}

/// Components of an additive decomposition, aligned with `dates`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecompositionResult {
    /// Seasonal period used.
    pub period: usize,
    /// Day index of every component.
    pub dates: Vec<NaiveDate>,
    pub observed: Vec<f64>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<f64>,
}

impl DecompositionResult {
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Get the seasonal strength (0 to 1).
    /// Values close to 1 indicate strong seasonality.
    pub fn seasonal_strength(&self) -> f64 {
        strength(&self.seasonal, &self.residual)
    }

    /// Get the trend strength (0 to 1).
    /// Values close to 1 indicate strong trend.
    pub fn trend_strength(&self) -> f64 {
        strength(&self.trend, &self.residual)
    }
}

/// `max(0, 1 - Var(R) / Var(C + R))` over positions where both are finite.
fn strength(component: &[f64], residual: &[f64]) -> f64 {
    let (with_residual, residual): (Vec<f64>, Vec<f64>) = component
        .iter()
        .zip(residual.iter())
        .filter(|(c, r)| c.is_finite() && r.is_finite())
        .map(|(c, r)| (c + r, *r))
        .unzip();

    let var_total = variance(&with_residual);
    if var_total.is_nan() || var_total < 1e-10 {
        return 0.0;
    }
    (1.0 - variance(&residual) / var_total).max(0.0)
}

/// Outcome of a decomposition request.
///
/// Too few days is an ordinary, reportable outcome rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecompositionOutcome {
    Decomposed(DecompositionResult),
    InsufficientData { available: usize, required: usize },
}

impl DecompositionOutcome {
    pub fn result(&self) -> Option<&DecompositionResult> {
        match self {
            DecompositionOutcome::Decomposed(result) => Some(result),
            DecompositionOutcome::InsufficientData { .. } => None,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, DecompositionOutcome::InsufficientData { .. })
    }
}

/// Additive decomposition configuration and algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalDecomposer {
    period: usize,
    min_observations: usize,
    gap_fill: GapFill,
    trend_edges: TrendEdges,
}

impl SeasonalDecomposer {
    /// Weekly period, 14-day minimum, zero-filled gaps, extrapolated trend edges.
    pub fn new() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            min_observations: DEFAULT_MIN_OBSERVATIONS,
            gap_fill: GapFill::default(),
            trend_edges: TrendEdges::default(),
        }
    }

    /// Set the seasonal period (at least 2).
    pub fn with_period(mut self, period: usize) -> Result<Self> {
        if period < 2 {
            return Err(AnalyticsError::InvalidParameter(format!(
                "seasonal period must be at least 2, got {}",
                period
            )));
        }
        self.period = period;
        Ok(self)
    }

    pub fn with_min_observations(mut self, min_observations: usize) -> Self {
        self.min_observations = min_observations;
        self
    }

    pub fn with_gap_fill(mut self, gap_fill: GapFill) -> Self {
        self.gap_fill = gap_fill;
        self
    }

    pub fn with_trend_edges(mut self, trend_edges: TrendEdges) -> Self {
        self.trend_edges = trend_edges;
        self
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Days needed before decomposing: the configured minimum, raised to
    /// two full seasonal cycles when that is larger.
    pub fn required_observations(&self) -> usize {
        self.min_observations.max(2 * self.period)
    }

    /// Decompose the daily totals of `aggregates`.
    pub fn decompose(&self, aggregates: &[DailyAggregate]) -> DecompositionOutcome {
        let required = self.required_observations();
        if aggregates.len() < required {
            debug!(
                available = aggregates.len(),
                required, "not enough days for seasonal decomposition"
            );
            return DecompositionOutcome::InsufficientData {
                available: aggregates.len(),
                required,
            };
        }

        let series = fill_calendar_gaps(aggregates, self.gap_fill);
        let dates: Vec<NaiveDate> = series.iter().map(|a| a.date()).collect();
        let observed = totals(&series);

        let mut trend = centered_moving_average(&observed, self.period);
        if self.trend_edges == TrendEdges::Extrapolate {
            extrapolate_edges(&mut trend, self.period);
        }

        let detrended: Vec<f64> = observed
            .iter()
            .zip(trend.iter())
            .map(|(y, t)| y - t)
            .collect();
        let seasonal = seasonal_component(&detrended, self.period);

        let residual: Vec<f64> = observed
            .iter()
            .zip(trend.iter())
            .zip(seasonal.iter())
            .map(|((y, t), s)| y - t - s)
            .collect();

        debug!(
            days = observed.len(),
            period = self.period,
            "decomposed daily totals"
        );

        DecompositionOutcome::Decomposed(DecompositionResult {
            period: self.period,
            dates,
            observed,
            trend,
            seasonal,
            residual,
        })
    }
}

impl Default for SeasonalDecomposer {
    fn default() -> Self {
        Self::new()
    }
}

/// Centred moving average over one period.
///
/// Odd periods use `period` equal weights. Even periods use the 2×period
/// filter: `period + 1` taps with half weight on both ends. Positions
/// without a full window are NaN.
fn centered_moving_average(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let half = period / 2;
    let weights: Vec<f64> = if period % 2 == 0 {
        let mut w = vec![1.0 / period as f64; period + 1];
        w[0] = 0.5 / period as f64;
        w[period] = 0.5 / period as f64;
        w
    } else {
        vec![1.0 / period as f64; period]
    };

    let mut trend = vec![f64::NAN; n];
    if n < weights.len() {
        return trend;
    }
    for i in half..n - half {
        trend[i] = values[i - half..=i + half]
            .iter()
            .zip(weights.iter())
            .map(|(v, w)| v * w)
            .sum();
    }
    trend
}

/// Fill NaN trend edges from lines fitted over the nearest `period` values.
fn extrapolate_edges(trend: &mut [f64], period: usize) {
    let finite: Vec<usize> = (0..trend.len()).filter(|&i| trend[i].is_finite()).collect();
    let (Some(&first), Some(&last)) = (finite.first(), finite.last()) else {
        return;
    };
    let window = period.min(finite.len());

    let head = &finite[..window];
    let tail = &finite[finite.len() - window..];
    let head_line = fit_indices(trend, head);
    let tail_line = fit_indices(trend, tail);

    let first_value = trend[first];
    let last_value = trend[last];
    for i in 0..first {
        trend[i] = head_line.map_or(first_value, |(a, b)| a + b * i as f64);
    }
    for i in last + 1..trend.len() {
        trend[i] = tail_line.map_or(last_value, |(a, b)| a + b * i as f64);
    }
}

fn fit_indices(values: &[f64], indices: &[usize]) -> Option<(f64, f64)> {
    let xs: Vec<f64> = indices.iter().map(|&i| i as f64).collect();
    let ys: Vec<f64> = indices.iter().map(|&i| values[i]).collect();
    linear_fit(&xs, &ys)
}

/// Mean detrended value at each cycle position, centred to sum to zero and
/// tiled across the series.
fn seasonal_component(detrended: &[f64], period: usize) -> Vec<f64> {
    let mut cycle: Vec<f64> = (0..period)
        .map(|pos| {
            let at_pos: Vec<f64> = detrended.iter().skip(pos).step_by(period).copied().collect();
            let m = nan_mean(&at_pos);
            if m.is_nan() {
                0.0
            } else {
                m
            }
        })
        .collect();

    let centre = cycle.iter().sum::<f64>() / period as f64;
    for c in cycle.iter_mut() {
        *c -= centre;
    }

    (0..detrended.len()).map(|i| cycle[i % period]).collect()
}
