//! Dashboard configuration.
//!
//! Every numeric policy of the pipeline is explicit here rather than left to
//! an implicit default. A TOML file may override any subset:
//!
//! ```toml
//! data_path = "main_data.csv"
//!
//! [classification]
//! low_quantile = 0.33
//! high_quantile = 0.66
//!
//! [decomposition]
//! period = 7
//! min_observations = 14
//! gap_fill = "zero"          # "zero" | "forward_fill" | "omit"
//! trend_edges = "extrapolate" # "extrapolate" | "missing"
//! ```

use crate::aggregation::GapFill;
use crate::classification::{UsageClassifier, DEFAULT_HIGH_QUANTILE, DEFAULT_LOW_QUANTILE};
use crate::error::{AnalyticsError, Result};
use crate::seasonality::{SeasonalDecomposer, TrendEdges, DEFAULT_MIN_OBSERVATIONS, DEFAULT_PERIOD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_DATA_PATH: &str = "main_data.csv";

/// Quantile cut points for usage classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassificationConfig {
    pub low_quantile: f64,
    pub high_quantile: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            low_quantile: DEFAULT_LOW_QUANTILE,
            high_quantile: DEFAULT_HIGH_QUANTILE,
        }
    }
}

/// Seasonal decomposition policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecompositionConfig {
    pub period: usize,
    pub min_observations: usize,
    pub gap_fill: GapFill,
    pub trend_edges: TrendEdges,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            min_observations: DEFAULT_MIN_OBSERVATIONS,
            gap_fill: GapFill::default(),
            trend_edges: TrendEdges::default(),
        }
    }
}

/// Configuration for one dashboard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// CSV file holding the ride table.
    pub data_path: PathBuf,
    pub classification: ClassificationConfig,
    pub decomposition: DecompositionConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            classification: ClassificationConfig::default(),
            decomposition: DecompositionConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Default policies reading from `data_path`.
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| AnalyticsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file. A relative `data_path` is resolved against the
    /// directory containing the file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| AnalyticsError::Config(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::from_toml_str(&source)?;

        if config.data_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.data_path = dir.join(&config.data_path);
            }
        }
        Ok(config)
    }

    pub fn with_data_path(mut self, data_path: impl Into<PathBuf>) -> Self {
        self.data_path = data_path.into();
        self
    }

    pub fn with_quantiles(mut self, low: f64, high: f64) -> Self {
        self.classification.low_quantile = low;
        self.classification.high_quantile = high;
        self
    }

    pub fn with_period(mut self, period: usize) -> Self {
        self.decomposition.period = period;
        self
    }

    pub fn with_min_observations(mut self, min_observations: usize) -> Self {
        self.decomposition.min_observations = min_observations;
        self
    }

    pub fn with_gap_fill(mut self, gap_fill: GapFill) -> Self {
        self.decomposition.gap_fill = gap_fill;
        self
    }

    pub fn with_trend_edges(mut self, trend_edges: TrendEdges) -> Self {
        self.decomposition.trend_edges = trend_edges;
        self
    }

    /// Check every policy value.
    pub fn validate(&self) -> Result<()> {
        self.classifier()?;
        self.decomposer()?;
        Ok(())
    }

    /// The usage classifier described by this configuration.
    pub fn classifier(&self) -> Result<UsageClassifier> {
        UsageClassifier::with_quantiles(
            self.classification.low_quantile,
            self.classification.high_quantile,
        )
        .map_err(into_config_error)
    }

    /// The seasonal decomposer described by this configuration.
    pub fn decomposer(&self) -> Result<SeasonalDecomposer> {
        let decomposition = &self.decomposition;
        Ok(SeasonalDecomposer::new()
            .with_period(decomposition.period)
            .map_err(into_config_error)?
            .with_min_observations(decomposition.min_observations)
            .with_gap_fill(decomposition.gap_fill)
            .with_trend_edges(decomposition.trend_edges))
    }
}

fn into_config_error(err: AnalyticsError) -> AnalyticsError {
    match err {
        AnalyticsError::InvalidParameter(message) => AnalyticsError::Config(message),
        other => other,
    }
}
