//! The dashboard session: one loaded store, one configuration, and the
//! recomputation that turns a date range and mode into a view.

use crate::aggregation::{aggregate, DailyAggregate};
use crate::classification::{UsageClassifier, UsageReport};
use crate::config::DashboardConfig;
use crate::core::{DateRange, RecordStore};
use crate::error::{AnalyticsError, Result};
use crate::seasonality::{DecompositionOutcome, SeasonalDecomposer};
use crate::utils::mean;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Which derived views a recomputation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisMode {
    /// Ride totals and the daily series.
    Overview,
    /// Casual vs registered breakdown of the daily series.
    Categories,
    /// Adds Low/Medium/High usage classification.
    Usage,
    /// Adds usage statistics and seasonal decomposition.
    TimeSeries,
    /// Everything.
    #[default]
    Full,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 5] = [
        AnalysisMode::Overview,
        AnalysisMode::Categories,
        AnalysisMode::Usage,
        AnalysisMode::TimeSeries,
        AnalysisMode::Full,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Overview => "overview",
            AnalysisMode::Categories => "categories",
            AnalysisMode::Usage => "usage",
            AnalysisMode::TimeSeries => "time-series",
            AnalysisMode::Full => "full",
        }
    }

    pub fn includes_usage(&self) -> bool {
        matches!(
            self,
            AnalysisMode::Usage | AnalysisMode::TimeSeries | AnalysisMode::Full
        )
    }

    pub fn includes_decomposition(&self) -> bool {
        matches!(self, AnalysisMode::TimeSeries | AnalysisMode::Full)
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "overview" => Ok(AnalysisMode::Overview),
            "categories" => Ok(AnalysisMode::Categories),
            "usage" => Ok(AnalysisMode::Usage),
            "time-series" | "timeseries" => Ok(AnalysisMode::TimeSeries),
            "full" | "all" => Ok(AnalysisMode::Full),
            other => Err(AnalyticsError::InvalidParameter(format!(
                "unknown analysis mode '{}'",
                other
            ))),
        }
    }
}

/// Headline metrics over the daily series of a range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideSummary {
    pub days: usize,
    pub total_rides: u64,
    pub casual_rides: u64,
    pub registered_rides: u64,
    pub mean_daily: Option<f64>,
    pub min_daily: Option<u64>,
    pub max_daily: Option<u64>,
}

impl RideSummary {
    pub fn from_daily(daily: &[DailyAggregate]) -> Self {
        let sum = |f: fn(&DailyAggregate) -> u64| {
            daily.iter().fold(0u64, |acc, d| acc.saturating_add(f(d)))
        };
        let day_totals: Vec<f64> = daily.iter().map(|d| d.total_count() as f64).collect();

        Self {
            days: daily.len(),
            total_rides: sum(DailyAggregate::total_count),
            casual_rides: sum(DailyAggregate::casual_count),
            registered_rides: sum(DailyAggregate::registered_count),
            mean_daily: (!daily.is_empty()).then(|| mean(&day_totals)),
            min_daily: daily.iter().map(|d| d.total_count()).min(),
            max_daily: daily.iter().map(|d| d.total_count()).max(),
        }
    }
}

/// Everything one recomputation produces for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub mode: AnalysisMode,
    /// Effective (clamped) range; `None` when the store is empty.
    pub range: Option<DateRange>,
    pub summary: RideSummary,
    pub daily: Vec<DailyAggregate>,
    pub usage: Option<UsageReport>,
    pub decomposition: Option<DecompositionOutcome>,
}

/// A dashboard session over an immutable record store.
#[derive(Debug, Clone)]
pub struct Dashboard {
    store: RecordStore,
    config: DashboardConfig,
    classifier: UsageClassifier,
    decomposer: SeasonalDecomposer,
}

impl Dashboard {
    /// Load the store named by `config` and start a session.
    pub fn open(config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        let store = RecordStore::load(&config.data_path)?;
        Self::new(store, config)
    }

    /// Start a session over an already loaded store.
    pub fn new(store: RecordStore, config: DashboardConfig) -> Result<Self> {
        let classifier = config.classifier()?;
        let decomposer = config.decomposer()?;
        Ok(Self {
            store,
            config,
            classifier,
            decomposer,
        })
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The full data span, used when the selection is reset.
    pub fn full_range(&self) -> Option<DateRange> {
        self.store.full_range()
    }

    /// Run the pipeline for `range` (`None` for the full span) and `mode`.
    pub fn view(&self, range: Option<DateRange>, mode: AnalysisMode) -> DashboardView {
        let Some(requested) = range.or_else(|| self.full_range()) else {
            debug!(%mode, "empty record store");
            return DashboardView {
                mode,
                range: None,
                summary: RideSummary::from_daily(&[]),
                daily: Vec::new(),
                usage: mode.includes_usage().then(|| self.classifier.classify(&[])),
                decomposition: mode
                    .includes_decomposition()
                    .then(|| self.decomposer.decompose(&[])),
            };
        };

        let filtered = self.store.filter(requested);
        let daily = aggregate(filtered.records());
        debug!(
            %mode,
            requested = %requested,
            rows = filtered.len(),
            days = daily.len(),
            "recomputed dashboard view"
        );

        DashboardView {
            mode,
            range: filtered.range(),
            summary: RideSummary::from_daily(&daily),
            usage: mode.includes_usage().then(|| self.classifier.classify(&daily)),
            decomposition: mode
                .includes_decomposition()
                .then(|| self.decomposer.decompose(&daily)),
            daily,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Record;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dashboard(days: u32) -> Dashboard {
        let records = (1..=days)
            .map(|d| Record::new(date(2011, 1, d), 10 * d as u64, 50 + 10 * d as u64))
            .collect();
        Dashboard::new(RecordStore::from_records(records), DashboardConfig::default()).unwrap()
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("Usage".parse::<AnalysisMode>().unwrap(), AnalysisMode::Usage);
        assert_eq!(
            "time_series".parse::<AnalysisMode>().unwrap(),
            AnalysisMode::TimeSeries
        );
        assert_eq!("all".parse::<AnalysisMode>().unwrap(), AnalysisMode::Full);
        assert!("pie-chart".parse::<AnalysisMode>().is_err());
        for mode in AnalysisMode::ALL {
            assert_eq!(mode.as_str().parse::<AnalysisMode>().unwrap(), mode);
        }
    }

    #[test]
    fn serialised_mode_parses_back() {
        for mode in AnalysisMode::ALL {
            let json = serde_json::to_value(mode).unwrap();
            assert_eq!(json, mode.as_str());
            let name = json.as_str().unwrap();
            assert_eq!(name.parse::<AnalysisMode>().unwrap(), mode);
        }
        assert_eq!(
            serde_json::to_value(AnalysisMode::TimeSeries).unwrap(),
            "time-series"
        );
    }

    #[test]
    fn overview_skips_usage_and_decomposition() {
        let view = dashboard(20).view(None, AnalysisMode::Overview);
        assert_eq!(view.daily.len(), 20);
        assert!(view.usage.is_none());
        assert!(view.decomposition.is_none());
    }

    #[test]
    fn summary_metrics() {
        let view = dashboard(3).view(None, AnalysisMode::Categories);
        // casual 10, 20, 30; registered 60, 70, 80
        assert_eq!(view.summary.casual_rides, 60);
        assert_eq!(view.summary.registered_rides, 210);
        assert_eq!(view.summary.total_rides, 270);
        assert_eq!(view.summary.min_daily, Some(70));
        assert_eq!(view.summary.max_daily, Some(110));
        assert_eq!(view.summary.mean_daily, Some(90.0));
    }

    #[test]
    fn narrowed_range_reports_insufficient_data() {
        let dash = dashboard(20);
        let range = DateRange::new(date(2011, 1, 1), date(2011, 1, 10)).unwrap();
        let view = dash.view(Some(range), AnalysisMode::TimeSeries);

        assert_eq!(view.range, Some(range));
        assert_eq!(view.usage.as_ref().map(|u| u.len()), Some(10));
        assert_eq!(
            view.decomposition,
            Some(DecompositionOutcome::InsufficientData {
                available: 10,
                required: 14
            })
        );
    }

    #[test]
    fn empty_store_flows_through() {
        let dash = Dashboard::new(RecordStore::default(), DashboardConfig::default()).unwrap();
        let view = dash.view(None, AnalysisMode::Full);

        assert!(view.range.is_none());
        assert_eq!(view.summary.days, 0);
        assert_eq!(view.summary.mean_daily, None);
        assert!(view.usage.unwrap().is_empty());
        assert_eq!(
            view.decomposition,
            Some(DecompositionOutcome::InsufficientData {
                available: 0,
                required: 14
            })
        );
    }

    #[test]
    fn open_reports_missing_source() {
        let config = DashboardConfig::new("/no/such/rides.csv");
        assert!(matches!(
            Dashboard::open(config),
            Err(AnalyticsError::DataLoad(_))
        ));
    }
}
