//! # bikeshare-insights
//!
//! Analytics core for a bike-sharing usage dashboard.
//!
//! Loads a table of ride counts, filters it to a date range, aggregates it
//! per day, labels each day's usage intensity from within-range quantiles,
//! and decomposes the daily totals into trend, seasonal and residual parts.
//!
//! ```
//! use bikeshare_insights::prelude::*;
//!
//! let csv = "dteday,casual,registered\n2011-01-01,331,654\n2011-01-02,131,670\n";
//! let store = RecordStore::from_reader(csv.as_bytes()).unwrap();
//! let dashboard = Dashboard::new(store, DashboardConfig::default()).unwrap();
//!
//! let view = dashboard.view(None, AnalysisMode::Full);
//! assert_eq!(view.summary.total_rides, 1786);
//! assert!(view.decomposition.unwrap().is_insufficient());
//! ```

#![allow(clippy::needless_range_loop)]

pub mod aggregation;
pub mod classification;
pub mod config;
pub mod core;
pub mod dashboard;
pub mod error;
pub mod render;
pub mod seasonality;
pub mod utils;

pub use error::{AnalyticsError, DataLoadError, Result};

pub mod prelude {
    pub use crate::aggregation::{aggregate, DailyAggregate, GapFill};
    pub use crate::classification::{classify, UsageClass, UsageClassifier, UsageReport};
    pub use crate::config::DashboardConfig;
    pub use crate::core::{DateRange, Record, RecordStore};
    pub use crate::dashboard::{AnalysisMode, Dashboard, DashboardView, RideSummary};
    pub use crate::error::{AnalyticsError, DataLoadError, Result};
    pub use crate::render::{renderer_for, OutputFormat, Renderer};
    pub use crate::seasonality::{DecompositionOutcome, DecompositionResult, SeasonalDecomposer};
}
