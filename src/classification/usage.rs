//! Quantile-based Low/Medium/High usage classification.

use crate::aggregation::{totals, DailyAggregate};
use crate::error::{AnalyticsError, Result};
use crate::utils::quantile;
use chrono::Datelike;
use serde::Serialize;
use std::fmt;

/// Default lower quantile separating Low from Medium.
pub const DEFAULT_LOW_QUANTILE: f64 = 0.33;
/// Default upper quantile separating Medium from High.
pub const DEFAULT_HIGH_QUANTILE: f64 = 0.66;

/// Usage intensity of a day relative to the current range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum UsageClass {
    Low,
    Medium,
    High,
}

impl UsageClass {
    pub const ALL: [UsageClass; 3] = [UsageClass::Low, UsageClass::Medium, UsageClass::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            UsageClass::Low => "Low",
            UsageClass::Medium => "Medium",
            UsageClass::High => "High",
        }
    }
}

impl fmt::Display for UsageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per usage class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ClassTally<T> {
    pub low: T,
    pub medium: T,
    pub high: T,
}

impl<T: Copy> ClassTally<T> {
    pub fn get(&self, class: UsageClass) -> T {
        match class {
            UsageClass::Low => self.low,
            UsageClass::Medium => self.medium,
            UsageClass::High => self.high,
        }
    }

    fn get_mut(&mut self, class: UsageClass) -> &mut T {
        match class {
            UsageClass::Low => &mut self.low,
            UsageClass::Medium => &mut self.medium,
            UsageClass::High => &mut self.high,
        }
    }
}

/// Cut points between the usage classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UsageThresholds {
    /// Totals at or below this are Low.
    pub low: f64,
    /// Totals above `low` and at or below this are Medium.
    pub high: f64,
}

impl UsageThresholds {
    pub fn classify(&self, total: u64) -> UsageClass {
        let total = total as f64;
        if total <= self.low {
            UsageClass::Low
        } else if total <= self.high {
            UsageClass::Medium
        } else {
            UsageClass::High
        }
    }
}

/// A daily aggregate with its usage class and weekday (Monday = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassifiedAggregate {
    #[serde(flatten)]
    pub aggregate: DailyAggregate,
    pub usage_class: UsageClass,
    pub weekday: u32,
}

/// Classification of one filtered range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageReport {
    /// `None` when there was nothing to classify.
    pub thresholds: Option<UsageThresholds>,
    pub entries: Vec<ClassifiedAggregate>,
    /// Sum of daily totals per class.
    pub class_totals: ClassTally<u64>,
    /// Number of days per class, indexed by weekday (Monday = 0).
    pub weekday_counts: [ClassTally<usize>; 7],
}

impl UsageReport {
    fn empty() -> Self {
        Self {
            thresholds: None,
            entries: Vec::new(),
            class_totals: ClassTally::default(),
            weekday_counts: [ClassTally::default(); 7],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of days in `class`.
    pub fn count(&self, class: UsageClass) -> usize {
        self.entries
            .iter()
            .filter(|e| e.usage_class == class)
            .count()
    }
}

/// Labels days Low/Medium/High from within-range quantiles of their totals.
///
/// Thresholds are computed fresh on every call. A single day has no spread
/// to rank against and is always classified Medium.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageClassifier {
    low_quantile: f64,
    high_quantile: f64,
}

impl UsageClassifier {
    pub fn new() -> Self {
        Self {
            low_quantile: DEFAULT_LOW_QUANTILE,
            high_quantile: DEFAULT_HIGH_QUANTILE,
        }
    }

    /// Use custom quantiles; requires `0 <= low <= high <= 1`.
    pub fn with_quantiles(low: f64, high: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low > high {
            return Err(AnalyticsError::InvalidParameter(format!(
                "usage quantiles must satisfy 0 <= low <= high <= 1, got {} and {}",
                low, high
            )));
        }
        Ok(Self {
            low_quantile: low,
            high_quantile: high,
        })
    }

    pub fn low_quantile(&self) -> f64 {
        self.low_quantile
    }

    pub fn high_quantile(&self) -> f64 {
        self.high_quantile
    }

    /// Thresholds over `aggregates`, `None` when empty.
    pub fn thresholds(&self, aggregates: &[DailyAggregate]) -> Option<UsageThresholds> {
        if aggregates.is_empty() {
            return None;
        }
        let values = totals(aggregates);
        Some(UsageThresholds {
            low: quantile(&values, self.low_quantile),
            high: quantile(&values, self.high_quantile),
        })
    }

    /// Classify every day in `aggregates`, preserving order.
    pub fn classify(&self, aggregates: &[DailyAggregate]) -> UsageReport {
        let Some(thresholds) = self.thresholds(aggregates) else {
            return UsageReport::empty();
        };
        let single = aggregates.len() == 1;

        let mut report = UsageReport::empty();
        report.thresholds = Some(thresholds);

        for aggregate in aggregates {
            let usage_class = if single {
                UsageClass::Medium
            } else {
                thresholds.classify(aggregate.total_count())
            };
            let weekday = aggregate.date().weekday().num_days_from_monday();

            let total = report.class_totals.get_mut(usage_class);
            *total = total.saturating_add(aggregate.total_count());
            *report.weekday_counts[weekday as usize].get_mut(usage_class) += 1;

            report.entries.push(ClassifiedAggregate {
                aggregate: *aggregate,
                usage_class,
                weekday,
            });
        }

        report
    }
}

impl Default for UsageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify with the default 33rd/66th percentile thresholds.
pub fn classify(aggregates: &[DailyAggregate]) -> UsageReport {
    UsageClassifier::new().classify(aggregates)
}
