//! Usage intensity classification of daily aggregates.

mod usage;

pub use usage::{
    classify, ClassTally, ClassifiedAggregate, UsageClass, UsageClassifier, UsageReport,
    UsageThresholds, DEFAULT_HIGH_QUANTILE, DEFAULT_LOW_QUANTILE,
};
