//! Utility functions shared by the pipeline stages.

pub mod stats;

pub use stats::{linear_fit, mean, nan_mean, quantile, variance};
