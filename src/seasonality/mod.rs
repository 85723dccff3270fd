//! Seasonal decomposition of daily ride totals.
//!
//! Provides classical additive decomposition with an explicit seasonal
//! period and an explicit policy for calendar gaps and trend edges.

mod classical;

pub use classical::{
    DecompositionOutcome, DecompositionResult, SeasonalDecomposer, TrendEdges, DEFAULT_MIN_OBSERVATIONS,
    DEFAULT_PERIOD,
};
