//! Per-day aggregation of ride records.

use crate::core::Record;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Summed ride counts for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyAggregate {
    date: NaiveDate,
    casual_count: u64,
    registered_count: u64,
    total_count: u64,
}

impl DailyAggregate {
    pub fn new(date: NaiveDate, casual_count: u64, registered_count: u64) -> Self {
        Self {
            date,
            casual_count,
            registered_count,
            total_count: casual_count.saturating_add(registered_count),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn casual_count(&self) -> u64 {
        self.casual_count
    }

    pub fn registered_count(&self) -> u64 {
        self.registered_count
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }
}

/// How days missing from a sequence are treated when a contiguous daily
/// calendar is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapFill {
    /// Leave the sequence as is; missing days stay missing.
    Omit,
    /// Insert missing days with zero rides.
    #[default]
    Zero,
    /// Insert missing days repeating the previous day's counts.
    ForwardFill,
}

/// Sum records per calendar day.
///
/// Returns one entry per distinct date present in `records`, ascending.
/// Days without records are not synthesized; see [`fill_calendar_gaps`].
pub fn aggregate(records: &[Record]) -> Vec<DailyAggregate> {
    let mut by_day: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();

    for record in records {
        let entry = by_day.entry(record.date()).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(record.casual_count());
        entry.1 = entry.1.saturating_add(record.registered_count());
    }

    by_day
        .into_iter()
        .map(|(date, (casual, registered))| DailyAggregate::new(date, casual, registered))
        .collect()
}

/// Regularise an ascending day sequence onto a contiguous daily calendar
/// spanning its first to last date.
pub fn fill_calendar_gaps(aggregates: &[DailyAggregate], fill: GapFill) -> Vec<DailyAggregate> {
    if fill == GapFill::Omit {
        return aggregates.to_vec();
    }

    let mut out: Vec<DailyAggregate> = Vec::with_capacity(aggregates.len());
    let mut filled = 0usize;

    for entry in aggregates {
        if let Some(prev) = out.last().copied() {
            let mut day = prev.date;
            while let Some(next) = day.succ_opt().filter(|d| *d < entry.date) {
                out.push(match fill {
                    GapFill::ForwardFill => {
                        DailyAggregate::new(next, prev.casual_count, prev.registered_count)
                    }
                    _ => DailyAggregate::new(next, 0, 0),
                });
                filled += 1;
                day = next;
            }
        }
        out.push(*entry);
    }

    if filled > 0 {
        debug!(filled, policy = ?fill, "filled missing calendar days");
    }
    out
}

/// Daily totals as floating point values, in sequence order.
pub fn totals(aggregates: &[DailyAggregate]) -> Vec<f64> {
    aggregates.iter().map(|a| a.total_count as f64).collect()
}
