//! Daily aggregation of ride records.
//!
//! - `aggregate`: sum records per calendar day, keeping only days present
//! - `fill_calendar_gaps`: regularise a day sequence onto a contiguous calendar

mod daily;

pub use daily::{aggregate, fill_calendar_gaps, totals, DailyAggregate, GapFill};
