//! Core data structures: ride records, the record store and date ranges.

mod range;
mod record;

pub use range::{filter, parse_date, DateRange, FilteredView};
pub use record::{Record, RecordStore};
