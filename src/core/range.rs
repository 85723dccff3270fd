//! Date ranges and filtered views over the record store.

use crate::core::record::{Record, RecordStore};
use crate::error::{AnalyticsError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a calendar date, accepting ISO dates, slash-separated dates and
/// ISO date-times (the time of day is discarded).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn parse_bound(raw: &str, which: &str) -> Result<NaiveDate> {
    parse_date(raw).ok_or_else(|| {
        AnalyticsError::InvalidRange(format!("malformed {} date '{}'", which, raw))
    })
}

/// An inclusive calendar date interval with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting reversed bounds.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(AnalyticsError::InvalidRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a range from two textual bounds.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_bound(start, "start")?, parse_bound(end, "end")?)
    }

    /// Build a selection from optional textual bounds over the data `span`.
    ///
    /// Supplied bounds are parsed before the span is consulted, so a
    /// malformed bound is rejected even over an empty store. Each supplied
    /// bound is then clamped into `span` and a missing one takes the span's
    /// own bound. Returns `None` for the full span or when there is no data.
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        span: Option<DateRange>,
    ) -> Result<Option<Self>> {
        let start = start.map(|raw| parse_bound(raw, "start")).transpose()?;
        let end = end.map(|raw| parse_bound(raw, "end")).transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            Self::new(start, end)?;
        }

        let Some(span) = span else {
            return Ok(None);
        };
        if start.is_none() && end.is_none() {
            return Ok(None);
        }
        let clamp = |date: NaiveDate| date.clamp(span.start, span.end);
        Self::new(start.map_or(span.start, clamp), end.map_or(span.end, clamp)).map(Some)
    }

    /// A range covering exactly one day.
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Clamp both bounds into `span`.
    ///
    /// Clamping is monotone, so the result still satisfies `start <= end`.
    pub fn clamp_to(&self, span: &DateRange) -> DateRange {
        DateRange {
            start: self.start.clamp(span.start, span.end),
            end: self.end.clamp(span.start, span.end),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// A borrowed, contiguous run of records inside an inclusive date range.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    records: &'a [Record],
    range: Option<DateRange>,
}

impl<'a> FilteredView<'a> {
    /// Records inside the view, ascending by date.
    pub fn records(&self) -> &'a [Record] {
        self.records
    }

    /// The effective (clamped) range; `None` when the store was empty.
    pub fn range(&self) -> Option<DateRange> {
        self.range
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Select the records of `store` whose date lies in `range`.
///
/// Bounds outside the store's span are clamped to it, so this never fails.
pub fn filter(store: &RecordStore, range: DateRange) -> FilteredView<'_> {
    let Some(span) = store.full_range() else {
        return FilteredView {
            records: &[],
            range: None,
        };
    };

    let effective = range.clamp_to(&span);
    let records = store.records();
    let lo = records.partition_point(|r| r.date() < effective.start());
    let hi = records.partition_point(|r| r.date() <= effective.end());

    FilteredView {
        records: &records[lo..hi],
        range: Some(effective),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_with_gap() -> RecordStore {
        // Jan 1-5 and Jan 10-12, two rows on Jan 3
        let mut records: Vec<Record> = (1..=5)
            .chain(10..=12)
            .map(|d| Record::new(date(2011, 1, d), d as u64, 10))
            .collect();
        records.push(Record::new(date(2011, 1, 3), 1, 1));
        RecordStore::from_records(records)
    }

    #[test]
    fn parse_date_accepts_common_formats() {
        assert_eq!(parse_date("2011-01-05"), Some(date(2011, 1, 5)));
        assert_eq!(parse_date(" 2011/01/05 "), Some(date(2011, 1, 5)));
        assert_eq!(parse_date("01/05/2011"), Some(date(2011, 1, 5)));
        assert_eq!(parse_date("2011-01-05 17:30:00"), Some(date(2011, 1, 5)));
        assert_eq!(parse_date("2011-01-05T08:00:00"), Some(date(2011, 1, 5)));
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2011-13-01"), None);
    }

    #[test]
    fn range_rejects_reversed_bounds() {
        let err = DateRange::new(date(2011, 2, 1), date(2011, 1, 1)).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidRange(_)));
    }

    #[test]
    fn range_parse_reports_malformed_bound() {
        let err = DateRange::parse("2011-01-01", "not-a-date").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid date range: malformed end date 'not-a-date'"
        );
        let range = DateRange::parse("2011-01-01", "2011-01-31").unwrap();
        assert_eq!(range.days(), 31);
    }

    #[test]
    fn resolve_clamps_one_sided_bounds() {
        let span = DateRange::new(date(2011, 1, 1), date(2011, 1, 2)).unwrap();

        let late_start = DateRange::resolve(Some("2012-01-01"), None, Some(span)).unwrap();
        assert_eq!(late_start, Some(DateRange::single_day(date(2011, 1, 2))));

        let early_end = DateRange::resolve(None, Some("2010-06-01"), Some(span)).unwrap();
        assert_eq!(early_end, Some(DateRange::single_day(date(2011, 1, 1))));

        let both_wide =
            DateRange::resolve(Some("2010-01-01"), Some("2012-01-01"), Some(span)).unwrap();
        assert_eq!(both_wide, Some(span));
    }

    #[test]
    fn resolve_defaults_to_full_span() {
        let span = DateRange::new(date(2011, 1, 1), date(2011, 1, 31)).unwrap();
        assert_eq!(DateRange::resolve(None, None, Some(span)).unwrap(), None);

        let tail = DateRange::resolve(Some("2011-01-20"), None, Some(span)).unwrap();
        assert_eq!(tail, Some(DateRange::new(date(2011, 1, 20), date(2011, 1, 31)).unwrap()));
    }

    #[test]
    fn resolve_rejects_malformed_bound_without_data() {
        let err = DateRange::resolve(Some("garbage"), None, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid date range: malformed start date 'garbage'"
        );
        assert_eq!(DateRange::resolve(Some("2011-01-01"), None, None).unwrap(), None);
    }

    #[test]
    fn resolve_rejects_reversed_bounds() {
        let span = DateRange::new(date(2011, 1, 1), date(2011, 1, 31)).unwrap();
        let err =
            DateRange::resolve(Some("2011-01-20"), Some("2011-01-10"), Some(span)).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidRange(_)));
    }

    #[test]
    fn filter_is_inclusive() {
        let store = store_with_gap();
        let range = DateRange::new(date(2011, 1, 2), date(2011, 1, 4)).unwrap();
        let view = filter(&store, range);

        // Jan 2, Jan 3 (x2), Jan 4
        assert_eq!(view.len(), 4);
        assert!(view.records().iter().all(|r| range.contains(r.date())));
        assert_eq!(view.range(), Some(range));
    }

    #[test]
    fn filter_clamps_out_of_span_bounds() {
        let store = store_with_gap();
        let wide = DateRange::new(date(2010, 6, 1), date(2012, 6, 1)).unwrap();
        let view = filter(&store, wide);

        assert_eq!(view.len(), store.len());
        assert_eq!(view.range(), store.full_range());
    }

    #[test]
    fn filter_inside_gap_is_empty() {
        let store = store_with_gap();
        let range = DateRange::new(date(2011, 1, 6), date(2011, 1, 9)).unwrap();
        let view = filter(&store, range);
        assert!(view.is_empty());
        assert_eq!(view.range(), Some(range));
    }

    #[test]
    fn filter_beyond_span_clamps_to_last_day() {
        let store = store_with_gap();
        let range = DateRange::new(date(2011, 3, 1), date(2011, 3, 5)).unwrap();
        let view = filter(&store, range);
        assert_eq!(view.range(), Some(DateRange::single_day(date(2011, 1, 12))));
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn filter_on_empty_store() {
        let store = RecordStore::default();
        let range = DateRange::single_day(date(2011, 1, 1));
        let view = filter(&store, range);
        assert!(view.is_empty());
        assert!(view.range().is_none());
    }
}
