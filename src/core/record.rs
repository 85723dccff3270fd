//! Ride records and the in-memory record store.

use crate::core::range::{self, parse_date, DateRange, FilteredView};
use crate::error::{DataLoadError, Result};
use chrono::NaiveDate;
use csv::StringRecord;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

const DATE_COLUMN: &str = "dteday";
const CASUAL_COLUMN: &str = "casual";
const REGISTERED_COLUMN: &str = "registered";
const TOTAL_COLUMN: &str = "cnt";

/// One row of ride counts.
///
/// The total is always derived from the casual and registered counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Record {
    date: NaiveDate,
    casual_count: u64,
    registered_count: u64,
    total_count: u64,
}

impl Record {
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

/// Immutable table of records sorted ascending by date.
///
/// Duplicate dates are legal (e.g. hourly rows); their relative order from
/// the source is preserved.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Build a store from records in any order.
    pub fn from_records(mut records: Vec<Record>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    /// Load a store from a CSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataLoadError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        let file = File::open(path)
            .map_err(|e| DataLoadError::Unreadable(format!("{}: {}", path.display(), e)))?;

        let store = Self::from_reader(BufReader::new(file))?;
        match store.full_range() {
            Some(span) => info!(
                path = %path.display(),
                rows = store.len(),
                span = %span,
                "loaded ride records"
            ),
            None => warn!(path = %path.display(), "ride table has no data rows"),
        }
        Ok(store)
    }

    /// Load a store from any CSV byte stream with a header row.
    ///
    /// Requires `dteday`, `casual` and `registered` columns; `cnt` is
    /// optional and only cross-checked. Other columns are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| DataLoadError::Unreadable(e.to_string()))?
            .clone();
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == name)
        };
        let require = |name: &str| {
            position(name).ok_or_else(|| DataLoadError::MissingColumn(name.to_string()))
        };

        let date_idx = require(DATE_COLUMN)?;
        let casual_idx = require(CASUAL_COLUMN)?;
        let registered_idx = require(REGISTERED_COLUMN)?;
        let total_idx = position(TOTAL_COLUMN);

        let mut records = Vec::new();
        let mut total_mismatches = 0usize;

        for result in csv_reader.records() {
            let row = result.map_err(|e| DataLoadError::Unreadable(e.to_string()))?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);

            let raw_date = field(&row, date_idx, DATE_COLUMN, line)?;
            let date = parse_date(raw_date).ok_or_else(|| DataLoadError::MalformedRow {
                line,
                message: format!("unparseable date '{}'", raw_date),
            })?;
            let casual = parse_count(field(&row, casual_idx, CASUAL_COLUMN, line)?, CASUAL_COLUMN, line)?;
            let registered = parse_count(
                field(&row, registered_idx, REGISTERED_COLUMN, line)?,
                REGISTERED_COLUMN,
                line,
            )?;

            let record = Record::new(date, casual, registered);
            if let Some(idx) = total_idx {
                let declared = row.get(idx).and_then(|v| v.parse::<u64>().ok());
                if declared != Some(record.total_count) {
                    total_mismatches += 1;
                }
            }
            records.push(record);
        }

        if total_mismatches > 0 {
            warn!(
                rows = total_mismatches,
                "'cnt' disagrees with casual + registered; using the recomputed total"
            );
        }
        debug!(rows = records.len(), "parsed ride table");

        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, ascending by date.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The first and last date in the store.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// The store's own span as a range (the "reset" selection).
    pub fn full_range(&self) -> Option<DateRange> {
        self.span()
            .and_then(|(start, end)| DateRange::new(start, end).ok())
    }

    /// Records inside `range`, with out-of-span bounds clamped.
    pub fn filter(&self, range: DateRange) -> FilteredView<'_> {
        range::filter(self, range)
    }
}

fn field<'r>(
    row: &'r StringRecord,
    idx: usize,
    name: &str,
    line: u64,
) -> std::result::Result<&'r str, DataLoadError> {
    row.get(idx).ok_or_else(|| DataLoadError::MalformedRow {
        line,
        message: format!("missing value for '{}'", name),
    })
}

fn parse_count(raw: &str, name: &str, line: u64) -> std::result::Result<u64, DataLoadError> {
    raw.parse::<u64>().map_err(|_| DataLoadError::MalformedRow {
        line,
        message: format!("'{}' must be a non-negative integer, got '{}'", name, raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyticsError;
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn record_total_is_derived() {
        let record = Record::new(date(2011, 1, 1), 331, 654);
        assert_eq!(record.total_count(), 985);
    }

    #[test]
    fn from_reader_parses_and_sorts() {
        let csv = "\
instant,dteday,season,casual,registered,cnt
2,2011-01-02,1,131,670,801
1,2011-01-01,1,331,654,985
3,2011-01-01,1,5,5,10
";
        let store = RecordStore::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.span(), Some((date(2011, 1, 1), date(2011, 1, 2))));

        // Stable: the two Jan 1 rows keep their source order
        let records = store.records();
        assert_eq!(records[0].casual_count(), 331);
        assert_eq!(records[1].casual_count(), 5);
        assert_eq!(records[2].total_count(), 801);
    }

    #[test]
    fn from_reader_without_cnt_column() {
        let csv = "dteday,casual,registered\n2011-01-01,1,2\n";
        let store = RecordStore::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(store.records()[0].total_count(), 3);
    }

    #[test]
    fn declared_total_is_not_trusted() {
        let csv = "dteday,casual,registered,cnt\n2011-01-01,1,2,999\n";
        let store = RecordStore::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(store.records()[0].total_count(), 3);
    }

    #[test]
    fn missing_required_column() {
        let csv = "dteday,casual,cnt\n2011-01-01,1,2\n";
        let err = RecordStore::from_reader(csv.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::DataLoad(DataLoadError::MissingColumn("registered".to_string()))
        );
    }

    #[test]
    fn malformed_date_reports_line() {
        let csv = "dteday,casual,registered\n2011-01-01,1,2\nsoon,1,2\n";
        let err = RecordStore::from_reader(csv.as_bytes()).unwrap_err();
        match err {
            AnalyticsError::DataLoad(DataLoadError::MalformedRow { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("soon"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn negative_count_is_rejected() {
        let csv = "dteday,casual,registered\n2011-01-01,-1,2\n";
        let err = RecordStore::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::DataLoad(DataLoadError::MalformedRow { .. })
        ));
    }

    #[test]
    fn ragged_row_is_unreadable() {
        let csv = "dteday,casual,registered\n2011-01-01,1,2\n2011-01-02,3\n";
        let err = RecordStore::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::DataLoad(DataLoadError::Unreadable(_))
        ));
    }

    #[test]
    fn invalid_utf8_is_unreadable() {
        let mut bytes = b"dteday,casual,registered\n2011-01-01,1,2\n".to_vec();
        bytes.extend_from_slice(b"2011-01-02,\xff\xfe,2\n");
        let err = RecordStore::from_reader(bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::DataLoad(DataLoadError::Unreadable(_))
        ));
    }

    #[test]
    fn header_only_gives_empty_store() {
        let store = RecordStore::from_reader("dteday,casual,registered\n".as_bytes()).unwrap();
        assert!(store.is_empty());
        assert!(store.span().is_none());
        assert!(store.full_range().is_none());
    }

    #[test]
    fn load_missing_file() {
        let err = RecordStore::load("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::DataLoad(DataLoadError::NotFound { .. })
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\u{feff}dteday,casual,registered").unwrap();
        writeln!(file, "2012-12-31,439,2290").unwrap();
        writeln!(file, "2012-12-30,364,1432").unwrap();
        file.flush().unwrap();

        let store = RecordStore::load(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].date(), date(2012, 12, 30));
        assert_eq!(
            store.full_range(),
            Some(DateRange::new(date(2012, 12, 30), date(2012, 12, 31)).unwrap())
        );
    }
}
