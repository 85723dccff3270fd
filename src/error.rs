//! Error types for the bikeshare-insights library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors raised while loading the ride table.
///
/// All of these are fatal for a dashboard session; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataLoadError {
    /// The source file does not exist.
    #[error("data source not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The source exists but could not be read or framed as CSV.
    #[error("data source unreadable: {0}")]
    Unreadable(String),

    /// A required column is absent from the header row.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// A data row could not be parsed.
    #[error("malformed row at line {line}: {message}")]
    MalformedRow { line: u64, message: String },
}

/// Errors that can occur in the analytics pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Loading the record store failed.
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    /// A date range bound is malformed or reversed.
    #[error("invalid date range: {0}")]
    InvalidRange(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration could not be read or failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// A renderer failed to produce output.
    #[error("render error: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = DataLoadError::MissingColumn("casual".to_string());
        assert_eq!(err.to_string(), "missing required column: casual");

        let err = DataLoadError::MalformedRow {
            line: 4,
            message: "bad date".to_string(),
        };
        assert_eq!(err.to_string(), "malformed row at line 4: bad date");

        let err = DataLoadError::NotFound {
            path: PathBuf::from("missing.csv"),
        };
        assert_eq!(err.to_string(), "data source not found: missing.csv");

        let err = AnalyticsError::InvalidRange("start after end".to_string());
        assert_eq!(err.to_string(), "invalid date range: start after end");
    }

    #[test]
    fn load_errors_convert_transparently() {
        let err: AnalyticsError = DataLoadError::MissingColumn("dteday".to_string()).into();
        assert_eq!(err.to_string(), "missing required column: dteday");
        assert!(matches!(err, AnalyticsError::DataLoad(_)));
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = AnalyticsError::Config("period must be at least 2".to_string());
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
