//! Data provider trait and the structured data-validation error taxonomy.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PriceSeries;

/// Everything that can go wrong producing or validating a price series.
///
/// The validation variants double as the invalid-data contract for strategy
/// construction (insufficient lookback) and series construction.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("dates and closes have different lengths ({dates} vs {closes})")]
    LengthMismatch { dates: usize, closes: usize },

    #[error("date index is not strictly increasing at position {index}")]
    NonMonotonicDates { index: usize },

    #[error("missing close price at {date}")]
    MissingClose { date: NaiveDate },

    #[error("insufficient data: strategy needs {required} bars, series has {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("csv_path must be provided when source is 'csv'")]
    MissingCsvPath,

    #[error("fetch failed for {ticker}: {reason}")]
    Fetch { ticker: String, reason: String },

    #[error("could not parse {field}: '{value}'")]
    Parse { field: &'static str, value: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which kind of source a data request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    /// Remote chart-API provider.
    Remote,
    /// Local CSV file; requires `csv_path`.
    Csv,
}

/// A request for one ticker's close-price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRequest {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub source: DataSourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_path: Option<PathBuf>,
}

/// Abstraction over remote market-data sources, so the loader can be tested
/// against a stub and real transports can be swapped freely.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the validated close-price series for a ticker and date range.
    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_deserializes_from_wire_format() {
        let json = r#"{
            "ticker": "AAPL",
            "start_date": "2020-01-02",
            "end_date": "2023-01-01",
            "source": "remote"
        }"#;
        let request: DataRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.ticker, "AAPL");
        assert_eq!(request.source, DataSourceKind::Remote);
        assert!(request.csv_path.is_none());
    }

    #[test]
    fn csv_source_carries_path() {
        let json = r#"{
            "ticker": "SPY",
            "start_date": "2020-01-02",
            "end_date": "2020-06-01",
            "source": "csv",
            "csv_path": "fixtures/spy.csv"
        }"#;
        let request: DataRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.source, DataSourceKind::Csv);
        assert_eq!(request.csv_path.unwrap(), PathBuf::from("fixtures/spy.csv"));
    }
}
