//! CSV import — local `date,close` files.

use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use super::provider::DataError;
use crate::domain::PriceSeries;

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    close: f64,
}

/// Load a close-price series from a CSV file with `date` and `close` columns
/// (extra columns are ignored). The result passes full series validation.
pub fn load_csv(path: &Path) -> Result<PriceSeries, DataError> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut dates = Vec::new();
    let mut closes = Vec::new();
    for row in reader.deserialize() {
        let row: CsvRow = row?;
        dates.push(row.date);
        closes.push(row.close);
    }

    PriceSeries::new(dates, closes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_date_close_columns() {
        let file = write_fixture("date,close\n2024-01-02,100.5\n2024-01-03,101.25\n");
        let series = load_csv(file.path()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), &[100.5, 101.25]);
    }

    #[test]
    fn extra_columns_ignored() {
        let file = write_fixture(
            "date,open,close,volume\n2024-01-02,99.0,100.5,1000\n2024-01-03,100.0,101.25,1100\n",
        );
        let series = load_csv(file.path()).unwrap();
        assert_eq!(series.closes(), &[100.5, 101.25]);
    }

    #[test]
    fn out_of_order_rows_rejected() {
        let file = write_fixture("date,close\n2024-01-03,101.0\n2024-01-02,100.0\n");
        assert!(matches!(
            load_csv(file.path()).unwrap_err(),
            DataError::NonMonotonicDates { .. }
        ));
    }

    #[test]
    fn empty_file_rejected() {
        let file = write_fixture("date,close\n");
        assert!(matches!(
            load_csv(file.path()).unwrap_err(),
            DataError::EmptySeries
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_csv(Path::new("/nonexistent/prices.csv")).unwrap_err();
        assert!(matches!(err, DataError::Csv(_)));
    }
}
