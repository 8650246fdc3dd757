//! PriceSeries — the validated time-indexed close-price table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::DataError;

/// Ordered close-price series for a single symbol.
///
/// Invariants, enforced at construction:
/// - non-empty
/// - dates strictly increasing
/// - one finite close per date
///
/// Deserialization goes through the same validation (`try_from`), so a
/// hand-edited or damaged cache file cannot smuggle in an invalid series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesData", into = "SeriesData")]
pub struct PriceSeries {
    dates: Vec<NaiveDate>,
    closes: Vec<f64>,
}

/// Raw serde shape of a price series, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesData {
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
}

impl PriceSeries {
    /// Build a validated series from parallel date/close columns.
    pub fn new(dates: Vec<NaiveDate>, closes: Vec<f64>) -> Result<Self, DataError> {
        if dates.len() != closes.len() {
            return Err(DataError::LengthMismatch {
                dates: dates.len(),
                closes: closes.len(),
            });
        }
        if dates.is_empty() {
            return Err(DataError::EmptySeries);
        }
        for i in 1..dates.len() {
            if dates[i] <= dates[i - 1] {
                return Err(DataError::NonMonotonicDates { index: i });
            }
        }
        if let Some(i) = closes.iter().position(|c| !c.is_finite()) {
            return Err(DataError::MissingClose { date: dates[i] });
        }
        Ok(Self { dates, closes })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn date_at(&self, index: usize) -> NaiveDate {
        self.dates[index]
    }

    pub fn close_at(&self, index: usize) -> f64 {
        self.closes[index]
    }

    /// First and last date of the series.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (self.dates[0], *self.dates.last().unwrap())
    }
}

impl TryFrom<SeriesData> for PriceSeries {
    type Error = DataError;

    fn try_from(data: SeriesData) -> Result<Self, Self::Error> {
        Self::new(data.dates, data.closes)
    }
}

impl From<PriceSeries> for SeriesData {
    fn from(series: PriceSeries) -> Self {
        Self {
            dates: series.dates,
            closes: series.closes,
        }
    }
}
