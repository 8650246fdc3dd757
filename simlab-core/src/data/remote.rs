//! Remote chart-API provider.
//!
//! Fetches daily close prices from the v8 chart endpoint over blocking HTTP,
//! with a small retry/backoff loop. The endpoint is unofficial and subject to
//! unannounced format changes; the CSV import path is the offline fallback.

use std::thread;
use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use super::provider::{DataError, MarketDataProvider};
use crate::domain::PriceSeries;

/// v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

/// Blocking HTTP provider for daily close prices.
pub struct RemoteProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl RemoteProvider {
    pub fn new() -> Self {
        Self::with_base_url("https://query2.finance.yahoo.com/v8/finance/chart")
    }

    /// Point the provider at a different endpoint (tests use a local server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    fn chart_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        let end_ts = end.and_hms_opt(23, 59, 59).unwrap().and_utc().timestamp();
        format!(
            "{}/{ticker}?period1={start_ts}&period2={end_ts}&interval=1d",
            self.base_url
        )
    }

    fn fetch_once(&self, ticker: &str, url: &str) -> Result<PriceSeries, DataError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::Fetch {
                ticker: ticker.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(DataError::Fetch {
                ticker: ticker.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let parsed: ChartResponse = response.json().map_err(|e| DataError::Fetch {
            ticker: ticker.to_string(),
            reason: format!("bad response body: {e}"),
        })?;

        if let Some(err) = parsed.chart.error {
            return Err(DataError::Fetch {
                ticker: ticker.to_string(),
                reason: format!("{}: {}", err.code, err.description),
            });
        }

        let data = parsed
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| DataError::Fetch {
                ticker: ticker.to_string(),
                reason: "empty chart result".to_string(),
            })?;

        chart_to_series(data, ticker)
    }
}

impl Default for RemoteProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketDataProvider for RemoteProvider {
    fn name(&self) -> &str {
        "remote-chart-api"
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let url = self.chart_url(ticker, start, end);

        let mut last_err = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                thread::sleep(self.base_delay * 2u32.pow(attempt - 1));
                tracing::debug!(ticker, attempt, "retrying fetch");
            }
            match self.fetch_once(ticker, &url) {
                Ok(series) => return Ok(series),
                Err(e) => last_err = Some(e),
            }
        }

        Err(last_err.unwrap_or_else(|| DataError::Fetch {
            ticker: ticker.to_string(),
            reason: "no attempts made".to_string(),
        }))
    }
}

/// Convert the chart payload into a validated series, dropping bars with a
/// null close the way the upstream feed sometimes emits for half-days.
fn chart_to_series(data: ChartData, ticker: &str) -> Result<PriceSeries, DataError> {
    let timestamps = data.timestamp.unwrap_or_default();
    let closes = data
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    if timestamps.len() != closes.len() {
        return Err(DataError::Fetch {
            ticker: ticker.to_string(),
            reason: format!(
                "timestamp/close length mismatch ({} vs {})",
                timestamps.len(),
                closes.len()
            ),
        });
    }

    let mut dates = Vec::with_capacity(timestamps.len());
    let mut values = Vec::with_capacity(timestamps.len());
    for (ts, close) in timestamps.into_iter().zip(closes) {
        let Some(close) = close else { continue };
        let date = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| DataError::Parse {
                field: "timestamp",
                value: ts.to_string(),
            })?
            .date_naive();
        dates.push(date);
        values.push(close);
    }

    PriceSeries::new(dates, values)
}
