//! Cache-first data loading.

use tracing::info;

use super::csv_import::load_csv;
use super::lru_cache::{CacheKey, PersistentLruCache};
use super::provider::{DataError, DataRequest, DataSourceKind, MarketDataProvider};
use crate::domain::PriceSeries;

/// Resolves data requests against the persistent cache before touching the
/// remote provider. CSV requests bypass the cache — the file is already
/// local.
pub struct DataLoader {
    cache: PersistentLruCache,
    provider: Box<dyn MarketDataProvider>,
}

impl DataLoader {
    pub fn new(cache: PersistentLruCache, provider: Box<dyn MarketDataProvider>) -> Self {
        Self { cache, provider }
    }

    /// Load the validated price series described by `request`.
    pub fn load(&mut self, request: &DataRequest) -> Result<PriceSeries, DataError> {
        match request.source {
            DataSourceKind::Csv => {
                let path = request.csv_path.as_deref().ok_or(DataError::MissingCsvPath)?;
                info!(ticker = %request.ticker, path = %path.display(), "loading from csv");
                load_csv(path)
            }
            DataSourceKind::Remote => {
                let key = CacheKey {
                    ticker: request.ticker.clone(),
                    start_date: request.start_date,
                    end_date: request.end_date,
                };

                if let Some(series) = self.cache.get(&key) {
                    info!(ticker = %request.ticker, "cache hit");
                    return Ok(series);
                }

                info!(
                    ticker = %request.ticker,
                    provider = self.provider.name(),
                    "cache miss; fetching"
                );
                let series =
                    self.provider
                        .fetch(&request.ticker, request.start_date, request.end_date)?;
                self.cache.set(key, series.clone());
                Ok(series)
            }
        }
    }
}
