//! Data pipeline: providers, CSV import, the persistent LRU cache, and the
//! cache-first loader.

pub mod csv_import;
pub mod loader;
pub mod lru_cache;
pub mod provider;
pub mod remote;

pub use csv_import::load_csv;
pub use loader::DataLoader;
pub use lru_cache::{CacheError, CacheKey, PersistentLruCache, DEFAULT_CACHE_CAPACITY};
pub use provider::{DataError, DataRequest, DataSourceKind, MarketDataProvider};
pub use remote::RemoteProvider;
