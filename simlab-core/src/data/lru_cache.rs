//! Disk-backed LRU cache for fetched price series.
//!
//! Layout: `{cache_dir}/lru_cache.json` plus a `.lock` companion file.
//!
//! - Strict LRU: `get` and `set` promote the touched key to most-recently-used;
//!   an insert that exceeds capacity evicts the single least-recently-used
//!   entry.
//! - Atomic persistence: the whole mapping is rewritten to `.tmp` and renamed
//!   over the canonical file after every mutation, so a crash can never leave
//!   a partially-written canonical file.
//! - Cross-process coordination: an advisory lock on the companion file
//!   serializes load and save across worker processes sharing the cache file.
//!   Writes are last-write-wins at whole-file granularity — concurrent
//!   workers inserting different keys can clobber each other, costing only a
//!   re-fetch on the next miss.
//! - A corrupt or truncated cache file downgrades to an empty mapping with a
//!   warning; it is never a hard failure.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use fs2::FileExt;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PriceSeries;

pub const CACHE_FILE_NAME: &str = "lru_cache.json";

/// Matches the bounded footprint the cache is expected to keep on disk.
pub const DEFAULT_CACHE_CAPACITY: usize = 10;

/// Identifies one cached fetch: ticker plus inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to create cache directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
}

/// On-disk record; the file holds a JSON array ordered LRU → MRU.
#[derive(Serialize, Deserialize)]
struct PersistedEntry {
    key: CacheKey,
    series: PriceSeries,
}

/// Disk-backed LRU mapping of [`CacheKey`] to [`PriceSeries`].
pub struct PersistentLruCache {
    cache_path: PathBuf,
    lock_path: PathBuf,
    max_size: usize,
    entries: IndexMap<CacheKey, PriceSeries>,
}

impl PersistentLruCache {
    /// Open (or create) a cache rooted at `cache_dir`.
    ///
    /// Loads any previously persisted mapping; unreadable or corrupt state
    /// degrades to an empty cache with a warning.
    pub fn open(cache_dir: impl AsRef<Path>, max_size: usize) -> Result<Self, CacheError> {
        let cache_dir = cache_dir.as_ref();
        fs::create_dir_all(cache_dir).map_err(|source| CacheError::CreateDir {
            path: cache_dir.to_path_buf(),
            source,
        })?;

        let cache_path = cache_dir.join(CACHE_FILE_NAME);
        let lock_path = cache_path.with_extension("json.lock");

        let mut cache = Self {
            cache_path,
            lock_path,
            max_size,
            entries: IndexMap::new(),
        };
        cache.entries = cache.load_entries();
        Ok(cache)
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Membership test. Does not update recency.
    pub fn has(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Look up a key, promoting it to most-recently-used on a hit.
    pub fn get(&mut self, key: &CacheKey) -> Option<PriceSeries> {
        let index = self.entries.get_index_of(key)?;
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        let series = self.entries.get_index(last).map(|(_, v)| v.clone());
        self.persist();
        series
    }

    /// Insert or refresh a key at the most-recently-used position, evicting
    /// the least-recently-used entry if capacity is exceeded.
    pub fn set(&mut self, key: CacheKey, series: PriceSeries) {
        self.entries.shift_remove(&key);
        self.entries.insert(key, series);

        if self.entries.len() > self.max_size {
            self.entries.shift_remove_index(0);
        }

        self.persist();
    }

    /// Drop every entry, in memory and on disk.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// Keys in LRU → MRU order.
    pub fn keys(&self) -> impl Iterator<Item = &CacheKey> {
        self.entries.keys()
    }

    fn load_entries(&self) -> IndexMap<CacheKey, PriceSeries> {
        let _lock = self.acquire_lock();

        if !self.cache_path.exists() {
            return IndexMap::new();
        }

        let parsed = fs::read_to_string(&self.cache_path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_json::from_str::<Vec<PersistedEntry>>(&content).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(entries) => entries.into_iter().map(|e| (e.key, e.series)).collect(),
            Err(reason) => {
                tracing::warn!(
                    path = %self.cache_path.display(),
                    reason,
                    "cache file is corrupt or unreadable; starting with an empty cache"
                );
                IndexMap::new()
            }
        }
    }

    /// Write the full mapping to disk atomically (temp file + rename) under
    /// the advisory lock. Failures are logged and swallowed: the in-memory
    /// state stays authoritative and the previous canonical file remains
    /// intact.
    fn persist(&self) {
        let _lock = self.acquire_lock();

        if let Err(reason) = self.write_atomic() {
            tracing::warn!(
                path = %self.cache_path.display(),
                reason,
                "failed to persist cache"
            );
        }
    }

    fn write_atomic(&self) -> Result<(), String> {
        let records: Vec<PersistedEntry> = self
            .entries
            .iter()
            .map(|(key, series)| PersistedEntry {
                key: key.clone(),
                series: series.clone(),
            })
            .collect();

        let json = serde_json::to_vec(&records).map_err(|e| e.to_string())?;

        let tmp_path = self.cache_path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| e.to_string())?;
        fs::rename(&tmp_path, &self.cache_path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            e.to_string()
        })
    }

    /// Block until the advisory lock is held. Returns `None` (and logs) if
    /// the lock file itself cannot be created — persistence then proceeds
    /// unserialized rather than failing the operation.
    fn acquire_lock(&self) -> Option<LockGuard> {
        match LockGuard::acquire(&self.lock_path) {
            Ok(guard) => Some(guard),
            Err(e) => {
                tracing::warn!(
                    path = %self.lock_path.display(),
                    error = %e,
                    "could not acquire cache lock"
                );
                None
            }
        }
    }
}

/// Held advisory file lock; released on drop.
struct LockGuard {
    file: File,
}

impl LockGuard {
    fn acquire(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn key(ticker: &str) -> CacheKey {
        CacheKey {
            ticker: ticker.to_string(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
        }
    }

    fn sample_series(base: f64) -> PriceSeries {
        let dates = vec![
            NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 3).unwrap(),
        ];
        PriceSeries::new(dates, vec![base, base + 1.0]).unwrap()
    }

    #[test]
    fn set_then_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PersistentLruCache::open(dir.path(), 10).unwrap();

        cache.set(key("AAPL"), sample_series(100.0));
        assert!(cache.has(&key("AAPL")));
        assert_eq!(cache.get(&key("AAPL")).unwrap(), sample_series(100.0));
        assert_eq!(cache.get(&key("MSFT")), None);
    }

    #[test]
    fn eviction_drops_least_recently_used() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PersistentLruCache::open(dir.path(), 2).unwrap();

        cache.set(key("A"), sample_series(1.0));
        cache.set(key("B"), sample_series(2.0));
        cache.set(key("C"), sample_series(3.0));

        assert_eq!(cache.len(), 2);
        assert!(!cache.has(&key("A")));
        assert!(cache.has(&key("B")));
        assert!(cache.has(&key("C")));
    }

    #[test]
    fn get_protects_key_from_eviction() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PersistentLruCache::open(dir.path(), 2).unwrap();

        cache.set(key("A"), sample_series(1.0));
        cache.set(key("B"), sample_series(2.0));
        // Touch A so B becomes the LRU entry.
        let _ = cache.get(&key("A"));
        cache.set(key("C"), sample_series(3.0));

        assert!(cache.has(&key("A")));
        assert!(!cache.has(&key("B")));
        assert!(cache.has(&key("C")));
    }

    #[test]
    fn has_does_not_promote() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PersistentLruCache::open(dir.path(), 2).unwrap();

        cache.set(key("A"), sample_series(1.0));
        cache.set(key("B"), sample_series(2.0));
        assert!(cache.has(&key("A")));
        cache.set(key("C"), sample_series(3.0));

        // The `has` call must not have saved A from eviction.
        assert!(!cache.has(&key("A")));
    }

    #[test]
    fn re_set_promotes_existing_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PersistentLruCache::open(dir.path(), 2).unwrap();

        cache.set(key("A"), sample_series(1.0));
        cache.set(key("B"), sample_series(2.0));
        cache.set(key("A"), sample_series(10.0));
        cache.set(key("C"), sample_series(3.0));

        assert!(cache.has(&key("A")));
        assert!(!cache.has(&key("B")));
        assert_eq!(cache.get(&key("A")).unwrap(), sample_series(10.0));
    }

    #[test]
    fn persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut cache = PersistentLruCache::open(dir.path(), 10).unwrap();
            cache.set(key("AAPL"), sample_series(100.0));
        }

        let mut reopened = PersistentLruCache::open(dir.path(), 10).unwrap();
        assert_eq!(reopened.get(&key("AAPL")).unwrap(), sample_series(100.0));
    }

    #[test]
    fn lru_order_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut cache = PersistentLruCache::open(dir.path(), 3).unwrap();
            cache.set(key("A"), sample_series(1.0));
            cache.set(key("B"), sample_series(2.0));
            cache.set(key("C"), sample_series(3.0));
            let _ = cache.get(&key("A")); // order on disk is now B, C, A
        }

        let mut reopened = PersistentLruCache::open(dir.path(), 3).unwrap();
        reopened.set(key("D"), sample_series(4.0));
        assert!(!reopened.has(&key("B")));
        assert!(reopened.has(&key("A")));
    }

    #[test]
    fn corrupt_file_yields_empty_usable_cache() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CACHE_FILE_NAME), b"{not valid json").unwrap();

        let mut cache = PersistentLruCache::open(dir.path(), 10).unwrap();
        assert!(cache.is_empty());

        // Still fully usable after recovery.
        cache.set(key("AAPL"), sample_series(100.0));
        assert!(cache.has(&key("AAPL")));
    }

    #[test]
    fn truncated_file_yields_empty_usable_cache() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CACHE_FILE_NAME), b"").unwrap();

        let cache = PersistentLruCache::open(dir.path(), 10).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_empties_disk_state_too() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut cache = PersistentLruCache::open(dir.path(), 10).unwrap();
            cache.set(key("AAPL"), sample_series(100.0));
            cache.clear();
            assert!(cache.is_empty());
        }

        let reopened = PersistentLruCache::open(dir.path(), 10).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PersistentLruCache::open(dir.path(), 10).unwrap();
        cache.set(key("AAPL"), sample_series(100.0));

        assert!(dir.path().join(CACHE_FILE_NAME).exists());
        assert!(!dir.path().join("lru_cache.json.tmp").exists());
    }
}
