use crate::model::{FetchError, PairSymbol, PriceSeries, StorageError};
use crate::source::traits::MarketDataSource;
use crate::storage::SqliteStorage;

use chrono::{Duration, Utc};
use std::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

/// Serves fresh cached series from SQLite and refreshes from `upstream` otherwise.
///
/// Entries are keyed by `source_id` and pair, so the id must change whenever the
/// upstream would return different data (e.g. another candle interval).
/// A broken cache counts as a miss. When the upstream fails, a stale copy is returned
/// if one can be read; otherwise the upstream error is returned unchanged.
pub struct CachedSource<S> {
    upstream: S,
    source_id: String,
    storage: Mutex<SqliteStorage>,
    max_age: Duration,
}

impl<S: MarketDataSource> CachedSource<S> {
    pub fn new(
        upstream: S,
        source_id: impl Into<String>,
        storage: SqliteStorage,
        max_age: Duration,
    ) -> Self {
        Self {
            upstream,
            source_id: source_id.into(),
            storage: Mutex::new(storage),
            max_age,
        }
    }

    fn storage(&self) -> Result<MutexGuard<'_, SqliteStorage>, StorageError> {
        self.storage.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn fresh_copy(&self, pair: &PairSymbol) -> Result<Option<PriceSeries>, StorageError> {
        let storage = self.storage()?;
        match storage.last_fetched(&self.source_id, pair)? {
            Some(at) if Utc::now() - at < self.max_age => {
                storage.load_series(&self.source_id, pair)
            }
            _ => Ok(None),
        }
    }

    fn stale_copy(&self, pair: &PairSymbol) -> Result<Option<PriceSeries>, StorageError> {
        self.storage()?.load_series(&self.source_id, pair)
    }

    fn store(&self, pair: &PairSymbol, series: &PriceSeries) -> Result<(), StorageError> {
        self.storage()?.save_series(&self.source_id, pair, series)
    }
}

impl<S: MarketDataSource> MarketDataSource for CachedSource<S> {
    fn fetch(&self, pair: &PairSymbol) -> Result<PriceSeries, FetchError> {
        match self.fresh_copy(pair) {
            Ok(Some(series)) => {
                info!("🗄️ Serving {} bars for {} from cache", series.len(), pair);
                return Ok(series);
            }
            Ok(None) => {}
            Err(e) => warn!("Cache read for {} failed, refetching: {}", pair, e),
        }

        match self.upstream.fetch(pair) {
            Ok(series) => {
                if let Err(e) = self.store(pair, &series) {
                    warn!("Cache write for {} failed: {}", pair, e);
                }
                Ok(series)
            }
            Err(upstream_err) => match self.stale_copy(pair) {
                Ok(Some(stale)) => {
                    warn!(
                        "⚠️ Upstream fetch for {} failed ({}); serving stale cache",
                        pair, upstream_err
                    );
                    Ok(stale)
                }
                Ok(None) => Err(upstream_err),
                Err(e) => {
                    warn!("Stale cache for {} unreadable: {}", pair, e);
                    Err(upstream_err)
                }
            },
        }
    }
}
