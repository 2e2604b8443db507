use crate::model::{PairSymbol, PriceBar, PriceSeries, StorageError};
use crate::utils::from_unix_secs;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};
use std::path::Path;

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the cache database and runs migrations
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::init(Connection::open(db_path)?)
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS cached_bars (
                source TEXT NOT NULL,
                pair TEXT NOT NULL,
                ts INTEGER NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume REAL NOT NULL DEFAULT 0,
                PRIMARY KEY (source, pair, ts)
            );

            CREATE TABLE IF NOT EXISTS cache_log (
                source TEXT NOT NULL,
                pair TEXT NOT NULL,
                fetched_at TEXT NOT NULL,
                bars INTEGER NOT NULL,
                PRIMARY KEY (source, pair)
            );
            ",
        )?;

        Ok(Self { conn })
    }

    /// Replaces the series cached for `pair` under `source` and stamps the fetch time.
    ///
    /// `source` identifies the upstream and its settings (e.g. `kraken-1440m`), so
    /// series of different timeframes never mix.
    pub fn save_series(
        &self,
        source: &str,
        pair: &PairSymbol,
        series: &PriceSeries,
    ) -> Result<(), StorageError> {
        self.save_series_at(source, pair, series, Utc::now())
    }

    pub(crate) fn save_series_at(
        &self,
        source: &str,
        pair: &PairSymbol,
        series: &PriceSeries,
        fetched_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM cached_bars WHERE source = ?1 AND pair = ?2",
            params![source, pair.as_str()],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO cached_bars (source, pair, ts, open, high, low, close, volume)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for bar in series.bars() {
                stmt.execute(params![
                    source,
                    pair.as_str(),
                    bar.timestamp.timestamp(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume,
                ])?;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO cache_log (source, pair, fetched_at, bars) VALUES (?1, ?2, ?3, ?4)",
            params![source, pair.as_str(), fetched_at.to_rfc3339(), series.len() as i64],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Returns the series cached for `pair` under `source`, if any.
    pub fn load_series(
        &self,
        source: &str,
        pair: &PairSymbol,
    ) -> Result<Option<PriceSeries>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT ts, open, high, low, close, volume
             FROM cached_bars WHERE source = ?1 AND pair = ?2 ORDER BY ts ASC",
        )?;

        let rows = stmt.query_map(params![source, pair.as_str()], Self::map_row)?;
        let mut bars = Vec::new();
        for row in rows {
            let (ts, mut bar) = row?;
            bar.timestamp = from_unix_secs(ts)
                .ok_or_else(|| StorageError::InvalidTimestamp(ts.to_string()))?;
            bars.push(bar);
        }

        if bars.is_empty() {
            return Ok(None);
        }
        Ok(Some(PriceSeries::new(bars)?))
    }

    /// When the series for `pair` under `source` was last written.
    pub fn last_fetched(
        &self,
        source: &str,
        pair: &PairSymbol,
    ) -> Result<Option<DateTime<Utc>>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT fetched_at FROM cache_log WHERE source = ?1 AND pair = ?2")?;
        let mut rows = stmt.query(params![source, pair.as_str()])?;

        if let Some(row) = rows.next()? {
            let fetched_at_str: String = row.get(0)?;
            let fetched_at = fetched_at_str
                .parse::<DateTime<Utc>>()
                .map_err(|e| StorageError::InvalidTimestamp(format!("{}: {}", fetched_at_str, e)))?;
            Ok(Some(fetched_at))
        } else {
            Ok(None)
        }
    }

    /// Pairs that have a cached series under any source, alphabetically.
    pub fn cached_pairs(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT pair FROM cache_log ORDER BY pair ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut pairs = Vec::new();
        for pair in rows {
            pairs.push(pair?);
        }
        Ok(pairs)
    }

    #[cfg(test)]
    pub(crate) fn execute_raw(&self, sql: &str) -> Result<(), StorageError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Maps a row to (unix ts, bar); the caller fills in the timestamp.
    fn map_row(row: &Row) -> Result<(i64, PriceBar), rusqlite::Error> {
        Ok((
            row.get(0)?,
            PriceBar {
                timestamp: DateTime::<Utc>::default(),
                open: row.get(1)?,
                high: row.get(2)?,
                low: row.get(3)?,
                close: row.get(4)?,
                volume: row.get(5)?,
            },
        ))
    }
}
