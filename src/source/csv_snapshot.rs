//! CSV snapshots of a price series.
//!
//! A snapshot is any CSV with a header row naming a time column (`time`,
//! `timestamp`, `date` or `datetime`) and `open`, `high`, `low`, `close`
//! columns. `volume`/`vol` is optional. Headers are matched case-insensitively
//! and extra columns (`vwap`, `count`, a pandas index) are ignored.

use crate::model::{FetchError, PairSymbol, PriceBar, PriceSeries};
use crate::normalizer::into_series;
use crate::source::traits::MarketDataSource;
use crate::utils::parse_datetime;

use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads series from a snapshot file, or from `<dir>/<PAIR>.csv` when given a directory.
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn resolve(&self, pair: &PairSymbol) -> PathBuf {
        if self.path.is_dir() {
            self.path.join(format!("{}.csv", pair))
        } else {
            self.path.clone()
        }
    }
}

impl MarketDataSource for CsvSource {
    fn fetch(&self, pair: &PairSymbol) -> Result<PriceSeries, FetchError> {
        let path = self.resolve(pair);
        info!("📂 Reading {} snapshot from {}", pair, path.display());
        let file = File::open(&path)?;
        into_series(pair, read_bars(file)?)
    }
}

struct Columns {
    time: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn detect(headers: &StringRecord) -> Result<Self, FetchError> {
        let find = |names: &[&str]| {
            headers.iter().position(|h| {
                let h = h.trim().to_lowercase();
                names.iter().any(|n| *n == h)
            })
        };
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| {
                FetchError::Parse(format!("missing column '{}' in snapshot header", names[0]))
            })
        };

        Ok(Self {
            time: require(&["time", "timestamp", "date", "datetime"])?,
            open: require(&["open"])?,
            high: require(&["high"])?,
            low: require(&["low"])?,
            close: require(&["close"])?,
            volume: find(&["volume", "vol"]),
        })
    }
}

/// Parses snapshot rows in file order; no sorting or dedup happens here.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<PriceBar>, FetchError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let columns = Columns::detect(reader.headers()?)?;

    let mut bars = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        // header is line 1
        let line = row + 2;
        let field = |idx: usize| record.get(idx).unwrap_or("");
        let number = |idx: usize| {
            field(idx).parse::<f64>().map_err(|_| {
                FetchError::Parse(format!("line {}: cannot parse '{}' as number", line, field(idx)))
            })
        };

        let timestamp = parse_datetime(field(columns.time)).ok_or_else(|| {
            FetchError::Parse(format!("line {}: bad timestamp '{}'", line, field(columns.time)))
        })?;

        bars.push(PriceBar {
            timestamp,
            open: number(columns.open)?,
            high: number(columns.high)?,
            low: number(columns.low)?,
            close: number(columns.close)?,
            volume: match columns.volume {
                Some(idx) => number(idx)?,
                None => 0.0,
            },
        });
    }
    debug!("Parsed {} snapshot rows", bars.len());
    Ok(bars)
}

/// Writes `series` as a snapshot readable by [`CsvSource`], times as unix seconds.
pub fn write_snapshot(path: &Path, series: &PriceSeries) -> Result<(), csv::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["time", "open", "high", "low", "close", "volume"])?;
    for bar in series.bars() {
        writer.write_record([
            bar.timestamp.timestamp().to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])?;
    }
    writer.flush()?;
    info!("💾 Wrote {} bars to {}", series.len(), path.display());
    Ok(())
}
