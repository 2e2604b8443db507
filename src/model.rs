// Core structs: PairSymbol, PriceBar, PriceSeries, StochasticResult and the error types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a tradable pair, e.g. `XZECZEUR`.
///
/// Only well-formedness is checked here; catalog membership is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PairSymbol(String);

impl PairSymbol {
    pub fn new(symbol: impl Into<String>) -> Result<Self, SymbolError> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Err(SymbolError::Empty);
        }
        if let Some(c) = symbol.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(SymbolError::InvalidChar { symbol, found: c });
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PairSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PairSymbol {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PairSymbol {
    type Error = SymbolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PairSymbol> for String {
    fn from(value: PairSymbol) -> Self {
        value.0
    }
}

/// One OHLC record for a time interval.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    fn is_finite(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Non-empty, strictly chronological sequence of bars.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Builds a series, rejecting empty input, unordered or duplicate timestamps
    /// and non-finite values.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }
        if let Some(index) = bars.iter().position(|b| !b.is_finite()) {
            return Err(SeriesError::NonFinite { index });
        }
        if let Some(index) = bars
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(SeriesError::OutOfOrder { index: index + 1 });
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> &PriceBar {
        &self.bars[0]
    }

    pub fn last(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }
}

/// %K and %D lines of the stochastic oscillator, aligned to the source timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticResult {
    pub k_period: usize,
    pub d_period: usize,
    /// Timestamps of the %K values, i.e. `series[k_period - 1..]`.
    pub timestamps: Vec<DateTime<Utc>>,
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

impl StochasticResult {
    /// Timestamps of the %D values.
    pub fn d_timestamps(&self) -> &[DateTime<Utc>] {
        if self.d.is_empty() {
            &[]
        } else {
            &self.timestamps[self.d_period - 1..]
        }
    }

    pub fn latest_k(&self) -> Option<f64> {
        self.k.last().copied()
    }

    pub fn latest_d(&self) -> Option<f64> {
        self.d.last().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("pair symbol is empty")]
    Empty,
    #[error("pair symbol '{symbol}' contains invalid character '{found}'")]
    InvalidChar { symbol: String, found: char },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("price series is empty")]
    Empty,
    #[error("timestamp at index {index} is not after its predecessor")]
    OutOfOrder { index: usize },
    #[error("non-finite value in bar at index {index}")]
    NonFinite { index: usize },
}

/// Failure of a market-data source to produce a series.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(String),
    #[error("request timed out")]
    Timeout,
    #[error("market-data api error: {0}")]
    Api(String),
    #[error("unknown pair: {0}")]
    UnknownPair(String),
    #[error("no data returned for {0}")]
    EmptyResult(String),
    #[error("malformed payload: {0}")]
    Parse(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("invalid series: {0}")]
    InvalidSeries(#[from] SeriesError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("invalid stored timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("invalid stored series: {0}")]
    InvalidSeries(#[from] SeriesError),
    #[error("storage lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("chart serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors surfaced by [`crate::analyzer::PairAnalyzer`].
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("no data loaded for {pair}; call load_data first")]
    InvalidState { pair: PairSymbol },
    #[error("data acquisition failed: {0}")]
    DataAcquisition(#[from] FetchError),
    #[error("invalid stochastic parameters k={k_period}, d={d_period} for {available} bars")]
    InvalidParameters {
        k_period: usize,
        d_period: usize,
        available: usize,
    },
    #[error("chart rendering failed: {0}")]
    ChartFailure(#[from] ChartError),
}
