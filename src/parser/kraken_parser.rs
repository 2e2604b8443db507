// Kraken-specific OHLC payload parsing
use crate::model::{FetchError, PairSymbol, PriceBar};
use crate::utils::from_unix_secs;
use serde::Deserialize;
use serde_json::{Map, Value};

pub trait Parser {
    fn parse(&self, body: &str, pair: &PairSymbol) -> Result<Vec<PriceBar>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct OhlcResponse {
    #[serde(default)]
    error: Vec<String>,
    result: Option<Map<String, Value>>,
}

/// `[time, open, high, low, close, vwap, volume, count]`, prices as strings.
type OhlcRow = (i64, String, String, String, String, String, String, u64);

pub struct KrakenOhlcParser;

impl KrakenOhlcParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for KrakenOhlcParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for KrakenOhlcParser {
    fn parse(&self, body: &str, pair: &PairSymbol) -> Result<Vec<PriceBar>, FetchError> {
        let response: OhlcResponse =
            serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

        if !response.error.is_empty() {
            if response.error.iter().any(|e| e.contains("Unknown asset pair")) {
                return Err(FetchError::UnknownPair(pair.to_string()));
            }
            return Err(FetchError::Api(response.error.join("; ")));
        }

        let result = response
            .result
            .ok_or_else(|| FetchError::Parse("missing result object".into()))?;

        // Kraken may answer under its canonical name rather than the requested one.
        let rows = result
            .iter()
            .find(|(key, _)| key.as_str() != "last")
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| FetchError::EmptyResult(pair.to_string()))?;

        let rows: Vec<OhlcRow> =
            serde_json::from_value(rows).map_err(|e| FetchError::Parse(e.to_string()))?;

        if rows.is_empty() {
            return Err(FetchError::EmptyResult(pair.to_string()));
        }

        rows.into_iter().map(row_to_bar).collect()
    }
}

fn row_to_bar(row: OhlcRow) -> Result<PriceBar, FetchError> {
    let (time, open, high, low, close, _vwap, volume, _count) = row;
    let timestamp = from_unix_secs(time)
        .ok_or_else(|| FetchError::Parse(format!("timestamp out of range: {}", time)))?;

    Ok(PriceBar {
        timestamp,
        open: parse_price(&open)?,
        high: parse_price(&high)?,
        low: parse_price(&low)?,
        close: parse_price(&close)?,
        volume: parse_price(&volume)?,
    })
}

fn parse_price(text: &str) -> Result<f64, FetchError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| FetchError::Parse(format!("cannot parse '{}' as number", text)))
}
