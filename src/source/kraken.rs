use crate::model::{FetchError, PairSymbol, PriceSeries};
use crate::normalizer::into_series;
use crate::parser::{KrakenOhlcParser, Parser};
use crate::source::traits::MarketDataSource;

use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

const KRAKEN_API: &str = "https://api.kraken.com";

/// Blocking client for the public Kraken OHLC endpoint.
pub struct KrakenSource {
    client: Client,
    base_url: String,
    interval_minutes: u32,
    parser: KrakenOhlcParser,
}

impl KrakenSource {
    pub fn new(interval_minutes: u32, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent("krk-stoch/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: KRAKEN_API.to_string(),
            interval_minutes,
            parser: KrakenOhlcParser::new(),
        })
    }

    /// Points the client at another host, e.g. a local mirror.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Cache namespace for this source; bars of another interval live under another key.
    pub fn cache_key(&self) -> String {
        format!("kraken-{}m", self.interval_minutes)
    }

    fn build_url(&self) -> String {
        format!("{}/0/public/OHLC", self.base_url)
    }
}

impl MarketDataSource for KrakenSource {
    fn fetch(&self, pair: &PairSymbol) -> Result<PriceSeries, FetchError> {
        let url = self.build_url();
        info!("📡 Fetching {} ({} min) from {}", pair, self.interval_minutes, url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("pair", pair.to_string()),
                ("interval", self.interval_minutes.to_string()),
            ])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("❌ Kraken responded [{}] for {}", status, pair);
            return Err(FetchError::Http(format!("unexpected status {}", status)));
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let bars = self.parser.parse(&body, pair)?;
        let series = into_series(pair, bars)?;
        debug!("Received {} bars for {}", series.len(), pair);
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_uses_configured_base() {
        let source = KrakenSource::new(60, Duration::from_secs(1))
            .unwrap()
            .with_base_url("http://localhost:8080/");
        assert_eq!(source.build_url(), "http://localhost:8080/0/public/OHLC");
    }

    #[test]
    fn cache_key_tracks_interval() {
        let daily = KrakenSource::new(1440, Duration::from_secs(1)).unwrap();
        let hourly = KrakenSource::new(60, Duration::from_secs(1)).unwrap();
        assert_eq!(daily.cache_key(), "kraken-1440m");
        assert_ne!(daily.cache_key(), hourly.cache_key());
    }

    #[test]
    fn default_base_is_kraken() {
        let source = KrakenSource::new(1440, Duration::from_secs(1)).unwrap();
        assert_eq!(source.build_url(), "https://api.kraken.com/0/public/OHLC");
    }
}
