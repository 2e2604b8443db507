use crate::model::PairSymbol;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Intervals (minutes) accepted by the Kraken OHLC endpoint.
pub const KRAKEN_INTERVALS: &[u32] = &[1, 5, 15, 30, 60, 240, 1440, 10080, 21600];

/// Ten years; larger cache ages overflow `chrono::Duration`.
pub const MAX_CACHE_AGE_SECONDS: u64 = 10 * 365 * 24 * 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StochasticConfig {
    pub k_period: usize,
    pub d_period: usize,
}

impl Default for StochasticConfig {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Live download from the Kraken REST api.
    Kraken,
    /// Offline CSV snapshot at `csv_path`.
    Csv,
    /// Kraken download served through the SQLite cache at `db_path`.
    Cached,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub pair: PairSymbol,
    #[serde(default = "default_interval")]
    pub interval_minutes: u32,
    #[serde(default)]
    pub stochastic: StochasticConfig,
    #[serde(default = "default_source")]
    pub source: SourceKind,
    #[serde(default)]
    pub csv_path: Option<PathBuf>,
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_seconds: u64,
    #[serde(default = "default_chart_dir")]
    pub chart_dir: PathBuf,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

fn default_interval() -> u32 {
    1440
}

fn default_source() -> SourceKind {
    SourceKind::Kraken
}

fn default_db_path() -> PathBuf {
    PathBuf::from("data.db")
}

fn default_cache_max_age() -> u64 {
    3600
}

fn default_chart_dir() -> PathBuf {
    PathBuf::from("charts")
}

fn default_timeout() -> u64 {
    10
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stochastic.k_period == 0 || self.stochastic.d_period == 0 {
            return Err(ConfigError::Invalid(
                "stochastic periods must be at least 1".into(),
            ));
        }
        if !KRAKEN_INTERVALS.contains(&self.interval_minutes) {
            return Err(ConfigError::Invalid(format!(
                "interval_minutes {} not one of {:?}",
                self.interval_minutes, KRAKEN_INTERVALS
            )));
        }
        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_seconds must be at least 1".into(),
            ));
        }
        if self.cache_max_age_seconds > MAX_CACHE_AGE_SECONDS {
            return Err(ConfigError::Invalid(format!(
                "cache_max_age_seconds {} exceeds {}",
                self.cache_max_age_seconds, MAX_CACHE_AGE_SECONDS
            )));
        }
        if self.source == SourceKind::Csv && self.csv_path.is_none() {
            return Err(ConfigError::Invalid(
                "source \"csv\" requires csv_path".into(),
            ));
        }
        Ok(())
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}
