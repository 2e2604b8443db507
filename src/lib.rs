//! Stochastic-oscillator analysis for a single Kraken trading pair.
//!
//! A [`PairAnalyzer`] is bound to one [`PairSymbol`], loads its price history from a
//! [`MarketDataSource`] and derives %K/%D from it. Charts are handed off to a
//! [`ChartRenderer`].

pub mod analyzer;
pub mod catalog;
pub mod chart;
pub mod config;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod source;
pub mod storage;
pub mod utils;

pub use analyzer::{AnalyzerState, PairAnalyzer};
pub use catalog::{is_supported, list_supported_pairs};
pub use chart::{ChartRenderer, JsonChartWriter};
pub use config::{AppConfig, StochasticConfig, load_config};
pub use model::{
    AnalyzerError, ChartError, FetchError, PairSymbol, PriceBar, PriceSeries, StochasticResult,
};
pub use source::MarketDataSource;
