use crate::analyzer::stochastic::compute_stochastic;
use crate::chart::ChartRenderer;
use crate::config::StochasticConfig;
use crate::model::{AnalyzerError, PairSymbol, PriceSeries, StochasticResult};
use crate::source::MarketDataSource;
use tracing::{debug, info};

/// Lifecycle of a [`PairAnalyzer`]. A reload replaces the series wholesale.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerState {
    Empty,
    Loaded(PriceSeries),
}

/// Holds the dataset of a single pair and derives the stochastic oscillator from it.
///
/// Every computation and chart request requires a loaded series and fails with
/// [`AnalyzerError::InvalidState`] otherwise; nothing is loaded implicitly.
pub struct PairAnalyzer {
    pair: PairSymbol,
    source: Box<dyn MarketDataSource>,
    charts: Box<dyn ChartRenderer>,
    periods: StochasticConfig,
    state: AnalyzerState,
}

impl PairAnalyzer {
    pub fn new(
        pair: PairSymbol,
        source: Box<dyn MarketDataSource>,
        charts: Box<dyn ChartRenderer>,
    ) -> Self {
        Self {
            pair,
            source,
            charts,
            periods: StochasticConfig::default(),
            state: AnalyzerState::Empty,
        }
    }

    /// Overrides the periods used by [`Self::compute_default_stochastic`] and the oscillator chart.
    pub fn with_periods(mut self, periods: StochasticConfig) -> Self {
        self.periods = periods;
        self
    }

    pub fn pair(&self) -> &PairSymbol {
        &self.pair
    }

    pub fn periods(&self) -> StochasticConfig {
        self.periods
    }

    pub fn state(&self) -> &AnalyzerState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, AnalyzerState::Loaded(_))
    }

    /// Fetches the pair's series and stores it, replacing any previous one.
    /// On failure the current state is kept.
    pub fn load_data(&mut self) -> Result<&PriceSeries, AnalyzerError> {
        let series = self.source.fetch(&self.pair)?;
        info!(
            "✅ Loaded {} bars for {} ({} .. {})",
            series.len(),
            self.pair,
            series.first().timestamp,
            series.last().timestamp
        );
        self.state = AnalyzerState::Loaded(series);
        self.series()
    }

    /// The loaded series.
    pub fn series(&self) -> Result<&PriceSeries, AnalyzerError> {
        match &self.state {
            AnalyzerState::Loaded(series) => Ok(series),
            AnalyzerState::Empty => Err(AnalyzerError::InvalidState {
                pair: self.pair.clone(),
            }),
        }
    }

    pub fn compute_stochastic(
        &self,
        k_period: usize,
        d_period: usize,
    ) -> Result<StochasticResult, AnalyzerError> {
        let series = self.series()?;
        let result = compute_stochastic(series.bars(), k_period, d_period)?;
        debug!(
            "Stochastic({}, {}) for {}: {} %K, {} %D values",
            k_period,
            d_period,
            self.pair,
            result.k.len(),
            result.d.len()
        );
        Ok(result)
    }

    /// Stochastic with the configured periods (14/3 unless overridden).
    pub fn compute_default_stochastic(&self) -> Result<StochasticResult, AnalyzerError> {
        self.compute_stochastic(self.periods.k_period, self.periods.d_period)
    }

    pub fn request_price_chart(&self) -> Result<(), AnalyzerError> {
        let series = self.series()?;
        self.charts.render_price_series(&self.pair, series)?;
        Ok(())
    }

    pub fn request_stochastic_chart(&self) -> Result<(), AnalyzerError> {
        let series = self.series()?;
        let result = self.compute_default_stochastic()?;
        self.charts.render_stochastic(&self.pair, series, &result)?;
        Ok(())
    }
}
