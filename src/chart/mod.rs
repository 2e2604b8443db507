// Chart rendering collaborators.

pub mod json_writer;

use crate::model::{ChartError, PairSymbol, PriceSeries, StochasticResult};

pub use json_writer::JsonChartWriter;

/// Receives chart requests from the analyzer; what gets drawn is up to the implementation.
pub trait ChartRenderer: Send + Sync {
    fn render_price_series(&self, pair: &PairSymbol, series: &PriceSeries) -> Result<(), ChartError>;

    fn render_stochastic(
        &self,
        pair: &PairSymbol,
        series: &PriceSeries,
        result: &StochasticResult,
    ) -> Result<(), ChartError>;
}
