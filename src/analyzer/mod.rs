// Analyzer module: the pair analyzer state machine and the indicator math behind it.

pub mod market_indicators;
pub mod pair_analyzer;
pub mod stochastic;

// Re-export the main analyzer for ease of use.
pub use pair_analyzer::{AnalyzerState, PairAnalyzer};
pub use stochastic::compute_stochastic;
