use crate::model::{FetchError, PairSymbol, PriceSeries};

/// Anything that can produce a chronologically ordered, non-empty series for a pair.
pub trait MarketDataSource: Send + Sync {
    fn fetch(&self, pair: &PairSymbol) -> Result<PriceSeries, FetchError>;
}

impl<S: MarketDataSource + ?Sized> MarketDataSource for Box<S> {
    fn fetch(&self, pair: &PairSymbol) -> Result<PriceSeries, FetchError> {
        (**self).fetch(pair)
    }
}
