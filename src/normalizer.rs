use crate::model::{FetchError, PairSymbol, PriceBar, PriceSeries};
use tracing::debug;

/// Sorts bars chronologically, drops rows with non-finite values and collapses
/// duplicate timestamps (the later row wins). Returns how many rows were dropped.
pub fn normalize_all(bars: &mut Vec<PriceBar>) -> usize {
    let before = bars.len();

    bars.retain(is_usable);
    // stable sort keeps arrival order among equal timestamps
    bars.sort_by_key(|b| b.timestamp);

    let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
    for bar in bars.drain(..) {
        match deduped.last_mut() {
            Some(prev) if prev.timestamp == bar.timestamp => *prev = bar,
            _ => deduped.push(bar),
        }
    }
    *bars = deduped;

    let dropped = before - bars.len();
    if dropped > 0 {
        debug!("Normalizer dropped {} of {} rows", dropped, before);
    }
    dropped
}

/// Normalizes raw rows into a series; no surviving row means `EmptyResult`.
pub fn into_series(pair: &PairSymbol, mut bars: Vec<PriceBar>) -> Result<PriceSeries, FetchError> {
    normalize_all(&mut bars);
    if bars.is_empty() {
        return Err(FetchError::EmptyResult(pair.to_string()));
    }
    Ok(PriceSeries::new(bars)?)
}

fn is_usable(bar: &PriceBar) -> bool {
    [bar.open, bar.high, bar.low, bar.close, bar.volume]
        .iter()
        .all(|v| v.is_finite())
}
