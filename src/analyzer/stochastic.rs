//! Stochastic oscillator.
//!
//! ```text
//! %K[i] = 100 * (close[i] - lowest low) / (highest high - lowest low)
//! %D    = SMA(%K, d_period)
//! ```
//!
//! The extremes are taken over the `k_period` bars ending at `i`. A window whose
//! range is zero (flat market) yields `%K = 0` instead of NaN. "Zero" is an
//! absolute threshold of `f64::EPSILON`, independent of the price scale, so
//! genuine ranges of sub-cent assets (e.g. `1e-9`) still produce a value.
//!
//! `%K` has `n - k_period + 1` values and `%D` has `n - k_period - d_period + 2`
//! (or none when there are fewer than `d_period` %K values).

use crate::analyzer::market_indicators::MarketAnalyzer;
use crate::model::{AnalyzerError, PriceBar, StochasticResult};

/// Computes %K and %D over `bars`.
///
/// # Errors
///
/// [`AnalyzerError::InvalidParameters`] if either period is zero or `k_period`
/// exceeds the number of bars.
pub fn compute_stochastic(
    bars: &[PriceBar],
    k_period: usize,
    d_period: usize,
) -> Result<StochasticResult, AnalyzerError> {
    if k_period == 0 || d_period == 0 || k_period > bars.len() {
        return Err(AnalyzerError::InvalidParameters {
            k_period,
            d_period,
            available: bars.len(),
        });
    }

    let k: Vec<f64> = bars.windows(k_period).map(percent_k).collect();
    let d = MarketAnalyzer::moving_average(&k, d_period);
    let timestamps = bars[k_period - 1..].iter().map(|b| b.timestamp).collect();

    Ok(StochasticResult {
        k_period,
        d_period,
        timestamps,
        k,
        d,
    })
}

fn percent_k(window: &[PriceBar]) -> f64 {
    let (lowest, _) = MarketAnalyzer::min_max(window.iter().map(|b| b.low));
    let (_, highest) = MarketAnalyzer::min_max(window.iter().map(|b| b.high));
    let range = highest - lowest;
    if range.abs() < f64::EPSILON {
        return 0.0;
    }
    let close = window[window.len() - 1].close;
    100.0 * (close - lowest) / range
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::from_unix_secs;
    use rand::Rng;

    fn bar(i: usize, high: f64, low: f64, close: f64) -> PriceBar {
        PriceBar {
            timestamp: from_unix_secs(1_709_251_200 + i as i64 * 86_400).unwrap(),
            open: close,
            high,
            low,
            close,
            volume: 0.0,
        }
    }

    fn ramp(n: usize) -> Vec<PriceBar> {
        (0..n)
            .map(|i| {
                let c = 10.0 + i as f64;
                bar(i, c + 0.5, c - 0.5, c)
            })
            .collect()
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn lengths_for_twenty_bars_default_periods() {
        let result = compute_stochastic(&ramp(20), 14, 3).unwrap();
        assert_eq!(result.k.len(), 7);
        assert_eq!(result.d.len(), 5);
        assert_eq!(result.timestamps.len(), 7);
        assert_eq!(result.d_timestamps().len(), 5);
    }

    #[test]
    fn timestamps_align_with_source() {
        let bars = ramp(20);
        let result = compute_stochastic(&bars, 14, 3).unwrap();
        assert_eq!(result.timestamps[0], bars[13].timestamp);
        assert_eq!(result.d_timestamps()[0], bars[15].timestamp);
        assert_eq!(*result.timestamps.last().unwrap(), bars[19].timestamp);
    }

    #[test]
    fn hand_computed_values() {
        let bars = vec![
            bar(0, 10.0, 8.0, 9.0),
            bar(1, 12.0, 9.0, 11.0),
            bar(2, 11.0, 7.0, 8.0),
            bar(3, 13.0, 10.0, 12.0),
        ];
        let result = compute_stochastic(&bars, 3, 2).unwrap();
        // window 0..=2: low 7, high 12, close 8 -> 20
        // window 1..=3: low 7, high 13, close 12 -> 83.33..
        assert!(approx_eq(result.k[0], 20.0));
        assert!(approx_eq(result.k[1], 500.0 / 6.0));
        assert!(approx_eq(result.d[0], (20.0 + 500.0 / 6.0) / 2.0));
    }

    #[test]
    fn flat_window_is_zero_not_nan() {
        let bars: Vec<_> = (0..5).map(|i| bar(i, 3.0, 3.0, 3.0)).collect();
        let result = compute_stochastic(&bars, 3, 3).unwrap();
        assert!(result.k.iter().all(|&k| k == 0.0));
        assert_eq!(result.d, vec![0.0]);
    }

    #[test]
    fn tiny_price_range_is_not_treated_as_flat() {
        let bars = vec![
            bar(0, 2.0e-9, 1.0e-9, 1.5e-9),
            bar(1, 2.0e-9, 1.0e-9, 1.5e-9),
        ];
        let result = compute_stochastic(&bars, 2, 1).unwrap();
        assert!((result.k[0] - 50.0).abs() < 1e-6);
    }

    #[test]
    fn close_at_high_is_hundred() {
        let result = compute_stochastic(&ramp(5), 5, 1).unwrap();
        // close = 14, lowest low = 9.5, highest high = 14.5
        assert!(approx_eq(result.k[0], 100.0 * 4.5 / 5.0));
        assert_eq!(result.d, result.k);
    }

    #[test]
    fn d_is_empty_when_not_enough_k_values() {
        let result = compute_stochastic(&ramp(14), 14, 3).unwrap();
        assert_eq!(result.k.len(), 1);
        assert!(result.d.is_empty());
        assert!(result.d_timestamps().is_empty());
    }

    #[test]
    fn rejects_zero_and_oversized_periods() {
        let bars = ramp(20);
        for (k, d) in [(0, 3), (25, 3), (14, 0), (21, 1)] {
            let err = compute_stochastic(&bars, k, d).unwrap_err();
            assert!(
                matches!(err, AnalyzerError::InvalidParameters { available: 20, .. }),
                "k={k} d={d} gave {err:?}"
            );
        }
    }

    #[test]
    fn k_period_equal_to_length_is_allowed() {
        let result = compute_stochastic(&ramp(20), 20, 3).unwrap();
        assert_eq!(result.k.len(), 1);
    }

    #[test]
    fn random_series_stay_within_bounds() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let mut price = 100.0;
            let bars: Vec<_> = (0..60)
                .map(|i| {
                    price += rng.random_range(-2.0..2.0);
                    let spread = rng.random_range(0.0..1.5);
                    let close = price + rng.random_range(-spread..=spread);
                    bar(i, price + spread, price - spread, close)
                })
                .collect();
            let k_period = rng.random_range(1..=20);
            let d_period = rng.random_range(1..=5);
            let result = compute_stochastic(&bars, k_period, d_period).unwrap();
            assert_eq!(result.k.len(), 60 - k_period + 1);
            for v in result.k.iter().chain(result.d.iter()) {
                assert!((0.0..=100.0).contains(v), "out of range: {v}");
            }
        }
    }
}
