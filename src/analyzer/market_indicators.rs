/// Window helpers shared by the indicator code.
pub struct MarketAnalyzer;

impl MarketAnalyzer {
    /// Simple moving average over each full window of `window_size` values.
    /// Returns an empty vector when the window is zero or longer than `data`.
    pub fn moving_average(data: &[f64], window_size: usize) -> Vec<f64> {
        if window_size == 0 || data.len() < window_size {
            return Vec::new();
        }
        data.windows(window_size)
            .map(|window| window.iter().sum::<f64>() / window_size as f64)
            .collect()
    }

    /// Lowest and highest value of a non-empty window.
    pub fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
        values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_average_of_full_windows() {
        let ma = MarketAnalyzer::moving_average(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(ma, vec![1.5, 2.5, 3.5]);
    }

    #[test]
    fn moving_average_degenerate_windows() {
        assert!(MarketAnalyzer::moving_average(&[1.0, 2.0], 0).is_empty());
        assert!(MarketAnalyzer::moving_average(&[1.0, 2.0], 3).is_empty());
        assert_eq!(MarketAnalyzer::moving_average(&[4.0], 1), vec![4.0]);
    }

    #[test]
    fn min_max_of_window() {
        assert_eq!(MarketAnalyzer::min_max([3.0, -1.0, 7.5].into_iter()), (-1.0, 7.5));
    }
}
