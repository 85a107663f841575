//! Trailing window statistics
//!
//! Each value at index `i` is computed from `series[i + 1 - window ..= i]`
//! only, never from later samples. Windows are independent, so indices are
//! evaluated in parallel without any chunk-boundary effects.

use rayon::prelude::*;

/// Mean and sample standard deviation of one trailing window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    /// `None` when fewer than 2 samples are in the window
    pub std: Option<f64>,
}

fn trailing(series: &[f64], index: usize, window: usize) -> &[f64] {
    let start = (index + 1).saturating_sub(window);
    &series[start..=index]
}

fn window_stats(values: &[f64]) -> WindowStats {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = if values.len() < 2 {
        None
    } else if is_flat(values) {
        // Exactly 0, not the rounding residue of a mean like 0.1
        Some(0.0)
    } else {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        Some((ss / (n - 1.0)).sqrt())
    };
    WindowStats { mean, std }
}

fn is_flat(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Rolling mean and sample std (n-1 denominator)
///
/// Returns `None` until `min_periods` samples are available.
pub fn rolling_stats(series: &[f64], window: usize, min_periods: usize) -> Vec<Option<WindowStats>> {
    (0..series.len())
        .into_par_iter()
        .map(|i| {
            let values = trailing(series, i, window);
            if values.len() < min_periods.max(1) {
                None
            } else {
                Some(window_stats(values))
            }
        })
        .collect()
}

/// Rolling mean only
pub fn rolling_mean(series: &[f64], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    (0..series.len())
        .into_par_iter()
        .map(|i| {
            let values = trailing(series, i, window);
            if values.len() < min_periods.max(1) {
                None
            } else {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_mean_waits_for_min_periods() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0];
        let means = rolling_mean(&series, 3, 3);
        assert_eq!(means, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_rolling_mean_partial_window() {
        let series = [2.0, 4.0, 6.0, 8.0];
        let means = rolling_mean(&series, 10, 2);
        assert_eq!(means, vec![None, Some(3.0), Some(4.0), Some(5.0)]);
    }

    #[test]
    fn test_sample_std() {
        // Sample std of [2, 4, 4, 4, 5, 5, 7, 9] is sqrt(32 / 7)
        let series = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = rolling_stats(&series, 8, 8);
        let last = stats[7].unwrap();
        assert!((last.mean - 5.0).abs() < 1e-12);
        assert!((last.std.unwrap() - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!(stats[6].is_none());
    }

    #[test]
    fn test_flat_window_has_zero_std() {
        let series = [3.0; 6];
        let stats = rolling_stats(&series, 4, 4);
        assert_eq!(stats[5].unwrap().std, Some(0.0));
    }

    #[test]
    fn test_flat_inexact_value_has_zero_std() {
        for value in [0.1, 12.3] {
            let series = vec![value; 30];
            let stats = rolling_stats(&series, 24, 24);
            assert!(stats[..23].iter().all(|s| s.is_none()));
            assert!(stats[23..].iter().all(|s| s.unwrap().std == Some(0.0)));
        }
    }

    #[test]
    fn test_no_look_ahead() {
        let mut series = vec![1.0; 10];
        let before = rolling_stats(&series, 3, 3);
        series[9] = 1000.0;
        let after = rolling_stats(&series, 3, 3);
        assert_eq!(before[..9], after[..9]);
        assert_ne!(before[9], after[9]);
    }
}
