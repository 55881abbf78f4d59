//! Momentum oscillator over an ordered close series.
//!
//! This is the simple-average RSI variant: gains and losses are averaged
//! over the whole look-back window rather than smoothed recursively, which
//! matches the dashboards this crate replaces.

use crate::core::error::ComputeError;

/// Standard 14-period look-back.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Computes the Relative Strength Index over the trailing `period + 1`
/// closes of `closes` (i.e. `period` deltas), returning a value in
/// [0, 100].
///
/// Convention: the function slices the trailing window itself, so callers
/// pass whatever history they have, oldest first. (Upstream dashboards
/// disagreed on this: some passed `period` and the full history, others
/// pre-sliced the last `period + 1` closes. Both spellings hit the same
/// window here.) A slice shorter than `period + 1` uses all available
/// deltas.
///
/// Edge policies, kept exactly for compatibility with the replaced
/// dashboards:
/// - fewer than 2 closes returns the neutral value 50,
/// - zero average loss returns exactly 100.
pub fn relative_strength(closes: &[f64], period: usize) -> Result<f64, ComputeError> {
    if period == 0 {
        return Err(ComputeError::invalid_input("period must be at least 1"));
    }
    if closes.len() < 2 {
        return Ok(50.0);
    }

    let window_start = closes.len().saturating_sub(period + 1);
    let window = &closes[window_start..];

    let mut total_gains = 0.0;
    let mut total_losses = 0.0;
    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            total_gains += change;
        } else {
            total_losses -= change;
        }
    }

    let deltas = (window.len() - 1) as f64;
    let avg_gain = total_gains / deltas;
    let avg_loss = total_losses / deltas;

    if avg_loss == 0.0 {
        return Ok(100.0);
    }
    Ok(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
}

/// Standard 20-period Bollinger window.
pub const DEFAULT_BOLLINGER_WINDOW: usize = 20;

const BOLLINGER_MULTIPLIER: f64 = 2.0;

/// Simple moving average with bands two population standard deviations
/// either side of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Computes Bollinger bands over the trailing `window` closes.
///
/// The middle band is the simple moving average of the window; the upper
/// and lower bands sit two population standard deviations (divide by N,
/// not N - 1) either side of it. A history shorter than `window` is a
/// contract violation rather than a fallback case: the bands are
/// meaningless on a partial window.
pub fn bollinger(closes: &[f64], window: usize) -> Result<BollingerBands, ComputeError> {
    if window == 0 {
        return Err(ComputeError::invalid_input("window must be at least 1"));
    }
    if closes.len() < window {
        return Err(ComputeError::InsufficientData {
            needed: window,
            got: closes.len(),
        });
    }

    let slice = &closes[closes.len() - window..];
    let middle = slice.iter().sum::<f64>() / window as f64;
    let variance = slice
        .iter()
        .map(|close| {
            let diff = close - middle;
            diff * diff
        })
        .sum::<f64>()
        / window as f64;
    let stddev = variance.sqrt();

    Ok(BollingerBands {
        middle,
        upper: middle + BOLLINGER_MULTIPLIER * stddev,
        lower: middle - BOLLINGER_MULTIPLIER * stddev,
    })
}

/// Percentage change of the last close against the previous one.
///
/// Unlike [`relative_strength`] there is no neutral fallback here; fewer
/// than 2 closes is a contract violation.
pub fn percent_change(closes: &[f64]) -> Result<f64, ComputeError> {
    if closes.len() < 2 {
        return Err(ComputeError::InsufficientData {
            needed: 2,
            got: closes.len(),
        });
    }
    let prev = closes[closes.len() - 2];
    let last = closes[closes.len() - 1];
    if prev == 0.0 {
        return Err(ComputeError::invalid_input(
            "previous close is zero, change is undefined",
        ));
    }
    Ok((last - prev) / prev * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_inputs_return_neutral() {
        assert_eq!(relative_strength(&[], 14).unwrap(), 50.0);
        assert_eq!(relative_strength(&[101.5], 14).unwrap(), 50.0);
    }

    #[test]
    fn strictly_increasing_closes_peg_at_100() {
        let closes: Vec<f64> = (1..=20).map(|n| n as f64).collect();
        assert_eq!(relative_strength(&closes, 14).unwrap(), 100.0);
    }

    #[test]
    fn strictly_decreasing_closes_peg_at_0() {
        let closes: Vec<f64> = (1..=20).rev().map(|n| n as f64).collect();
        assert_eq!(relative_strength(&closes, 14).unwrap(), 0.0);
    }

    #[test]
    fn mixed_window_is_deterministic_and_bounded() {
        let closes = [
            10.0, 12.0, 11.0, 13.0, 15.0, 14.0, 16.0, 18.0, 17.0, 19.0, 21.0, 20.0, 22.0, 24.0,
            23.0,
        ];
        // 14 deltas: 9 gains of +2, 5 losses of -1.
        let expected = 100.0 - 100.0 / (1.0 + 18.0 / 5.0);
        let first = relative_strength(&closes, 14).unwrap();
        assert!((first - expected).abs() < 1e-9);
        assert!(first > 0.0 && first < 100.0);
        let second = relative_strength(&closes, 14).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn long_history_only_uses_the_trailing_window() {
        let mut closes = vec![1000.0; 50];
        closes.extend([
            10.0, 12.0, 11.0, 13.0, 15.0, 14.0, 16.0, 18.0, 17.0, 19.0, 21.0, 20.0, 22.0, 24.0,
            23.0,
        ]);
        let full = relative_strength(&closes, 14).unwrap();
        let sliced = relative_strength(&closes[closes.len() - 15..], 14).unwrap();
        assert_eq!(full, sliced);
    }

    #[test]
    fn short_history_uses_all_deltas() {
        // 3 closes, period 14: two deltas, one gain and one loss.
        let got = relative_strength(&[10.0, 14.0, 12.0], 14).unwrap();
        let expected = 100.0 - 100.0 / (1.0 + 4.0 / 2.0);
        assert!((got - expected).abs() < 1e-9);
    }

    #[test]
    fn flat_closes_peg_at_100() {
        // No losses at all, matching the documented avg_loss == 0 policy.
        assert_eq!(relative_strength(&[5.0, 5.0, 5.0, 5.0], 14).unwrap(), 100.0);
    }

    #[test]
    fn zero_period_is_rejected() {
        let err = relative_strength(&[1.0, 2.0, 3.0], 0).unwrap_err();
        assert!(matches!(err, ComputeError::InvalidInput { .. }));
    }

    #[test]
    fn bollinger_bands_on_a_flat_window_collapse_to_the_mean() {
        let bands = bollinger(&[50.0; 20], 20).unwrap();
        assert_eq!(bands.middle, 50.0);
        assert_eq!(bands.upper, 50.0);
        assert_eq!(bands.lower, 50.0);
    }

    #[test]
    fn bollinger_bands_use_population_stddev_over_the_trailing_window() {
        // Stale history ahead of the window must not leak into the bands.
        let mut closes = vec![9999.0; 30];
        closes.extend([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let bands = bollinger(&closes, 8).unwrap();
        // mean = 5, population variance = 4, stddev = 2.
        assert!((bands.middle - 5.0).abs() < 1e-9);
        assert!((bands.upper - 9.0).abs() < 1e-9);
        assert!((bands.lower - 1.0).abs() < 1e-9);
    }

    #[test]
    fn bollinger_rejects_short_history() {
        let err = bollinger(&[1.0, 2.0, 3.0], 20).unwrap_err();
        assert_eq!(err, ComputeError::InsufficientData { needed: 20, got: 3 });
    }

    #[test]
    fn bollinger_rejects_zero_window() {
        let err = bollinger(&[1.0, 2.0, 3.0], 0).unwrap_err();
        assert!(matches!(err, ComputeError::InvalidInput { .. }));
    }

    #[test]
    fn percent_change_of_last_two_closes() {
        let got = percent_change(&[100.0, 80.0, 110.0]).unwrap();
        assert!((got - 37.5).abs() < 1e-9);
    }

    #[test]
    fn percent_change_requires_two_closes() {
        let err = percent_change(&[42.0]).unwrap_err();
        assert_eq!(err, ComputeError::InsufficientData { needed: 2, got: 1 });
    }
}
