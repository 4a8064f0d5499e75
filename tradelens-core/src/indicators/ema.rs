//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2/(span+1).
//! Seed: EMA[0] = x[0] (no bias adjustment), so every position is defined;
//! early values are valid but unstable.

use super::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("ema_{span}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    /// The recursion is defined from the first bar, but the value is only
    /// reported once a full span of history exists.
    fn min_bars(&self) -> usize {
        self.span
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        ema_of_series(&closes(bars), self.span)
    }
}

/// Compute EMA values from a pre-extracted f64 slice.
///
/// A NaN input taints every later output.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if n == 0 || span == 0 {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev = values[0];
    result[0] = prev;
    for i in 1..n {
        if prev.is_nan() || values[i].is_nan() {
            return result;
        }
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = prev;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_span_1_equals_input() {
        let out = ema_of_series(&[100.0, 200.0, 300.0], 1);
        assert_eq!(out, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn ema_seeds_with_first_value() {
        // alpha = 2/(3+1) = 0.5
        // EMA[0] = 10
        // EMA[1] = 0.5*11 + 0.5*10 = 10.5
        // EMA[2] = 0.5*12 + 0.5*10.5 = 11.25
        let out = ema_of_series(&[10.0, 11.0, 12.0], 3);
        assert_approx(out[0], 10.0, DEFAULT_EPSILON);
        assert_approx(out[1], 10.5, DEFAULT_EPSILON);
        assert_approx(out[2], 11.25, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_output_length_matches_input() {
        let values: Vec<f64> = (0..37).map(f64::from).collect();
        assert_eq!(ema_of_series(&values, 20).len(), 37);
        assert!(ema_of_series(&[], 20).is_empty());
    }

    #[test]
    fn ema_constant_series_is_constant() {
        let out = ema_of_series(&[42.0; 10], 5);
        for v in out {
            assert_approx(v, 42.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn ema_nan_propagates_forward() {
        let out = ema_of_series(&[10.0, 11.0, f64::NAN, 13.0], 3);
        assert_approx(out[1], 10.5, DEFAULT_EPSILON);
        assert!(out[2].is_nan());
        assert!(out[3].is_nan());
    }

    #[test]
    fn ema_indicator_matches_series() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let series = ema_of_series(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0], 3);
        assert_eq!(Ema::new(3).compute(&bars), series);
        assert_eq!(Ema::new(200).min_bars(), 200);
    }
}
