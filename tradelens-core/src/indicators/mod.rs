//! Series primitives.
//!
//! Every primitive is a pure function from a numeric series to a series of the
//! same length. Positions without enough history hold `f64::NAN` (warmup), and a
//! NaN anywhere in a rolling window makes that output NaN.
//!
//! The bar-level wrappers implement [`Indicator`], which adds the one fallible
//! operation: asking for the latest scalar value of a series that is too short.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod rsi;
pub mod sma;

pub use atr::{true_range, Atr};
pub use bollinger::{Bollinger, BollingerBands};
pub use ema::{ema_of_series, Ema};
pub use rsi::{rsi_of_series, Rsi};
pub use sma::{rolling_max, rolling_min, rolling_std, sma_of_series, Sma};

use crate::domain::Bar;
use crate::error::AnalysisError;

/// Trait for bar-series indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length. No value at bar t depends on bars after t.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_50", "atr_14").
    fn name(&self) -> &str;

    /// Minimum number of bars before the latest value is meaningful.
    fn min_bars(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;

    /// Latest value of the series.
    ///
    /// Fails with `InsufficientData` when fewer than [`Indicator::min_bars`] bars
    /// are given, and with `Domain` when the latest value is not finite.
    fn latest(&self, bars: &[Bar]) -> Result<f64, AnalysisError> {
        let needed = self.min_bars();
        if bars.len() < needed {
            return Err(AnalysisError::InsufficientData {
                what: "indicator",
                needed,
                got: bars.len(),
            });
        }
        let value = self.compute(bars).last().copied().unwrap_or(f64::NAN);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(AnalysisError::Domain(format!(
                "{} latest value is not finite",
                self.name()
            )))
        }
    }
}

/// Apply `f` to every full window of `window` values.
///
/// Output is NaN for the first `window - 1` positions and wherever the window
/// contains a NaN.
pub(crate) fn rolling(values: &[f64], window: usize, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 || n < window {
        return result;
    }
    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = f(slice);
    }
    result
}

pub(crate) fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
