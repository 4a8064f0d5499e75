//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use tradelens_core::domain::{Bar, OhlcvFrame};

/// Daily bars from closes. Open is the previous close; high and low sit
/// `spread` (a fraction) beyond the body.
pub fn bars_from_closes(closes: &[f64], spread: f64) -> Vec<Bar> {
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + Duration::days(i as i64),
                open,
                high: open.max(close) * (1.0 + spread),
                low: open.min(close) * (1.0 - spread),
                close,
                volume: 1_000.0,
            }
        })
        .collect()
}

pub fn frame_from_closes(closes: &[f64], spread: f64) -> OhlcvFrame {
    OhlcvFrame::new(bars_from_closes(closes, spread)).unwrap()
}

/// `n` closes rising linearly from `start` to `end`.
pub fn linear(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, epsilon={epsilon}"
    );
}
