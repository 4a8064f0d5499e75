//! Setup classifier: trend, signal, RSI, and ATR-based entry/stop/target.
//!
//! Trend is read off the close / EMA50 / EMA200 stack. Stops and targets sit
//! 1.5 and 2.5 ATRs from the entry, on the side implied by the trend; a
//! sideways market uses the long-side geometry but signals WAIT.

use crate::domain::OhlcvFrame;
use crate::error::AnalysisError;
use crate::indicators::{ema_of_series, rsi_of_series, Atr, Indicator};
use serde::Serialize;
use std::fmt;

/// Bars needed for the slowest input (EMA200).
pub const SETUP_MIN_BARS: usize = 200;

pub const RSI_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;
pub const STOP_ATR_MULT: f64 = 1.5;
pub const TARGET_ATR_MULT: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Uptrend,
    Downtrend,
    Sideways,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Uptrend => "Uptrend",
            Trend::Downtrend => "Downtrend",
            Trend::Sideways => "Sideways",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Wait,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Wait => "WAIT",
        };
        f.write_str(s)
    }
}

/// Technical setup for the latest bar of a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Setup {
    pub trend: Trend,
    pub signal: Signal,
    /// Presentation hint for renderers.
    pub color: &'static str,
    /// RSI(14) per bar; the first 14 entries are NaN.
    pub rsi_series: Vec<f64>,
    pub rsi_val: f64,
    pub entry: f64,
    pub sl: f64,
    pub tp: f64,
}

/// Classify the latest bar of `frame`.
///
/// Requires at least [`SETUP_MIN_BARS`] bars and finite latest EMA/ATR/RSI values.
pub fn classify_setup(frame: &OhlcvFrame) -> Result<Setup, AnalysisError> {
    let n = frame.len();
    if n < SETUP_MIN_BARS {
        return Err(AnalysisError::insufficient("setup", SETUP_MIN_BARS, n));
    }

    let closes = frame.closes();
    let c = closes[n - 1];
    let e50 = ema_of_series(&closes, 50)[n - 1];
    let e200 = ema_of_series(&closes, 200)[n - 1];
    let atr = Atr::new(ATR_PERIOD).latest(frame.bars())?;
    let rsi_series = rsi_of_series(&closes, RSI_PERIOD);
    let rsi_val = rsi_series[n - 1];

    for (name, value) in [("close", c), ("EMA50", e50), ("EMA200", e200), ("RSI", rsi_val)] {
        if !value.is_finite() {
            return Err(AnalysisError::Domain(format!("{name} is not finite")));
        }
    }

    let (trend, signal, score) = if c > e50 && e50 > e200 {
        (Trend::Uptrend, Signal::Buy, 2)
    } else if c < e50 && e50 < e200 {
        (Trend::Downtrend, Signal::Sell, -2)
    } else {
        (Trend::Sideways, Signal::Wait, 0)
    };

    let (sl, tp) = if score >= 0 {
        (c - STOP_ATR_MULT * atr, c + TARGET_ATR_MULT * atr)
    } else {
        (c + STOP_ATR_MULT * atr, c - TARGET_ATR_MULT * atr)
    };

    let color = match trend {
        Trend::Uptrend => "green",
        Trend::Downtrend => "red",
        Trend::Sideways => "gray",
    };

    Ok(Setup {
        trend,
        signal,
        color,
        rsi_series,
        rsi_val,
        entry: c,
        sl,
        tp,
    })
}
