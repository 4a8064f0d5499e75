//! Intraday pivot ladder and Fibonacci band from a 24h (high, low, last) quote.

use serde::Serialize;

pub const FIB_TOP: f64 = 0.618;
pub const FIB_BOTTOM: f64 = 0.382;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LevelKind {
    #[serde(rename = "sup")]
    Support,
    #[serde(rename = "neu")]
    Neutral,
    #[serde(rename = "res")]
    Resistance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotLevel {
    pub name: &'static str,
    pub price: f64,
    #[serde(rename = "type")]
    pub kind: LevelKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FibBand {
    pub top: f64,
    pub bot: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Bias {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntradayPivotSet {
    /// Ordered R2, R1, PIVOT, S1, S2 from the top down.
    pub levels: Vec<PivotLevel>,
    pub fib: FibBand,
    pub status: Bias,
}

/// Build the pivot ladder for a 24h range.
///
/// Status is bullish when the last price is strictly above the range midpoint.
pub fn intraday_pivots(high: f64, low: f64, last: f64) -> IntradayPivotSet {
    let pp = (high + low + last) / 3.0;
    let range = high - low;
    let levels = vec![
        PivotLevel {
            name: "R2",
            price: pp + range,
            kind: LevelKind::Resistance,
        },
        PivotLevel {
            name: "R1",
            price: 2.0 * pp - low,
            kind: LevelKind::Resistance,
        },
        PivotLevel {
            name: "PIVOT",
            price: pp,
            kind: LevelKind::Neutral,
        },
        PivotLevel {
            name: "S1",
            price: 2.0 * pp - high,
            kind: LevelKind::Support,
        },
        PivotLevel {
            name: "S2",
            price: pp - range,
            kind: LevelKind::Support,
        },
    ];
    let status = if last > (high + low) / 2.0 {
        Bias::Bullish
    } else {
        Bias::Bearish
    };
    IntradayPivotSet {
        levels,
        fib: FibBand {
            top: low + FIB_TOP * range,
            bot: low + FIB_BOTTOM * range,
        },
        status,
    }
}
