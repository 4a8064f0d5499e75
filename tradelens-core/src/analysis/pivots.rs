//! Floor pivots, dynamic levels (EMAs and Bollinger bands), and the
//! nearest-level insight that ties them to the current price.

use crate::domain::OhlcvFrame;
use crate::error::AnalysisError;
use crate::indicators::{ema_of_series, BollingerBands};
use serde::Serialize;
use std::fmt;

/// Within this relative distance a level counts as being tested.
pub const TESTING_THRESHOLD: f64 = 0.008;

/// Classical floor-trader pivots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pivots {
    pub pp: f64,
    pub r1: f64,
    pub r2: f64,
    pub s1: f64,
    pub s2: f64,
}

impl Pivots {
    /// Pivots from a single bar's high, low and close.
    pub fn from_hlc(high: f64, low: f64, close: f64) -> Self {
        let pp = (high + low + close) / 3.0;
        let range = high - low;
        Self {
            pp,
            r1: 2.0 * pp - low,
            r2: pp + range,
            s1: 2.0 * pp - high,
            s2: pp - range,
        }
    }

    /// Pivots from the second-to-last bar of the frame.
    pub fn from_frame(frame: &OhlcvFrame) -> Result<Self, AnalysisError> {
        let bars = frame.bars();
        if bars.len() < 2 {
            return Err(AnalysisError::insufficient("pivots", 2, bars.len()));
        }
        let prior = &bars[bars.len() - 2];
        Ok(Self::from_hlc(prior.high, prior.low, prior.close))
    }

    /// Named levels in declaration order.
    pub fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("PP", self.pp),
            ("R1", self.r1),
            ("R2", self.r2),
            ("S1", self.s1),
            ("S2", self.s2),
        ]
    }
}

/// Moving-average and band levels at the latest bar.
///
/// A level is `None` when the frame is shorter than its window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dynamics {
    pub ema20: Option<f64>,
    pub ema50: Option<f64>,
    pub ema200: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub current: f64,
    /// Length of the frame the levels were computed from.
    #[serde(skip)]
    pub bars: usize,
}

fn latest_if(values: &[f64], min_len: usize) -> Option<f64> {
    if values.len() < min_len {
        return None;
    }
    values.last().copied().filter(|v| v.is_finite())
}

impl Dynamics {
    pub fn from_frame(frame: &OhlcvFrame) -> Result<Self, AnalysisError> {
        let closes = frame.closes();
        let current = frame
            .last_close()
            .ok_or_else(|| AnalysisError::insufficient("dynamics", 1, 0))?;
        let bands = BollingerBands::of_series(&closes, 20, 2.0);
        Ok(Self {
            ema20: latest_if(&ema_of_series(&closes, 20), 20),
            ema50: latest_if(&ema_of_series(&closes, 50), 50),
            ema200: latest_if(&ema_of_series(&closes, 200), 200),
            bb_upper: latest_if(&bands.upper, 20),
            bb_lower: latest_if(&bands.lower, 20),
            current,
            bars: closes.len(),
        })
    }

    /// Defined levels in declaration order, excluding `Current`.
    pub fn named(&self) -> Vec<(&'static str, f64)> {
        [
            ("EMA 20", self.ema20),
            ("EMA 50", self.ema50),
            ("EMA 200", self.ema200),
            ("BB Upper", self.bb_upper),
            ("BB Lower", self.bb_lower),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Regime {
    BullishStrong,
    BullishRetrace,
    BearishStrong,
    BearishCorrection,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Regime::BullishStrong => "Bullish Strong",
            Regime::BullishRetrace => "Bullish Retrace",
            Regime::BearishStrong => "Bearish Strong",
            Regime::BearishCorrection => "Bearish Correction",
        };
        f.write_str(s)
    }
}

/// Price relative to the nearest level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Proximity {
    Testing,
    RoomToRun,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub regime: Regime,
    pub nearest: &'static str,
    pub nearest_value: f64,
    pub distance: f64,
    pub proximity: Proximity,
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.proximity {
            Proximity::Testing => write!(f, "{} | Testing {}", self.regime, self.nearest),
            Proximity::RoomToRun => write!(f, "{} | Room to run to {}", self.regime, self.nearest),
        }
    }
}

/// Classify the regime and locate the nearest pivot or dynamic level.
///
/// Ties resolve to the first level in order: pivots, then dynamics.
pub fn dynamic_insight(
    price: f64,
    pivots: &Pivots,
    dynamics: &Dynamics,
) -> Result<Insight, AnalysisError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(AnalysisError::Domain(format!("invalid price {price}")));
    }
    let (Some(ema20), Some(ema200)) = (dynamics.ema20, dynamics.ema200) else {
        return Err(AnalysisError::insufficient(
            "dynamic insight",
            200,
            dynamics.bars,
        ));
    };

    let regime = if price > ema200 && price > ema20 {
        Regime::BullishStrong
    } else if price > ema200 {
        Regime::BullishRetrace
    } else if price < ema20 {
        Regime::BearishStrong
    } else {
        Regime::BearishCorrection
    };

    let mut nearest: Option<(&'static str, f64, f64)> = None;
    for (name, value) in pivots.named().into_iter().chain(dynamics.named()) {
        let distance = (price - value).abs();
        if nearest.map_or(true, |(_, _, best)| distance < best) {
            nearest = Some((name, value, distance));
        }
    }
    // Pivots always contribute five levels.
    let (name, value, distance) =
        nearest.ok_or_else(|| AnalysisError::Domain("no levels to compare".into()))?;

    let proximity = if distance / price < TESTING_THRESHOLD {
        Proximity::Testing
    } else {
        Proximity::RoomToRun
    };

    Ok(Insight {
        regime,
        nearest: name,
        nearest_value: value,
        distance,
        proximity,
    })
}
