//! Swing-pivot support/resistance levels.
//!
//! A bar is a swing low when its low is the minimum of the surrounding window,
//! and a swing high when its high is the window maximum. A bar that is both is
//! recorded as a swing low only. Levels further than 15% from the latest close
//! are discarded.

use crate::domain::OhlcvFrame;
use crate::error::AnalysisError;
use serde::Serialize;

/// Bars on each side of the candidate; the window is `[i - 5, i + 5)`.
pub const SWING_RADIUS: usize = 5;
/// Maximum relative distance from the latest close.
pub const PROXIMITY_BAND: f64 = 0.15;
/// Levels shown on each side of price.
pub const LEVELS_PER_SIDE: usize = 3;

/// Deduplicated swing levels, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LevelSet {
    pub levels: Vec<f64>,
}

/// Levels split around a reference price, nearest first on each side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupportResistance {
    pub supports: Vec<f64>,
    pub resistances: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Swing {
    Low,
    High,
}

fn classify(lows: &[f64], highs: &[f64], i: usize) -> Option<Swing> {
    let window = i - SWING_RADIUS..i + SWING_RADIUS;
    let window_min = lows[window.clone()].iter().copied().fold(f64::MAX, f64::min);
    let window_max = highs[window].iter().copied().fold(f64::MIN, f64::max);
    if lows[i] == window_min {
        Some(Swing::Low)
    } else if highs[i] == window_max {
        Some(Swing::High)
    } else {
        None
    }
}

/// Extract swing levels near the latest close.
pub fn find_swing_levels(frame: &OhlcvFrame) -> Result<LevelSet, AnalysisError> {
    let close = frame
        .last_close()
        .ok_or_else(|| AnalysisError::insufficient("swing levels", 1, 0))?;
    let lows = frame.lows();
    let highs = frame.highs();
    let n = frame.len();

    let mut levels = Vec::new();
    if n > 2 * SWING_RADIUS {
        for i in SWING_RADIUS..n - SWING_RADIUS {
            match classify(&lows, &highs, i) {
                Some(Swing::Low) => levels.push(lows[i]),
                Some(Swing::High) => levels.push(highs[i]),
                None => {}
            }
        }
    }

    levels.retain(|level| ((level - close) / close).abs() < PROXIMITY_BAND);
    levels.sort_by(f64::total_cmp);
    levels.dedup();
    Ok(LevelSet { levels })
}

/// Split `levels` around the latest close. See [`LevelSet::split`].
pub fn split_levels(levels: &LevelSet, close: f64) -> SupportResistance {
    levels.split(close)
}

impl LevelSet {
    /// Up to three nearest levels below `price` (supports) and above it
    /// (resistances). A level equal to `price` is neither.
    pub fn split(&self, price: f64) -> SupportResistance {
        let supports = self
            .levels
            .iter()
            .rev()
            .copied()
            .filter(|&l| l < price)
            .take(LEVELS_PER_SIDE)
            .collect();
        let resistances = self
            .levels
            .iter()
            .copied()
            .filter(|&l| l > price)
            .take(LEVELS_PER_SIDE)
            .collect();
        SupportResistance {
            supports,
            resistances,
        }
    }
}
