//! OHLCV frame: an ordered, validated bar series.

use super::Bar;
use crate::error::AnalysisError;
use serde::Serialize;
use tracing::warn;

/// Ordered sequence of bars with strictly increasing timestamps.
///
/// Calendar gaps are allowed. Every bar satisfies [`Bar::is_sane`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OhlcvFrame {
    bars: Vec<Bar>,
}

impl OhlcvFrame {
    /// Build a frame, rejecting malformed bars and out-of-order timestamps.
    pub fn new(bars: Vec<Bar>) -> Result<Self, AnalysisError> {
        for (i, bar) in bars.iter().enumerate() {
            if let Some(reason) = bar.insanity() {
                return Err(AnalysisError::Domain(format!("bar {i}: {reason}")));
            }
            if i > 0 && bars[i - 1].timestamp >= bar.timestamp {
                return Err(AnalysisError::Domain(format!(
                    "bar {i}: timestamp {} does not follow {}",
                    bar.timestamp,
                    bars[i - 1].timestamp
                )));
            }
        }
        Ok(Self { bars })
    }

    /// The empty frame, used when a provider is unavailable.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Canonicalize raw provider rows: drop bars that fail the sanity check,
    /// sort by timestamp, then drop duplicate timestamps (first sane row wins).
    pub fn canonicalize(mut bars: Vec<Bar>) -> Self {
        let before = bars.len();
        bars.retain(Bar::is_sane);
        let dropped = before - bars.len();
        if dropped > 0 {
            warn!(dropped, "dropped malformed bars during canonicalization");
        }
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }
}
