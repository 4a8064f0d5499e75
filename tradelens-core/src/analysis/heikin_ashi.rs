//! Heikin-Ashi recoloring.
//!
//! HA_Close = (O + H + L + C) / 4
//! HA_Open[0] = (O[0] + C[0]) / 2, HA_Open[t] = (HA_Open[t-1] + HA_Close[t-1]) / 2
//! HA_High = max(H, HA_Open, HA_Close), HA_Low = min(L, HA_Open, HA_Close)
//!
//! HA_Open depends on the previous output, so the transform runs left to right.
//! Timestamps and volume are carried through unchanged.

use crate::domain::{Bar, OhlcvFrame};

/// Heikin-Ashi bars for a frame. Same length, same timestamps.
pub fn heikin_ashi(frame: &OhlcvFrame) -> Vec<Bar> {
    let mut out: Vec<Bar> = Vec::with_capacity(frame.len());
    for bar in frame.bars() {
        let ha_close = (bar.open + bar.high + bar.low + bar.close) / 4.0;
        let ha_open = match out.last() {
            Some(prev) => (prev.open + prev.close) / 2.0,
            None => (bar.open + bar.close) / 2.0,
        };
        out.push(Bar {
            timestamp: bar.timestamp,
            open: ha_open,
            high: bar.high.max(ha_open).max(ha_close),
            low: bar.low.min(ha_open).min(ha_close),
            close: ha_close,
            volume: bar.volume,
        });
    }
    out
}
