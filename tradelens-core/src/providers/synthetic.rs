//! Deterministic synthetic market data.
//!
//! A seeded random walk with one bar per calendar day. Useful for demos and
//! for exercising the full pipeline without network access.

use super::{MarketDataProvider, SymbolInfo};
use crate::domain::{Bar, Interval, OhlcvFrame, Period};
use crate::error::UpstreamError;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    start_price: f64,
    /// Mean daily return.
    drift: f64,
    /// Half-width of the uniform daily return.
    volatility: f64,
    end: DateTime<Utc>,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        let end = NaiveDate::from_ymd_opt(2024, 12, 31)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .unwrap_or_default();
        Self {
            seed,
            start_price: 100.0,
            drift: 0.0005,
            volatility: 0.02,
            end,
        }
    }

    pub fn with_drift(mut self, drift: f64) -> Self {
        self.drift = drift;
        self
    }

    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility.abs();
        self
    }

    pub fn with_start_price(mut self, price: f64) -> Self {
        self.start_price = price;
        self
    }

    /// Per-symbol seed so different symbols get different but stable paths.
    fn seed_for(&self, symbol: &str) -> u64 {
        symbol.bytes().fold(self.seed, |acc, b| {
            acc.wrapping_mul(0x0100_0000_01b3).wrapping_add(u64::from(b))
        })
    }

    /// Generate `n` bars ending at the configured end date.
    pub fn generate(&self, symbol: &str, n: usize) -> Vec<Bar> {
        let mut rng = StdRng::seed_from_u64(self.seed_for(symbol));
        let mut close = self.start_price;
        let first = self.end - Duration::days(n.saturating_sub(1) as i64);

        (0..n)
            .map(|i| {
                let open = close;
                let ret = self.drift + rng.gen_range(-1.0..=1.0) * self.volatility;
                close = (open * (1.0 + ret)).max(0.01);
                let wick_up = rng.gen_range(0.0..=0.5) * self.volatility;
                let wick_down = rng.gen_range(0.0..=0.5) * self.volatility;
                Bar {
                    timestamp: first + Duration::days(i as i64),
                    open,
                    high: open.max(close) * (1.0 + wick_up),
                    low: open.min(close) * (1.0 - wick_down),
                    close,
                    volume: rng.gen_range(100_000.0..1_000_000.0_f64).round(),
                }
            })
            .collect()
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new(42)
    }
}

impl MarketDataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn history(
        &self,
        symbol: &str,
        period: Period,
        _interval: Interval,
    ) -> Result<OhlcvFrame, UpstreamError> {
        let n = usize::try_from(period.days()).unwrap_or(0);
        Ok(OhlcvFrame::canonicalize(self.generate(symbol, n)))
    }

    fn info(&self, symbol: &str) -> Result<SymbolInfo, UpstreamError> {
        Ok(SymbolInfo {
            symbol: symbol.to_string(),
            name: Some(format!("Synthetic {symbol}")),
            currency: Some("USD".into()),
            exchange: None,
        })
    }
}
