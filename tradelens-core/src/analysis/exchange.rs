//! Local-exchange panel: one intraday pivot ladder per quoted pair.

use super::intraday::{intraday_pivots, IntradayPivotSet};
use crate::providers::TickerMap;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRow {
    pub pair: String,
    /// Base asset, e.g. `BTC` for `THB_BTC`.
    pub symbol: String,
    pub last: f64,
    pub high: f64,
    pub low: f64,
    pub pivots: IntradayPivotSet,
}

/// Base asset of a `QUOTE_BASE` pair name.
pub fn pair_symbol(pair: &str) -> &str {
    pair.split_once('_').map_or(pair, |(_, base)| base)
}

/// Rows for the requested pairs (all pairs when `pairs` is empty), sorted by
/// pair name. Quotes with non-finite fields or an inverted 24h range are skipped.
pub fn exchange_panel(ticker: &TickerMap, pairs: &[String]) -> Vec<ExchangeRow> {
    ticker
        .iter()
        .filter(|(pair, _)| pairs.is_empty() || pairs.iter().any(|p| p == *pair))
        .filter_map(|(pair, quote)| {
            let valid = quote.last.is_finite()
                && quote.high_24h.is_finite()
                && quote.low_24h.is_finite()
                && quote.high_24h >= quote.low_24h;
            if !valid {
                debug!(pair = %pair, "skipping malformed quote");
                return None;
            }
            Some(ExchangeRow {
                pair: pair.clone(),
                symbol: pair_symbol(pair).to_string(),
                last: quote.last,
                high: quote.high_24h,
                low: quote.low_24h,
                pivots: intraday_pivots(quote.high_24h, quote.low_24h, quote.last),
            })
        })
        .collect()
}
