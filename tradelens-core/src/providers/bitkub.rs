//! Bitkub exchange ticker.

use super::http::HttpClient;
use super::{ExchangeTickerProvider, Quote, TickerMap};
use crate::error::UpstreamError;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

const TICKER_URL: &str = "https://api.bitkub.com/api/market/ticker";

pub struct BitkubTicker {
    http: HttpClient,
}

impl BitkubTicker {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

/// Keep every pair whose entry decodes as a [`Quote`]; others are skipped.
fn decode(raw: BTreeMap<String, Value>) -> TickerMap {
    raw.into_iter()
        .filter_map(|(pair, value)| match serde_json::from_value::<Quote>(value) {
            Ok(quote) => Some((pair, quote)),
            Err(e) => {
                debug!(pair = %pair, error = %e, "skipping undecodable ticker entry");
                None
            }
        })
        .collect()
}

impl ExchangeTickerProvider for BitkubTicker {
    fn name(&self) -> &str {
        "bitkub"
    }

    fn ticker(&self) -> Result<TickerMap, UpstreamError> {
        let raw: BTreeMap<String, Value> = self.http.get_json(TICKER_URL, &[])?;
        Ok(decode(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_and_skips_incomplete_entries() {
        let raw: BTreeMap<String, Value> = serde_json::from_str(
            r#"{
                "THB_BTC": {"id": 1, "last": 2100000.5, "lowestAsk": 2100100, "high24hr": 2150000, "low24hr": 2050000, "percentChange": 1.2},
                "THB_ETH": {"id": 2, "last": 110000},
                "THB_KUB": {"last": 45.1, "high24hr": 46, "low24hr": 44.2}
            }"#,
        )
        .unwrap();
        let map = decode(raw);
        assert_eq!(map.len(), 2);
        assert_eq!(map["THB_BTC"].high_24h, 2_150_000.0);
        assert_eq!(map["THB_KUB"].low_24h, 44.2);
        assert!(!map.contains_key("THB_ETH"));
    }
}
