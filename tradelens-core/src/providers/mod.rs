//! Collaborator contracts and their adapters.
//!
//! The analytics never perform I/O. Everything they consume from the outside
//! world arrives through these traits, so adapters can be swapped (Yahoo vs
//! CSV vs synthetic) and mocked in tests. Adapters report failures as
//! [`UpstreamError`]; the request pipeline decides how to degrade.

pub mod bitkub;
pub mod cache;
pub mod csv_file;
pub mod finnhub;
pub mod google_news;
pub mod http;
pub mod synthetic;
pub mod translate;
pub mod yahoo;

pub use bitkub::BitkubTicker;
pub use cache::{CachedMarketData, CachedTicker, TtlCache};
pub use csv_file::CsvProvider;
pub use finnhub::FinnhubNews;
pub use google_news::GoogleNewsRss;
pub use synthetic::SyntheticProvider;
pub use translate::GoogleTranslator;
pub use yahoo::YahooProvider;

use crate::domain::{Interval, OhlcvFrame, Period};
use crate::error::UpstreamError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Descriptive metadata for a symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
}

/// Source of OHLCV history.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Canonicalized bar history for `symbol` over `period`.
    fn history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<OhlcvFrame, UpstreamError>;

    /// Symbol metadata. Providers without metadata return just the symbol.
    fn info(&self, symbol: &str) -> Result<SymbolInfo, UpstreamError> {
        Ok(SymbolInfo {
            symbol: symbol.to_string(),
            ..SymbolInfo::default()
        })
    }
}

/// A headline as delivered by a news provider, before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNewsItem {
    pub title: String,
    pub summary: Option<String>,
    pub link: String,
    pub source: String,
}

/// Source of recent headlines for a symbol.
pub trait NewsProvider: Send + Sync {
    fn name(&self) -> &str;

    fn news(&self, symbol: &str) -> Result<Vec<RawNewsItem>, UpstreamError>;
}

/// Text translation. Each call is independent; one failure says nothing
/// about the next.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, UpstreamError>;
}

/// 24h quote for one exchange pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub last: f64,
    #[serde(rename = "high24hr")]
    pub high_24h: f64,
    #[serde(rename = "low24hr")]
    pub low_24h: f64,
}

/// Pair name (e.g. `THB_BTC`) to quote.
pub type TickerMap = BTreeMap<String, Quote>;

/// Spot quotes from a local exchange.
pub trait ExchangeTickerProvider: Send + Sync {
    fn name(&self) -> &str;

    fn ticker(&self) -> Result<TickerMap, UpstreamError>;
}
