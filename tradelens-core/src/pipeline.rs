//! Per-request pipeline: fetch, analyze, fuse.
//!
//! ```text
//! MarketDataProvider ─► frame ─┬─► setup ─────────────┐
//!                              ├─► swing levels       │
//!                              ├─► pivots + dynamics  ├─► verdict
//!                              └─► heikin-ashi        │
//! NewsProvider(s) ─► scored headlines ────────────────┘
//! ```
//!
//! Collaborator failures never abort a request: a failed history fetch gives
//! an empty report, a failed news fetch gives no headlines. The only error a
//! caller sees inside the report is the setup's `InsufficientData`, which
//! also suppresses the verdict.

use crate::analysis::{
    aggregate_news, classify_setup, dynamic_insight, exchange_panel, find_swing_levels,
    fuse_verdict, heikin_ashi, split_levels, Dynamics, ExchangeRow, Insight, LexiconScorer,
    NewsItem, Pivots, SentimentScorer, Setup, SupportResistance, Translation, Verdict,
    SETUP_MIN_BARS,
};
use crate::config::Config;
use crate::domain::{Bar, Interval, OhlcvFrame, Period};
use crate::error::AnalysisError;
use crate::providers::http::HttpClient;
use crate::providers::{
    CachedMarketData, ExchangeTickerProvider, FinnhubNews, GoogleNewsRss, GoogleTranslator,
    MarketDataProvider, NewsProvider, SymbolInfo, Translator, TtlCache, YahooProvider,
};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

/// Everything the renderer needs for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct MarketReport {
    pub symbol: String,
    pub period: Period,
    pub info: Option<SymbolInfo>,
    pub frame: OhlcvFrame,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heikin_ashi: Option<Vec<Bar>>,
    #[serde(serialize_with = "serialize_setup")]
    pub setup: Result<Setup, AnalysisError>,
    pub levels: Option<SupportResistance>,
    pub pivots: Option<Pivots>,
    pub dynamics: Option<Dynamics>,
    pub insight: Option<Insight>,
    pub news: Vec<NewsItem>,
    pub verdict: Option<Verdict>,
}

fn serialize_setup<S: Serializer>(
    setup: &Result<Setup, AnalysisError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match setup {
        Ok(setup) => setup.serialize(serializer),
        Err(e) => {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry("error", &e.to_string())?;
            map.end()
        }
    }
}

impl MarketReport {
    /// Report for a symbol with no usable history.
    fn empty(symbol: &str, period: Period, info: Option<SymbolInfo>) -> Self {
        Self {
            symbol: symbol.to_string(),
            period,
            info,
            frame: OhlcvFrame::empty(),
            heikin_ashi: None,
            setup: Err(AnalysisError::insufficient("setup", SETUP_MIN_BARS, 0)),
            levels: None,
            pivots: None,
            dynamics: None,
            insight: None,
            news: Vec::new(),
            verdict: None,
        }
    }
}

/// Frame-only analytics, computed together.
struct Technicals {
    setup: Result<Setup, AnalysisError>,
    levels: Option<SupportResistance>,
    pivots: Option<Pivots>,
    dynamics: Option<Dynamics>,
    insight: Option<Insight>,
    heikin_ashi: Option<Vec<Bar>>,
}

fn soft<T>(what: &str, result: Result<T, AnalysisError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            debug!(what, error = %e, "analytic unavailable");
            None
        }
    }
}

fn technicals(frame: &OhlcvFrame, with_heikin_ashi: bool) -> Technicals {
    let (setup, (levels, ((pivots, dynamics), ha))) = rayon::join(
        || classify_setup(frame),
        || {
            rayon::join(
                || find_swing_levels(frame),
                || {
                    rayon::join(
                        || (Pivots::from_frame(frame), Dynamics::from_frame(frame)),
                        || with_heikin_ashi.then(|| heikin_ashi(frame)),
                    )
                },
            )
        },
    );

    let close = frame.last_close().unwrap_or(f64::NAN);
    let levels = soft("swing levels", levels).map(|set| split_levels(&set, close));
    let pivots = soft("pivots", pivots);
    let dynamics = soft("dynamics", dynamics);
    let insight = match (&pivots, &dynamics) {
        (Some(p), Some(d)) => soft("dynamic insight", dynamic_insight(d.current, p, d)),
        _ => None,
    };

    Technicals {
        setup,
        levels,
        pivots,
        dynamics,
        insight,
        heikin_ashi: ha,
    }
}

type NewsKey = (String, Option<String>);

/// Collaborators plus configuration; one per process, shared across requests.
pub struct Analyzer {
    config: Config,
    market: Box<dyn MarketDataProvider>,
    news: Vec<Box<dyn NewsProvider>>,
    translator: Option<Box<dyn Translator>>,
    scorer: Box<dyn SentimentScorer>,
    news_cache: TtlCache<NewsKey, Vec<NewsItem>>,
}

impl Analyzer {
    /// Analyzer over `market` with no news providers and no translator.
    pub fn new(config: Config, market: Box<dyn MarketDataProvider>) -> Self {
        let news_cache = TtlCache::new(config.cache_ttls.news());
        Self {
            config,
            market,
            news: Vec::new(),
            translator: None,
            scorer: Box::new(LexiconScorer::new()),
            news_cache,
        }
    }

    /// Live wiring: cached Yahoo history plus the live news collaborators.
    pub fn live(config: Config, http: HttpClient) -> Self {
        let market = CachedMarketData::new(
            YahooProvider::new(http.clone()),
            config.cache_ttls.market_data(),
            config.cache_ttls.stock_info(),
        );
        Self::new(config, Box::new(market)).with_live_news(http)
    }

    /// Finnhub (when a key is configured) backfilled by Google News, and
    /// Google Translate when translation is enabled.
    pub fn with_live_news(mut self, http: HttpClient) -> Self {
        if let Some(key) = self.config.finnhub_api_key.clone() {
            self = self.with_news_provider(Box::new(FinnhubNews::new(http.clone(), key)));
        } else {
            info!("no Finnhub key configured; using the fallback news feed only");
        }
        self = self.with_news_provider(Box::new(GoogleNewsRss::new(http.clone())));
        if self.config.translator_enabled {
            self = self.with_translator(Box::new(GoogleTranslator::new(http)));
        }
        self
    }

    /// Append a news provider. Providers are consulted in insertion order.
    pub fn with_news_provider(mut self, provider: Box<dyn NewsProvider>) -> Self {
        self.news.push(provider);
        self
    }

    pub fn with_translator(mut self, translator: Box<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn with_scorer(mut self, scorer: Box<dyn SentimentScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The translation step, when enabled and a translator is wired.
    fn translation(&self) -> Option<Translation<'_>> {
        if !self.config.translator_enabled {
            return None;
        }
        self.translator.as_deref().map(|translator| Translation {
            translator,
            target_lang: &self.config.translator_target_lang,
        })
    }

    /// Scored headlines for `symbol`, memoized per symbol and target language.
    pub fn news(&self, symbol: &str) -> Vec<NewsItem> {
        let translation = self.translation();
        let key = (
            symbol.to_string(),
            translation.as_ref().map(|t| t.target_lang.to_string()),
        );
        if let Some(hit) = self.news_cache.get(&key) {
            debug!(symbol, "news cache hit");
            return hit;
        }
        let items = aggregate_news(
            &self.news,
            symbol,
            self.scorer.as_ref(),
            translation.as_ref(),
            self.config.news_limit,
        );
        self.news_cache.insert(key, items.clone());
        items
    }

    /// Symbol metadata, or `None` when the provider cannot supply it.
    pub fn info(&self, symbol: &str) -> Option<SymbolInfo> {
        match self.market.info(symbol) {
            Ok(info) => Some(info),
            Err(e) => {
                warn!(symbol, provider = self.market.name(), error = %e, "symbol info unavailable");
                None
            }
        }
    }

    /// Run the full pipeline for one symbol.
    ///
    /// Fails only on a malformed request (blank symbol).
    pub fn analyze(
        &self,
        symbol: &str,
        period: Period,
        with_heikin_ashi: bool,
    ) -> Result<MarketReport, AnalysisError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(AnalysisError::Domain("symbol must not be empty".into()));
        }

        let frame = match self.market.history(symbol, period, Interval::Daily) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(symbol, provider = self.market.name(), error = %e, "market data unavailable");
                OhlcvFrame::empty()
            }
        };
        let info = self.info(symbol);
        if frame.is_empty() {
            return Ok(MarketReport::empty(symbol, period, info));
        }

        let (tech, news) = rayon::join(
            || technicals(&frame, with_heikin_ashi),
            || self.news(symbol),
        );

        let verdict = match &tech.setup {
            Ok(setup) => Some(fuse_verdict(setup, &news)),
            Err(e) => {
                info!(symbol, error = %e, "no setup; verdict skipped");
                None
            }
        };

        debug!(symbol, %period, bars = frame.len(), news = news.len(), "analysis complete");
        Ok(MarketReport {
            symbol: symbol.to_string(),
            period,
            info,
            frame,
            heikin_ashi: tech.heikin_ashi,
            setup: tech.setup,
            levels: tech.levels,
            pivots: tech.pivots,
            dynamics: tech.dynamics,
            insight: tech.insight,
            news,
            verdict,
        })
    }
}

/// Exchange panel rows, or none when the ticker is unavailable.
pub fn exchange_report(ticker: &dyn ExchangeTickerProvider, pairs: &[String]) -> Vec<ExchangeRow> {
    match ticker.ticker() {
        Ok(map) => exchange_panel(&map, pairs),
        Err(e) => {
            warn!(provider = ticker.name(), error = %e, "exchange ticker unavailable");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpstreamError;
    use crate::indicators::make_bars;

    struct FixedMarket(Vec<f64>);

    impl MarketDataProvider for FixedMarket {
        fn name(&self) -> &str {
            "fixed"
        }

        fn history(
            &self,
            _symbol: &str,
            _period: Period,
            _interval: Interval,
        ) -> Result<OhlcvFrame, UpstreamError> {
            Ok(OhlcvFrame::canonicalize(make_bars(&self.0)))
        }
    }

    #[test]
    fn blank_symbol_is_rejected() {
        let analyzer = Analyzer::new(Config::default(), Box::new(FixedMarket(vec![1.0])));
        assert!(matches!(
            analyzer.analyze("  ", Period::SixMonths, false),
            Err(AnalysisError::Domain(_))
        ));
    }

    #[test]
    fn short_history_carries_setup_error() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let analyzer = Analyzer::new(Config::default(), Box::new(FixedMarket(closes)));
        let report = analyzer.analyze("AAPL", Period::OneMonth, true).unwrap();
        assert!(matches!(
            report.setup,
            Err(AnalysisError::InsufficientData { needed: 200, got: 30, .. })
        ));
        assert!(report.verdict.is_none());
        assert!(report.pivots.is_some());
        assert_eq!(report.heikin_ashi.as_ref().map(Vec::len), Some(30));
        // EMA200 undefined → no insight
        assert!(report.insight.is_none());
    }

    #[test]
    fn setup_error_serializes_as_message() {
        let analyzer = Analyzer::new(Config::default(), Box::new(FixedMarket(vec![1.0, 2.0])));
        let report = analyzer.analyze("AAPL", Period::OneMonth, false).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json["setup"]["error"],
            "insufficient data for setup: need 200 bars, got 2"
        );
        assert!(json.get("heikin_ashi").is_none());
    }
}
