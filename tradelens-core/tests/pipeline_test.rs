//! End-to-end pipeline tests with in-memory collaborators.

mod common;

use common::{bars_from_closes, linear};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tradelens_core::analysis::Trend;
use tradelens_core::config::Config;
use tradelens_core::domain::{Interval, OhlcvFrame, Period};
use tradelens_core::providers::{
    CsvProvider, ExchangeTickerProvider, MarketDataProvider, NewsProvider, Quote, RawNewsItem,
    SyntheticProvider, TickerMap, Translator,
};
use tradelens_core::{exchange_report, AnalysisError, Analyzer, UpstreamError};

struct RisingMarket;

impl MarketDataProvider for RisingMarket {
    fn name(&self) -> &str {
        "rising"
    }

    fn history(
        &self,
        _symbol: &str,
        _period: Period,
        _interval: Interval,
    ) -> Result<OhlcvFrame, UpstreamError> {
        Ok(OhlcvFrame::canonicalize(bars_from_closes(
            &linear(100.0, 200.0, 250),
            0.02,
        )))
    }
}

struct DownMarket;

impl MarketDataProvider for DownMarket {
    fn name(&self) -> &str {
        "down"
    }

    fn history(
        &self,
        symbol: &str,
        _period: Period,
        _interval: Interval,
    ) -> Result<OhlcvFrame, UpstreamError> {
        Err(UpstreamError::SymbolNotFound {
            symbol: symbol.to_string(),
        })
    }
}

struct CountingNews {
    name: &'static str,
    titles: Vec<&'static str>,
    calls: Arc<AtomicUsize>,
}

impl CountingNews {
    fn new(name: &'static str, titles: Vec<&'static str>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                name,
                titles,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl NewsProvider for CountingNews {
    fn name(&self) -> &str {
        self.name
    }

    fn news(&self, _symbol: &str) -> Result<Vec<RawNewsItem>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .titles
            .iter()
            .enumerate()
            .map(|(i, title)| RawNewsItem {
                title: title.to_string(),
                summary: Some(format!("<p>{title}</p>")),
                link: format!("https://{}.example.com/{i}", self.name),
                source: self.name.to_string(),
            })
            .collect())
    }
}

struct BrokenNews;

impl NewsProvider for BrokenNews {
    fn name(&self) -> &str {
        "broken"
    }

    fn news(&self, _symbol: &str) -> Result<Vec<RawNewsItem>, UpstreamError> {
        Err(UpstreamError::Timeout(5.0))
    }
}

/// Prefixes text; fails for anything mentioning "losses".
struct TagTranslator;

impl Translator for TagTranslator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, UpstreamError> {
        if text.contains("losses") {
            return Err(UpstreamError::Translation("quota".into()));
        }
        Ok(format!("[{target_lang}] {text}"))
    }
}

struct FixedTicker(Option<TickerMap>);

impl ExchangeTickerProvider for FixedTicker {
    fn name(&self) -> &str {
        "fixed"
    }

    fn ticker(&self) -> Result<TickerMap, UpstreamError> {
        self.0
            .clone()
            .ok_or_else(|| UpstreamError::NetworkUnreachable("offline".into()))
    }
}

#[test]
fn full_report_with_bullish_news() {
    let (primary, _) = CountingNews::new(
        "primary",
        vec!["Shares surge to record", "Strong growth lifts outlook", "Analysts upgrade stock"],
    );
    let analyzer = Analyzer::new(Config::default(), Box::new(RisingMarket))
        .with_news_provider(Box::new(primary));

    let report = analyzer.analyze("AAPL", Period::OneYear, true).unwrap();

    let setup = report.setup.as_ref().unwrap();
    assert_eq!(setup.trend, Trend::Uptrend);
    assert_eq!(report.news.len(), 3);
    assert!(report.news.iter().all(|n| n.summary == n.title));
    assert!(report.pivots.is_some());
    assert!(report.dynamics.and_then(|d| d.ema200).is_some());
    assert!(report.insight.is_some());
    assert_eq!(report.heikin_ashi.as_ref().map(Vec::len), Some(250));

    let verdict = report.verdict.as_ref().unwrap();
    // uptrend +20, RSI 100 overbought −5, news bullish +15
    assert_eq!(verdict.score, 80);
    assert_eq!(verdict.narrative, "uptrend, RSI overbought, news bullish");
}

#[test]
fn market_failure_gives_empty_report() {
    let (news, calls) = CountingNews::new("primary", vec!["Shares surge"]);
    let analyzer =
        Analyzer::new(Config::default(), Box::new(DownMarket)).with_news_provider(Box::new(news));

    let report = analyzer.analyze("NOPE", Period::SixMonths, false).unwrap();
    assert!(report.frame.is_empty());
    assert!(matches!(
        report.setup,
        Err(AnalysisError::InsufficientData { got: 0, .. })
    ));
    assert!(report.levels.is_none());
    assert!(report.pivots.is_none());
    assert!(report.verdict.is_none());
    assert!(report.news.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn failing_primary_is_backfilled() {
    let (fallback, _) = CountingNews::new("fallback", vec!["Market slump deepens"]);
    let analyzer = Analyzer::new(Config::default(), Box::new(RisingMarket))
        .with_news_provider(Box::new(BrokenNews))
        .with_news_provider(Box::new(fallback));

    let report = analyzer.analyze("AAPL", Period::OneYear, false).unwrap();
    assert_eq!(report.news.len(), 1);
    assert_eq!(report.news[0].source, "fallback");
    assert!(report.verdict.is_some());
}

#[test]
fn news_is_memoized_between_requests() {
    let (news, calls) = CountingNews::new("primary", vec!["a", "b", "c"]);
    let analyzer =
        Analyzer::new(Config::default(), Box::new(RisingMarket)).with_news_provider(Box::new(news));

    analyzer.analyze("AAPL", Period::OneYear, false).unwrap();
    analyzer.analyze("AAPL", Period::SixMonths, false).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    analyzer.analyze("MSFT", Period::OneYear, false).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn translation_is_per_item_and_fail_soft() {
    let (news, _) = CountingNews::new("primary", vec!["Shares surge", "Heavy losses mount"]);
    let config = Config {
        translator_enabled: true,
        ..Config::default()
    };
    let analyzer = Analyzer::new(config, Box::new(RisingMarket))
        .with_news_provider(Box::new(news))
        .with_translator(Box::new(TagTranslator));

    let items = analyzer.news("AAPL");
    assert_eq!(items[0].title, "[th] Shares surge");
    assert_eq!(items[1].title, "Heavy losses mount");
}

#[test]
fn translator_ignored_when_disabled() {
    let (news, _) = CountingNews::new("primary", vec!["Shares surge"]);
    let analyzer = Analyzer::new(Config::default(), Box::new(RisingMarket))
        .with_news_provider(Box::new(news))
        .with_translator(Box::new(TagTranslator));
    assert_eq!(analyzer.news("AAPL")[0].title, "Shares surge");
}

#[test]
fn csv_history_runs_through_the_pipeline() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
    for bar in bars_from_closes(&linear(50.0, 40.0, 220), 0.01) {
        writeln!(
            file,
            "{},{},{},{},{},{}",
            bar.timestamp.format("%Y-%m-%d"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        )
        .unwrap();
    }

    let analyzer = Analyzer::new(Config::default(), Box::new(CsvProvider::new(file.path())));
    let report = analyzer.analyze("LOCAL", Period::OneYear, false).unwrap();
    assert_eq!(report.frame.len(), 220);
    let setup = report.setup.as_ref().unwrap();
    assert_eq!(setup.trend, Trend::Downtrend);
    assert!(setup.tp < setup.entry && setup.entry < setup.sl);
    let verdict = report.verdict.unwrap();
    // downtrend −20, RSI 0 oversold +5, no news
    assert_eq!(verdict.score, 35);
}

#[test]
fn synthetic_provider_report_serializes() {
    let analyzer = Analyzer::new(Config::default(), Box::new(SyntheticProvider::new(3)));
    let report = analyzer.analyze("DEMO", Period::OneYear, true).unwrap();
    assert!(report.setup.is_ok());
    assert_eq!(report.info.as_ref().map(|i| i.symbol.as_str()), Some("DEMO"));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["symbol"], "DEMO");
    assert_eq!(json["period"], "1y");
    assert!(json["frame"].as_array().is_some_and(|a| a.len() == 365));
    assert!(json["verdict"]["score"].is_u64());
}

#[test]
fn exchange_report_is_fail_soft() {
    assert!(exchange_report(&FixedTicker(None), &[]).is_empty());

    let mut map = TickerMap::new();
    map.insert(
        "THB_BTC".into(),
        Quote {
            last: 95.0,
            high_24h: 100.0,
            low_24h: 80.0,
        },
    );
    let rows = exchange_report(&FixedTicker(Some(map)), &[]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].symbol, "BTC");
    assert_eq!(rows[0].pivots.levels.len(), 5);
}
