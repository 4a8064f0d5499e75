//! News gathering, normalization and sentiment bucketing.
//!
//! Providers are consulted in order. The first is primary; later providers
//! only backfill when fewer than [`BACKFILL_THRESHOLD`] items were gathered.
//! Provider failures contribute nothing (logged), translation failures keep
//! the original text (logged), and the result is capped at the configured
//! limit.

use super::sentiment::SentimentScorer;
use crate::providers::{NewsProvider, RawNewsItem, Translator};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Fewer items than this from the providers so far triggers the next one.
pub const BACKFILL_THRESHOLD: usize = 3;
/// Default cap on the normalized list.
pub const DEFAULT_NEWS_LIMIT: usize = 10;
/// Polarity beyond ±this is bullish/bearish; the boundary itself is neutral.
pub const NEUTRAL_BAND: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Pos,
    Neg,
    Neu,
}

impl Bucket {
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > NEUTRAL_BAND {
            Bucket::Pos
        } else if polarity < -NEUTRAL_BAND {
            Bucket::Neg
        } else {
            Bucket::Neu
        }
    }
}

/// A scored headline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub source: String,
    pub polarity: f64,
    pub bucket: Bucket,
}

/// Remove every closed `<...>` run, decode the common entities and collapse
/// whitespace. A `<` with no later `>` is kept as text.
pub fn strip_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    let decoded = out
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pull raw items from providers in order, backfilling from later providers
/// only while fewer than [`BACKFILL_THRESHOLD`] items have been gathered.
pub fn gather(providers: &[Box<dyn NewsProvider>], symbol: &str) -> Vec<RawNewsItem> {
    let mut items = Vec::new();
    for (i, provider) in providers.iter().enumerate() {
        if i > 0 && items.len() >= BACKFILL_THRESHOLD {
            break;
        }
        match provider.news(symbol) {
            Ok(fetched) => {
                debug!(provider = provider.name(), count = fetched.len(), "news fetched");
                items.extend(fetched);
            }
            Err(e) => warn!(provider = provider.name(), error = %e, "news provider failed"),
        }
    }
    items
}

/// Drop later duplicates of the same `(source, link)`.
pub fn dedupe(items: Vec<RawNewsItem>) -> Vec<RawNewsItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert((item.source.clone(), item.link.clone())))
        .collect()
}

/// Optional translation step for normalized items.
pub struct Translation<'a> {
    pub translator: &'a dyn Translator,
    pub target_lang: &'a str,
}

impl Translation<'_> {
    fn apply(&self, text: &str) -> String {
        match self.translator.translate(text, self.target_lang) {
            Ok(translated) => translated,
            Err(e) => {
                warn!(error = %e, "translation failed; keeping original text");
                text.to_string()
            }
        }
    }
}

/// Score and (optionally) translate one raw item.
///
/// Polarity comes from the original title; summaries are not scored.
pub fn normalize(
    raw: RawNewsItem,
    scorer: &dyn SentimentScorer,
    translation: Option<&Translation<'_>>,
) -> NewsItem {
    let polarity = scorer.polarity(&raw.title).clamp(-1.0, 1.0);
    let summary = raw.summary.as_deref().map(strip_html).unwrap_or_default();
    let (title, summary) = match translation {
        Some(t) => {
            let title = t.apply(&raw.title);
            let summary = if summary.is_empty() {
                summary
            } else {
                t.apply(&summary)
            };
            (title, summary)
        }
        None => (raw.title, summary),
    };
    NewsItem {
        title,
        summary,
        link: raw.link,
        source: raw.source,
        polarity,
        bucket: Bucket::from_polarity(polarity),
    }
}

/// Full aggregation: gather, dedupe, cap, normalize.
///
/// `limit` never raises the cap above [`DEFAULT_NEWS_LIMIT`].
pub fn aggregate_news(
    providers: &[Box<dyn NewsProvider>],
    symbol: &str,
    scorer: &dyn SentimentScorer,
    translation: Option<&Translation<'_>>,
    limit: usize,
) -> Vec<NewsItem> {
    dedupe(gather(providers, symbol))
        .into_iter()
        .take(limit.min(DEFAULT_NEWS_LIMIT))
        .map(|raw| normalize(raw, scorer, translation))
        .collect()
}

/// Sum of polarities; the verdict treats an empty list as zero.
pub fn net_polarity(items: &[NewsItem]) -> f64 {
    items.iter().map(|i| i.polarity).sum()
}
