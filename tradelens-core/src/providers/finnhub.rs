//! Finnhub company-news provider (primary news source).

use super::http::HttpClient;
use super::{NewsProvider, RawNewsItem};
use crate::error::UpstreamError;
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;

const COMPANY_NEWS_URL: &str = "https://finnhub.io/api/v1/company-news";
/// Days of history requested, ending today.
pub const WINDOW_DAYS: i64 = 2;
pub const MAX_ITEMS: usize = 5;
const SOURCE: &str = "Finnhub";

#[derive(Debug, Deserialize)]
struct CompanyNews {
    #[serde(default)]
    headline: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    url: String,
}

pub struct FinnhubNews {
    http: HttpClient,
    api_key: String,
}

impl FinnhubNews {
    pub fn new(http: HttpClient, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
        }
    }
}

/// `(from, to)` dates of the request window.
fn window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(WINDOW_DAYS), today)
}

fn to_raw(items: Vec<CompanyNews>) -> Vec<RawNewsItem> {
    items
        .into_iter()
        .filter(|n| !n.headline.trim().is_empty())
        .take(MAX_ITEMS)
        .map(|n| RawNewsItem {
            title: n.headline,
            summary: (!n.summary.is_empty()).then_some(n.summary),
            link: n.url,
            source: SOURCE.to_string(),
        })
        .collect()
}

impl NewsProvider for FinnhubNews {
    fn name(&self) -> &str {
        "finnhub"
    }

    fn news(&self, symbol: &str) -> Result<Vec<RawNewsItem>, UpstreamError> {
        let (from, to) = window(Utc::now().date_naive());
        let query = [
            ("symbol", symbol.to_string()),
            ("from", from.format("%Y-%m-%d").to_string()),
            ("to", to.format("%Y-%m-%d").to_string()),
            ("token", self.api_key.clone()),
        ];
        let items: Vec<CompanyNews> = self.http.get_json(COMPANY_NEWS_URL, &query)?;
        Ok(to_raw(items))
    }
}
