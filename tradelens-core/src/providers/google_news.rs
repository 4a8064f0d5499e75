//! Google News RSS search (fallback news source).
//!
//! The feed is small and flat, so items are pulled out with plain tag
//! scanning rather than a full XML parser. Descriptions keep their HTML;
//! normalization strips it later.

use super::http::HttpClient;
use super::{NewsProvider, RawNewsItem};
use crate::domain::clean_symbol;
use crate::error::UpstreamError;
use tracing::debug;

const SEARCH_URL: &str = "https://news.google.com/rss/search";
pub const MAX_ITEMS: usize = 5;
const NARROWING: &str = " site:bloomberg.com";
const DEFAULT_SOURCE: &str = "Google News";

pub struct GoogleNewsRss {
    http: HttpClient,
}

impl GoogleNewsRss {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn search(&self, query: &str) -> Result<Vec<RawNewsItem>, UpstreamError> {
        let params = [
            ("q", query.to_string()),
            ("hl", "en-US".to_string()),
            ("gl", "US".to_string()),
            ("ceid", "US:en".to_string()),
        ];
        let body = self.http.get_text(SEARCH_URL, &params)?;
        parse_feed(&body)
    }
}

/// Base query for a symbol: suffixes stripped, `finance news` appended.
pub fn search_query(symbol: &str) -> String {
    format!("{} finance news", clean_symbol(symbol))
}

/// Undo XML escaping and unwrap CDATA sections.
fn unescape(text: &str) -> String {
    let text = text.trim();
    let text = text
        .strip_prefix("<![CDATA[")
        .and_then(|t| t.strip_suffix("]]>"))
        .unwrap_or(text);
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Inner text of the first `<tag>` or `<tag attr=...>` element in `xml`.
fn element<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut from = 0;
    while let Some(pos) = xml[from..].find(&open) {
        let start = from + pos;
        let after = &xml[start + open.len()..];
        // guard against prefix matches such as <linkage> for <link>
        match after.chars().next() {
            Some('>') | Some(' ') | Some('\t') | Some('\n') | Some('\r') => {
                let body_start = start + open.len() + after.find('>')? + 1;
                let body_len = xml[body_start..].find(&close)?;
                return Some(&xml[body_start..body_start + body_len]);
            }
            _ => from = start + open.len(),
        }
    }
    None
}

/// Split an RSS document into items.
pub fn parse_feed(xml: &str) -> Result<Vec<RawNewsItem>, UpstreamError> {
    if !xml.contains("<rss") && !xml.contains("<channel") {
        return Err(UpstreamError::ResponseFormatChanged(
            "response is not an RSS feed".into(),
        ));
    }
    let mut items = Vec::new();
    let mut rest = xml;
    while let Some(start) = rest.find("<item>") {
        let body = &rest[start + "<item>".len()..];
        let Some(end) = body.find("</item>") else {
            break;
        };
        let item = &body[..end];
        rest = &body[end + "</item>".len()..];

        let Some(title) = element(item, "title").map(unescape) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }
        items.push(RawNewsItem {
            title,
            summary: element(item, "description")
                .map(unescape)
                .filter(|s| !s.is_empty()),
            link: element(item, "link").map(unescape).unwrap_or_default(),
            source: element(item, "source")
                .map(unescape)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        });
    }
    Ok(items)
}

impl NewsProvider for GoogleNewsRss {
    fn name(&self) -> &str {
        "google_news_rss"
    }

    fn news(&self, symbol: &str) -> Result<Vec<RawNewsItem>, UpstreamError> {
        let base = search_query(symbol);
        let mut items = self.search(&format!("{base}{NARROWING}"))?;
        if items.is_empty() {
            debug!(symbol, "narrowed news search empty; retrying unfiltered");
            items = self.search(&base)?;
        }
        items.truncate(MAX_ITEMS);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>"AAPL finance news" - Google News</title>
<item><title>Apple shares rally &amp; tech gains - Bloomberg</title><link>https://example.com/a</link>
<description>&lt;a href="https://example.com/a"&gt;Apple shares rally&lt;/a&gt;</description>
<source url="https://www.bloomberg.com">Bloomberg</source></item>
<item><title><![CDATA[Market slump deepens]]></title><link>https://example.com/b</link></item>
<item><title></title><link>https://example.com/c</link></item>
</channel></rss>"#;

    #[test]
    fn query_uses_cleaned_symbol() {
        assert_eq!(search_query("BTC-USD"), "BTC finance news");
        assert_eq!(search_query("GC=F"), "GC finance news");
    }

    #[test]
    fn parses_items() {
        let items = parse_feed(FEED).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Apple shares rally & tech gains - Bloomberg");
        assert_eq!(items[0].link, "https://example.com/a");
        assert_eq!(items[0].source, "Bloomberg");
        assert_eq!(
            items[0].summary.as_deref(),
            Some("<a href=\"https://example.com/a\">Apple shares rally</a>")
        );
        assert_eq!(items[1].title, "Market slump deepens");
        assert_eq!(items[1].source, "Google News");
        assert_eq!(items[1].summary, None);
    }

    #[test]
    fn element_skips_prefix_matches() {
        let xml = "<linkage>x</linkage><link>y</link>";
        assert_eq!(element(xml, "link"), Some("y"));
    }

    #[test]
    fn html_error_page_is_format_change() {
        assert!(matches!(
            parse_feed("<html><body>captcha</body></html>"),
            Err(UpstreamError::ResponseFormatChanged(_))
        ));
    }

    #[test]
    fn empty_channel_yields_nothing() {
        let items = parse_feed("<rss><channel></channel></rss>").unwrap();
        assert!(items.is_empty());
    }
}
