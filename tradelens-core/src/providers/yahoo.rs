//! Yahoo Finance market data provider.
//!
//! Fetches daily OHLCV bars and symbol metadata from Yahoo's v8 chart API.
//! Yahoo has no official API and is subject to unannounced format changes;
//! the CSV provider is the offline fallback.

use super::http::HttpClient;
use super::{MarketDataProvider, SymbolInfo};
use crate::domain::{Bar, Interval, OhlcvFrame, Period};
use crate::error::UpstreamError;
use chrono::DateTime;
use serde::Deserialize;
use tracing::debug;

const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: Option<String>,
    long_name: Option<String>,
    short_name: Option<String>,
    currency: Option<String>,
    exchange_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

pub struct YahooProvider {
    http: HttpClient,
}

impl YahooProvider {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn chart(
        &self,
        symbol: &str,
        range: &str,
        interval: Interval,
    ) -> Result<ChartData, UpstreamError> {
        let url = format!("{CHART_URL}/{symbol}");
        let query = [
            ("range", range.to_string()),
            ("interval", interval.as_str().to_string()),
        ];
        let resp: ChartResponse = self.http.get_json(&url, &query)?;
        first_result(symbol, resp)
    }
}

fn first_result(symbol: &str, resp: ChartResponse) -> Result<ChartData, UpstreamError> {
    let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
        Some(err) if err.code == "Not Found" => UpstreamError::SymbolNotFound {
            symbol: symbol.to_string(),
        },
        Some(err) => UpstreamError::ResponseFormatChanged(format!("{}: {}", err.code, err.description)),
        None => UpstreamError::ResponseFormatChanged("empty result with no error".into()),
    })?;

    result
        .into_iter()
        .next()
        .ok_or_else(|| UpstreamError::ResponseFormatChanged("result array is empty".into()))
}

/// Convert chart rows into bars. Rows with every field missing (holidays)
/// are skipped; partially missing rows become NaN and are dropped by
/// canonicalization.
fn parse_bars(data: ChartData) -> Result<Vec<Bar>, UpstreamError> {
    let Some(timestamps) = data.timestamp else {
        return Ok(Vec::new());
    };
    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| UpstreamError::ResponseFormatChanged("no quote data".into()))?;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let timestamp = DateTime::from_timestamp(ts, 0).ok_or_else(|| {
            UpstreamError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
        })?;

        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
            continue;
        }

        bars.push(Bar {
            timestamp,
            open: open.unwrap_or(f64::NAN),
            high: high.unwrap_or(f64::NAN),
            low: low.unwrap_or(f64::NAN),
            close: close.unwrap_or(f64::NAN),
            volume: volume.unwrap_or(0.0),
        });
    }
    Ok(bars)
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<OhlcvFrame, UpstreamError> {
        let data = self.chart(symbol, period.as_str(), interval)?;
        let bars = parse_bars(data)?;
        if bars.is_empty() {
            return Err(UpstreamError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let frame = OhlcvFrame::canonicalize(bars);
        debug!(symbol, %period, bars = frame.len(), "yahoo history fetched");
        Ok(frame)
    }

    fn info(&self, symbol: &str) -> Result<SymbolInfo, UpstreamError> {
        let data = self.chart(symbol, "5d", Interval::Daily)?;
        let meta = data
            .meta
            .ok_or_else(|| UpstreamError::ResponseFormatChanged("no meta block".into()))?;
        Ok(SymbolInfo {
            symbol: meta.symbol.unwrap_or_else(|| symbol.to_string()),
            name: meta.long_name.or(meta.short_name),
            currency: meta.currency,
            exchange: meta.exchange_name,
        })
    }
}
