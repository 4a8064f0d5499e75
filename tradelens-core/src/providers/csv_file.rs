//! CSV market data provider for offline analysis.
//!
//! Expects a header row `timestamp,open,high,low,close,volume`. Timestamps
//! are RFC 3339 or plain `YYYY-MM-DD` dates (midnight UTC). The requested
//! period is applied relative to the last bar in the file.

use super::MarketDataProvider;
use crate::domain::{Bar, Interval, OhlcvFrame, Period};
use crate::error::UpstreamError;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: f64,
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, UpstreamError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| UpstreamError::Io(format!("unparseable timestamp '{raw}'")))
}

/// Read every row of a bar CSV from any reader.
pub fn read_bars<R: std::io::Read>(reader: R) -> Result<Vec<Bar>, UpstreamError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars = Vec::new();
    for row in rdr.deserialize::<CsvRow>() {
        let row = row?;
        bars.push(Bar {
            timestamp: parse_timestamp(&row.timestamp)?,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }
    Ok(bars)
}

pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MarketDataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn history(
        &self,
        symbol: &str,
        period: Period,
        _interval: Interval,
    ) -> Result<OhlcvFrame, UpstreamError> {
        let file = std::fs::File::open(&self.path)?;
        let frame = OhlcvFrame::canonicalize(read_bars(file)?);
        let Some(last) = frame.last().map(|b| b.timestamp) else {
            return Ok(frame);
        };
        let cutoff = last - Duration::days(period.days());
        let bars: Vec<Bar> = frame
            .into_bars()
            .into_iter()
            .filter(|b| b.timestamp > cutoff)
            .collect();
        debug!(symbol, path = %self.path.display(), bars = bars.len(), "csv history loaded");
        Ok(OhlcvFrame::canonicalize(bars))
    }
}
