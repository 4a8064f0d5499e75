//! Verdict fusion: technical setup + net news sentiment → 0..100 score.
//!
//! | Condition            | Δscore |
//! |----------------------|--------|
//! | Uptrend / Downtrend  | ±20    |
//! | RSI > 70 / RSI < 30  | −5/+5  |
//! | net news > +0.5 / < −0.5 | ±15 |

use super::news::{net_polarity, NewsItem};
use super::setup::{Setup, Trend};
use serde::Serialize;
use std::fmt;

pub const BASE_SCORE: i32 = 50;
pub const TREND_WEIGHT: i32 = 20;
pub const RSI_WEIGHT: i32 = 5;
pub const NEWS_WEIGHT: i32 = 15;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;
pub const NEWS_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerdictLabel {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
}

impl VerdictLabel {
    /// HOLD is whatever the other bands leave over (26..=54).
    pub fn from_score(score: u8) -> Self {
        if score >= 75 {
            VerdictLabel::StrongBuy
        } else if score >= 55 {
            VerdictLabel::Buy
        } else if score <= 15 {
            VerdictLabel::StrongSell
        } else if score <= 25 {
            VerdictLabel::Sell
        } else {
            VerdictLabel::Hold
        }
    }
}

impl fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerdictLabel::StrongBuy => "STRONG BUY",
            VerdictLabel::Buy => "BUY",
            VerdictLabel::Hold => "HOLD",
            VerdictLabel::Sell => "SELL",
            VerdictLabel::StrongSell => "STRONG SELL",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub narrative: String,
    pub score: u8,
    pub label: VerdictLabel,
}

/// Fuse a setup with scored news. An empty news list contributes nothing.
pub fn fuse_verdict(setup: &Setup, news: &[NewsItem]) -> Verdict {
    let mut score = BASE_SCORE;
    let mut tokens: Vec<&str> = Vec::new();

    match setup.trend {
        Trend::Uptrend => {
            score += TREND_WEIGHT;
            tokens.push("uptrend");
        }
        Trend::Downtrend => {
            score -= TREND_WEIGHT;
            tokens.push("downtrend");
        }
        Trend::Sideways => {}
    }

    if setup.rsi_val > RSI_OVERBOUGHT {
        score -= RSI_WEIGHT;
        tokens.push("RSI overbought");
    } else if setup.rsi_val < RSI_OVERSOLD {
        score += RSI_WEIGHT;
        tokens.push("RSI oversold");
    }

    let net = net_polarity(news);
    if net > NEWS_THRESHOLD {
        score += NEWS_WEIGHT;
        tokens.push("news bullish");
    } else if net < -NEWS_THRESHOLD {
        score -= NEWS_WEIGHT;
        tokens.push("news bearish");
    }

    // clamp keeps the cast lossless
    let score = score.clamp(0, 100) as u8;
    Verdict {
        narrative: tokens.join(", "),
        score,
        label: VerdictLabel::from_score(score),
    }
}
