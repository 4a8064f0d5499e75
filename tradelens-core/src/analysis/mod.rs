//! Analytics: pure transformations from frames and headlines to results.

pub mod exchange;
pub mod heikin_ashi;
pub mod intraday;
pub mod levels;
pub mod news;
pub mod pivots;
pub mod sentiment;
pub mod setup;
pub mod verdict;

pub use exchange::{exchange_panel, ExchangeRow};
pub use heikin_ashi::heikin_ashi;
pub use intraday::{intraday_pivots, Bias, FibBand, IntradayPivotSet, LevelKind, PivotLevel};
pub use levels::{find_swing_levels, split_levels, LevelSet, SupportResistance};
pub use news::{aggregate_news, strip_html, Bucket, NewsItem, Translation};
pub use pivots::{dynamic_insight, Dynamics, Insight, Pivots, Proximity, Regime};
pub use sentiment::{LexiconScorer, SentimentScorer};
pub use setup::{classify_setup, Setup, Signal, Trend, SETUP_MIN_BARS};
pub use verdict::{fuse_verdict, Verdict, VerdictLabel};
