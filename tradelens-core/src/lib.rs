//! TradeLens Core: market analytics behind a trading dashboard.
//!
//! This crate turns an OHLCV series and a bag of headlines into:
//! - a technical setup (trend, RSI, ATR-based stop and target)
//! - swing support/resistance levels and a pivot/dynamic-level insight
//! - an optional Heikin-Ashi recoloring of the series
//! - scored, optionally translated news
//! - a fused 0..100 verdict
//!
//! Analytics in [`analysis`] and [`indicators`] are pure and strict. I/O lives
//! behind the collaborator traits in [`providers`]; [`pipeline`] wires them
//! together and degrades softly when a collaborator fails.

pub mod analysis;
pub mod config;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod pipeline;
pub mod providers;

pub use config::Config;
pub use error::{AnalysisError, ConfigError, UpstreamError};
pub use pipeline::{exchange_report, Analyzer, MarketReport};
