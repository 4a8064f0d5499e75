//! TradeLens CLI: analyze a symbol or print the local-exchange panel.
//!
//! Commands:
//! - `analyze`: full pipeline for one symbol (setup, levels, pivots, news, verdict)
//! - `exchange`: intraday pivot ladder per exchange pair
//! - `config`: print the effective configuration

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tradelens_core::analysis::{Bias, Bucket, ExchangeRow};
use tradelens_core::domain::Period;
use tradelens_core::providers::http::HttpClient;
use tradelens_core::providers::{
    BitkubTicker, CachedTicker, CsvProvider, MarketDataProvider, SyntheticProvider,
};
use tradelens_core::{exchange_report, Analyzer, Config, MarketReport};

#[derive(Parser)]
#[command(
    name = "tradelens",
    about = "TradeLens: technical setup, levels and news verdicts for a symbol"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one symbol.
    Analyze {
        /// Ticker, e.g. AAPL, BTC-USD, GC=F.
        symbol: String,

        /// History period: 1mo, 3mo, 6mo or 1y.
        #[arg(long, default_value = "1y")]
        period: Period,

        /// Include the Heikin-Ashi series.
        #[arg(long, default_value_t = false)]
        heikin_ashi: bool,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read bars from a CSV file instead of Yahoo Finance.
        #[arg(long, conflicts_with = "synthetic")]
        csv: Option<PathBuf>,

        /// Use a seeded synthetic random walk instead of Yahoo Finance.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Translate headlines (overrides translator_enabled).
        #[arg(long, default_value_t = false)]
        translate: bool,

        /// Print the report as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Intraday pivots for local-exchange pairs.
    Exchange {
        /// Pairs to show, e.g. THB_BTC. Defaults to all.
        #[arg(long = "pair")]
        pairs: Vec<String>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print rows as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the effective configuration as TOML.
    Config {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            symbol,
            period,
            heikin_ashi,
            config,
            csv,
            synthetic,
            translate,
            json,
        } => run_analyze(
            &symbol,
            period,
            heikin_ashi,
            config.as_deref(),
            csv,
            synthetic,
            translate,
            json,
        ),
        Commands::Exchange {
            pairs,
            config,
            json,
        } => run_exchange(&pairs, config.as_deref(), json),
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => {
            let config = Config::default().with_env();
            config.validate()?;
            Ok(config)
        }
    }
}

fn http_client(config: &Config) -> Result<HttpClient> {
    Ok(HttpClient::new(config.upstream_timeout()?)?)
}

#[allow(clippy::too_many_arguments)]
fn run_analyze(
    symbol: &str,
    period: Period,
    heikin_ashi: bool,
    config_path: Option<&Path>,
    csv: Option<PathBuf>,
    synthetic: bool,
    translate: bool,
    json: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if translate {
        config.translator_enabled = true;
    }
    let http = http_client(&config)?;

    let offline: Option<Box<dyn MarketDataProvider>> = match (csv, synthetic) {
        (Some(path), _) => {
            if !path.exists() {
                bail!("CSV file not found: {}", path.display());
            }
            Some(Box::new(CsvProvider::new(path)))
        }
        (None, true) => Some(Box::new(SyntheticProvider::default())),
        (None, false) => None,
    };

    let analyzer = match offline {
        Some(market) => Analyzer::new(config, market).with_live_news(http),
        None => Analyzer::live(config, http),
    };

    tracing::info!(symbol, %period, heikin_ashi, "analyzing");
    let report = analyzer.analyze(symbol, period, heikin_ashi)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn run_exchange(pairs: &[String], config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let ticker = CachedTicker::new(
        BitkubTicker::new(http_client(&config)?),
        config.cache_ttls.exchange_ticker(),
    );
    let rows = exchange_report(&ticker, pairs);
    tracing::info!(rows = rows.len(), "exchange panel built");

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("No exchange data available.");
        return Ok(());
    }
    for row in &rows {
        print_exchange_row(row);
    }
    Ok(())
}

fn print_report(report: &MarketReport) {
    let name = report
        .info
        .as_ref()
        .and_then(|i| i.name.as_deref())
        .unwrap_or(&report.symbol);
    println!("=== {} ({}) {} ===", report.symbol, name, report.period);

    let Some(last) = report.frame.last() else {
        println!("No market data available.");
        return;
    };
    println!(
        "Bars: {}  Last close: {:.2}  ({})",
        report.frame.len(),
        last.close,
        last.timestamp.format("%Y-%m-%d")
    );
    println!();

    match &report.setup {
        Ok(setup) => {
            println!("Setup");
            println!("  Trend:  {}", setup.trend);
            println!("  Signal: {}", setup.signal);
            println!("  RSI:    {:.1}", setup.rsi_val);
            println!(
                "  Entry {:.2}  Stop {:.2}  Target {:.2}",
                setup.entry, setup.sl, setup.tp
            );
        }
        Err(e) => println!("Setup unavailable: {e}"),
    }

    if let Some(levels) = &report.levels {
        println!();
        println!("Levels");
        println!("  Resistance: {}", join_prices(&levels.resistances));
        println!("  Support:    {}", join_prices(&levels.supports));
    }

    if let Some(pivots) = &report.pivots {
        println!();
        println!("Pivots");
        for (name, value) in pivots.named() {
            println!("  {name:<8} {value:>12.2}");
        }
    }

    if let Some(dynamics) = &report.dynamics {
        for (name, value) in dynamics.named() {
            println!("  {name:<8} {value:>12.2}");
        }
    }

    if let Some(insight) = &report.insight {
        println!();
        println!("Insight: {insight}");
    }

    if let Some(ha) = &report.heikin_ashi {
        if let Some(bar) = ha.last() {
            let color = if bar.close >= bar.open { "green" } else { "red" };
            println!(
                "Heikin-Ashi: O {:.2} H {:.2} L {:.2} C {:.2} ({color})",
                bar.open, bar.high, bar.low, bar.close
            );
        }
    }

    println!();
    if report.news.is_empty() {
        println!("News: none");
    } else {
        println!("News");
        for item in &report.news {
            let tag = match item.bucket {
                Bucket::Pos => "+",
                Bucket::Neg => "-",
                Bucket::Neu => "=",
            };
            println!("  [{tag}] {:>5.2}  {} ({})", item.polarity, item.title, item.source);
        }
    }

    if let Some(verdict) = &report.verdict {
        println!();
        println!("Verdict: {} ({}/100)", verdict.label, verdict.score);
        if !verdict.narrative.is_empty() {
            println!("  {}", verdict.narrative);
        }
    }
}

fn print_exchange_row(row: &ExchangeRow) {
    let bias = match row.pivots.status {
        Bias::Bullish => "BULLISH",
        Bias::Bearish => "BEARISH",
    };
    println!(
        "{:<10} last {:>14.2}  high {:>14.2}  low {:>14.2}  {bias}",
        row.pair, row.last, row.high, row.low
    );
    for level in &row.pivots.levels {
        println!("    {:<6} {:>14.2}", level.name, level.price);
    }
    println!(
        "    fib    {:>14.2} .. {:.2}",
        row.pivots.fib.bot, row.pivots.fib.top
    );
}

fn join_prices(prices: &[f64]) -> String {
    if prices.is_empty() {
        return "-".into();
    }
    prices
        .iter()
        .map(|p| format!("{p:.2}"))
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_defaults_to_one_year() {
        let cli = Cli::try_parse_from(["tradelens", "analyze", "AAPL"]).unwrap();
        match cli.command {
            Commands::Analyze { symbol, period, .. } => {
                assert_eq!(symbol, "AAPL");
                assert_eq!(period, Period::OneYear);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn csv_and_synthetic_conflict() {
        let parsed =
            Cli::try_parse_from(["tradelens", "analyze", "X", "--csv", "a.csv", "--synthetic"]);
        assert!(parsed.is_err());
    }
}
