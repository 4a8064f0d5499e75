//! Criterion benchmarks for the analytics hot path.
//!
//! Benchmarks:
//! 1. Indicator stack (EMA, SMA, ATR, RSI, Bollinger) over bar series
//! 2. Per-request analytics (setup, swing levels, pivots + dynamics, Heikin-Ashi)
//! 3. Headline scoring

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tradelens_core::analysis::{
    classify_setup, dynamic_insight, find_swing_levels, heikin_ashi, Dynamics, LexiconScorer,
    Pivots, SentimentScorer,
};
use tradelens_core::domain::{Bar, OhlcvFrame};
use tradelens_core::indicators::{Atr, Bollinger, Ema, Indicator, Rsi, Sma};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_frame(n: usize) -> OhlcvFrame {
    let base = chrono::DateTime::from_timestamp(1_577_923_200, 0).unwrap_or_default();
    let bars = (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0 + i as f64 * 0.05;
            let open = close - 0.3;
            Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high: close + 1.5,
                low: open - 1.5,
                close,
                volume: 1_000_000.0 + (i % 500) as f64,
            }
        })
        .collect();
    OhlcvFrame::canonicalize(bars)
}

// ── 1. Indicator Stack ───────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicators");

    for &bar_count in &[252, 1260, 2520] {
        let frame = make_frame(bar_count);
        let stack: Vec<Box<dyn Indicator>> = vec![
            Box::new(Ema::new(20)),
            Box::new(Ema::new(50)),
            Box::new(Ema::new(200)),
            Box::new(Sma::new(20)),
            Box::new(Atr::new(14)),
            Box::new(Rsi::new(14)),
            Box::new(Bollinger::upper(20, 2.0)),
            Box::new(Bollinger::lower(20, 2.0)),
        ];
        group.bench_with_input(
            BenchmarkId::new("full_stack_8", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| {
                    for indicator in &stack {
                        black_box(indicator.compute(black_box(frame.bars())));
                    }
                });
            },
        );
    }

    group.finish();
}

// ── 2. Per-request Analytics ─────────────────────────────────────────

fn bench_analytics(c: &mut Criterion) {
    let mut group = c.benchmark_group("analytics");

    for &bar_count in &[252, 1260] {
        let frame = make_frame(bar_count);

        group.bench_with_input(BenchmarkId::new("setup", bar_count), &bar_count, |b, _| {
            b.iter(|| classify_setup(black_box(&frame)));
        });

        group.bench_with_input(
            BenchmarkId::new("swing_levels", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| find_swing_levels(black_box(&frame)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("pivots_dynamics_insight", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| {
                    let pivots = Pivots::from_frame(black_box(&frame))?;
                    let dynamics = Dynamics::from_frame(black_box(&frame))?;
                    dynamic_insight(dynamics.current, &pivots, &dynamics)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("heikin_ashi", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| heikin_ashi(black_box(&frame)));
            },
        );
    }

    group.finish();
}

// ── 3. Headline Scoring ──────────────────────────────────────────────

fn bench_sentiment(c: &mut Criterion) {
    let scorer = LexiconScorer::new();
    let headlines = [
        "Shares surge to record as strong earnings beat estimates",
        "Stocks not likely to rebound after very sharp selloff",
        "Central bank holds rates steady amid inflation concerns",
    ];
    c.bench_function("lexicon_polarity_3", |b| {
        b.iter(|| {
            for h in &headlines {
                black_box(scorer.polarity(black_box(h)));
            }
        });
    });
}

criterion_group!(benches, bench_indicators, bench_analytics, bench_sentiment);
criterion_main!(benches);
