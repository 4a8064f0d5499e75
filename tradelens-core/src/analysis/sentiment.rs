//! Headline polarity scoring.
//!
//! [`LexiconScorer`] averages the polarity of known words in a headline.
//! A negator up to two words before a term flips it at half strength; an
//! intensifier directly before a term scales it up. The result is clamped to
//! [-1, 1]; text with no known words scores 0.

use std::collections::HashMap;

/// Capability interface for polarity scoring.
pub trait SentimentScorer: Send + Sync {
    /// Signed polarity of `text` in [-1, 1].
    fn polarity(&self, text: &str) -> f64;
}

const LEXICON: &[(&str, f64)] = &[
    // Positive
    ("approval", 0.4),
    ("beat", 0.5),
    ("beats", 0.5),
    ("best", 1.0),
    ("boost", 0.4),
    ("boosts", 0.4),
    ("breakthrough", 0.6),
    ("bullish", 0.7),
    ("climb", 0.3),
    ("climbs", 0.3),
    ("gain", 0.4),
    ("gains", 0.4),
    ("good", 0.7),
    ("great", 0.8),
    ("growth", 0.4),
    ("jump", 0.5),
    ("jumps", 0.5),
    ("optimism", 0.5),
    ("optimistic", 0.5),
    ("outperform", 0.5),
    ("positive", 0.3),
    ("profit", 0.4),
    ("profits", 0.4),
    ("rally", 0.5),
    ("rallies", 0.5),
    ("rebound", 0.4),
    ("record", 0.3),
    ("recovery", 0.4),
    ("rise", 0.3),
    ("rises", 0.3),
    ("soar", 0.7),
    ("soars", 0.7),
    ("strong", 0.4),
    ("surge", 0.6),
    ("surges", 0.6),
    ("upgrade", 0.6),
    ("win", 0.5),
    // Negative
    ("bad", -0.7),
    ("bankruptcy", -0.9),
    ("bearish", -0.7),
    ("concern", -0.3),
    ("concerns", -0.3),
    ("crash", -0.8),
    ("crashes", -0.8),
    ("cut", -0.3),
    ("cuts", -0.3),
    ("decline", -0.4),
    ("declines", -0.4),
    ("downgrade", -0.6),
    ("drop", -0.4),
    ("drops", -0.4),
    ("fall", -0.3),
    ("falls", -0.3),
    ("fear", -0.5),
    ("fears", -0.5),
    ("fraud", -0.8),
    ("inflation", -0.2),
    ("lawsuit", -0.5),
    ("layoffs", -0.5),
    ("loss", -0.4),
    ("losses", -0.4),
    ("miss", -0.4),
    ("misses", -0.4),
    ("plunge", -0.7),
    ("plunges", -0.7),
    ("recession", -0.6),
    ("risk", -0.2),
    ("selloff", -0.5),
    ("sink", -0.5),
    ("sinks", -0.5),
    ("slowdown", -0.4),
    ("slump", -0.6),
    ("tumble", -0.6),
    ("tumbles", -0.6),
    ("volatile", -0.2),
    ("warning", -0.4),
    ("weak", -0.4),
    ("worst", -1.0),
];

const NEGATORS: &[&str] = &["not", "no", "never", "without", "isn't", "doesn't", "won't"];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("sharply", 1.3),
    ("strongly", 1.3),
    ("highly", 1.3),
    ("extremely", 1.5),
    ("significantly", 1.3),
];

const NEGATION_WINDOW: usize = 2;

/// Word-lexicon polarity scorer for financial headlines.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            words: LEXICON.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

impl SentimentScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let mut total = 0.0;
        let mut matched = 0usize;
        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.words.get(token.as_str()) else {
                continue;
            };
            let mut score = base;
            if i > 0 {
                if let Some(&mult) = self.intensifiers.get(tokens[i - 1].as_str()) {
                    score *= mult;
                }
            }
            let negated = tokens[i.saturating_sub(NEGATION_WINDOW)..i]
                .iter()
                .any(|t| NEGATORS.contains(&t.as_str()));
            if negated {
                score *= -0.5;
            }
            total += score;
            matched += 1;
        }
        if matched == 0 {
            return 0.0;
        }
        (total / matched as f64).clamp(-1.0, 1.0)
    }
}
