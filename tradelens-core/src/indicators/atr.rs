//! Average True Range.
//!
//! The stop/target distance of a setup is a multiple of ATR(14). Each bar's
//! true range widens its high-low span to cover a gap from the prior close;
//! ATR averages those ranges with a plain rolling mean. Bar 0 has no prior
//! close, so it never enters the mean and ATR first appears at index `period`.

use super::{sma_of_series, Indicator};
use crate::domain::Bar;

/// Rolling-mean ATR over `period` true ranges.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    label: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "ATR needs a positive period");
        let label = format!("atr_{period}");
        Atr { period, label }
    }
}

/// Per-bar true range. Bar 0 falls back to `high - low`.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let Some(first) = bars.first() else {
        return Vec::new();
    };
    std::iter::once(first.high - first.low)
        .chain(bars.windows(2).map(|pair| {
            let (prev, cur) = (&pair[0], &pair[1]);
            let gap_up = (cur.high - prev.close).abs();
            let gap_down = (cur.low - prev.close).abs();
            (cur.high - cur.low).max(gap_up).max(gap_down)
        }))
        .collect()
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.label
    }

    fn min_bars(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let ranges: Vec<f64> = true_range(bars)
            .into_iter()
            .enumerate()
            .map(|(i, tr)| if i == 0 { f64::NAN } else { tr })
            .collect();
        sma_of_series(&ranges, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};
    use chrono::TimeZone;

    /// Bars from `(high, low, close)`; open is irrelevant to true range.
    fn hlc(rows: &[(f64, f64, f64)]) -> Vec<Bar> {
        let day0 = chrono::Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap();
        rows.iter()
            .enumerate()
            .map(|(i, &(high, low, close))| Bar {
                timestamp: day0 + chrono::Duration::days(i as i64),
                open: close,
                high,
                low,
                close,
                volume: 500.0,
            })
            .collect()
    }

    #[test]
    fn inside_bar_uses_own_span() {
        let tr = true_range(&hlc(&[(50.0, 40.0, 45.0), (48.0, 44.0, 46.0)]));
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
        assert_approx(tr[1], 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn gaps_extend_the_range() {
        // up-gap: prior close 45, high 60 -> 15; down-gap: prior close 58, low 40 -> 18
        let tr = true_range(&hlc(&[
            (50.0, 40.0, 45.0),
            (60.0, 55.0, 58.0),
            (44.0, 40.0, 41.0),
        ]));
        assert_approx(tr[1], 15.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 18.0, DEFAULT_EPSILON);
    }

    #[test]
    fn empty_input() {
        assert!(true_range(&[]).is_empty());
        assert!(Atr::new(3).compute(&[]).is_empty());
    }

    #[test]
    fn first_range_is_left_out_of_the_mean() {
        // TR: [10 (dropped), 4, 6, 2, 8]
        let bars = hlc(&[
            (50.0, 40.0, 45.0),
            (48.0, 44.0, 46.0),
            (52.0, 46.0, 50.0),
            (51.0, 49.0, 50.0),
            (56.0, 48.0, 55.0),
        ]);
        let atr = Atr::new(2).compute(&bars);
        assert!(atr[..2].iter().all(|v| v.is_nan()));
        assert_approx(atr[2], 5.0, DEFAULT_EPSILON);
        assert_approx(atr[3], 4.0, DEFAULT_EPSILON);
        assert_approx(atr[4], 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn latest_needs_one_extra_bar() {
        let atr = Atr::new(14);
        assert_eq!(atr.min_bars(), 15);
        assert_eq!(atr.name(), "atr_14");
        let bars = hlc(&[(2.0, 1.0, 1.5); 14]);
        assert!(atr.latest(&bars).is_err());
    }
}
