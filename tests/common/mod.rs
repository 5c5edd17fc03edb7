#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
pub use carrytrader::domain::bar::Bar;
use carrytrader::domain::session::State;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn day(n: usize) -> NaiveDate {
    date("2024-01-01") + Duration::days(n as i64)
}

/// Bar with high/low symmetric around `close`.
pub fn make_bar(d: NaiveDate, close: f64, range: f64, swap: f64) -> Bar {
    Bar {
        date: d,
        open: close,
        high: close + range / 2.0,
        low: close - range / 2.0,
        close,
        swap_per_10k: swap,
    }
}

/// Constant close, constant range: ATR settles at exactly `range`.
pub fn flat_series(n: usize, close: f64, range: f64) -> Vec<Bar> {
    (0..n).map(|i| make_bar(day(i), close, range, 100.0)).collect()
}

/// Calm series at 7.40 that pulls back to 7.00 over its last six bars.
/// At the end: push ~5.7%, chg20 ~-5.4%, ATR well under 0.18.
pub fn pullback_series(n: usize) -> Vec<Bar> {
    assert!(n >= 21);
    let steps = 6;
    (0..n)
        .map(|i| {
            let close = if i + steps < n {
                7.40
            } else {
                let k = (i + steps + 1 - n) as f64;
                7.40 - 0.40 * k / steps as f64
            };
            make_bar(day(i), close, 0.04, 100.0)
        })
        .collect()
}

/// Steady climb of `total_pct` over the last 20 bars with a tight range.
pub fn trending_series(n: usize, start: f64, total_pct: f64) -> Vec<Bar> {
    let step = start * total_pct / 20.0;
    (0..n)
        .map(|i| {
            let offset = i.saturating_sub(n.saturating_sub(21)) as f64;
            make_bar(day(i), start + step * offset, 0.04, 100.0)
        })
        .collect()
}

pub fn state_with_bars(bars: Vec<Bar>) -> State {
    let mut state = State::default();
    for bar in bars {
        state.ingest_bar(bar).unwrap();
    }
    state
}
