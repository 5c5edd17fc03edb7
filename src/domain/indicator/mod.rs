//! Technical indicators over the daily bar series.
//!
//! Every series is aligned index-for-index with the input bars. Entries that
//! lack enough history are `NaN`; downstream code treats a non-finite value as
//! "insufficient history" rather than as zero.

pub mod atr;
pub mod change;
pub mod pullback;
pub mod rolling_max;

use crate::domain::bar::Bar;

pub const HIGH_PERIOD: usize = 20;
pub const ATR_PERIOD: usize = 14;
pub const CHANGE_PERIOD: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub high20: Vec<f64>,
    pub atr14: Vec<f64>,
    pub chg20: Vec<f64>,
    pub push_rate: Vec<f64>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.high20.len()
    }

    pub fn is_empty(&self) -> bool {
        self.high20.is_empty()
    }
}

/// Recomputes all indicators from scratch over `bars` (ascending by date).
pub fn compute_indicators(bars: &[Bar]) -> IndicatorSeries {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let high20 = rolling_max::rolling_max(&highs, HIGH_PERIOD);
    let atr14 = atr::wilder_atr(bars, ATR_PERIOD);
    let chg20 = change::pct_change(&closes, CHANGE_PERIOD);
    let push_rate = pullback::push_rate(&high20, &closes);

    IndicatorSeries {
        high20,
        atr14,
        chg20,
        push_rate,
    }
}
