//! Latest-bar metrics snapshot feeding the decision engine.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use super::bar::Bar;
use super::indicator::compute_indicators;

/// Bars required before the 20-day change has a value at the last index.
pub const MIN_BARS: usize = 21;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestMetrics {
    pub date: NaiveDate,
    pub close: f64,
    pub atr14: f64,
    pub chg20: f64,
    pub push_rate: f64,
    pub high20: f64,
    pub swap_per_10k: f64,
}

impl LatestMetrics {
    fn all_finite(&self) -> bool {
        self.atr14.is_finite() && self.chg20.is_finite() && self.push_rate.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insufficiency {
    TooFewBars { have: usize, need: usize },
    NonFinite,
}

impl fmt::Display for Insufficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insufficiency::TooFewBars { have, need } => write!(
                f,
                "not enough data: need at least {need} daily bars, have {have}"
            ),
            Insufficiency::NonFinite => write!(
                f,
                "indicators are not finite (history may be too short or degenerate)"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricsSnapshot {
    Ready(LatestMetrics),
    /// `metrics` is kept for diagnostics when the bar count was sufficient.
    Insufficient {
        reason: Insufficiency,
        metrics: Option<LatestMetrics>,
    },
}

impl MetricsSnapshot {
    pub fn is_valid(&self) -> bool {
        matches!(self, MetricsSnapshot::Ready(_))
    }

    /// Metrics usable for decisions; `None` unless the snapshot is valid.
    pub fn metrics(&self) -> Option<&LatestMetrics> {
        match self {
            MetricsSnapshot::Ready(m) => Some(m),
            MetricsSnapshot::Insufficient { .. } => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            MetricsSnapshot::Ready(_) => "OK".to_string(),
            MetricsSnapshot::Insufficient { reason, .. } => reason.to_string(),
        }
    }
}

pub fn latest_metrics(bars: &[Bar]) -> MetricsSnapshot {
    if bars.len() < MIN_BARS {
        return MetricsSnapshot::Insufficient {
            reason: Insufficiency::TooFewBars {
                have: bars.len(),
                need: MIN_BARS,
            },
            metrics: None,
        };
    }

    let ind = compute_indicators(bars);
    let i = bars.len() - 1;
    let bar = &bars[i];
    let metrics = LatestMetrics {
        date: bar.date,
        close: bar.close,
        atr14: ind.atr14[i],
        chg20: ind.chg20[i],
        push_rate: ind.push_rate[i],
        high20: ind.high20[i],
        swap_per_10k: bar.swap_per_10k,
    };

    if metrics.all_finite() {
        MetricsSnapshot::Ready(metrics)
    } else {
        MetricsSnapshot::Insufficient {
            reason: Insufficiency::NonFinite,
            metrics: Some(metrics),
        }
    }
}
