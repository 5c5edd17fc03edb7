//! Display model: per-layer rows and the swap income summary.

use std::fmt;

use super::bar::Bar;
use super::decision::{Badge, Decision};
use super::layer::{LayerId, Layers};
use super::params::Params;
use super::pools::daily_swap;

pub const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerStatus {
    AllClose,
    Half,
    AddSignal,
    AddCandidate,
    Maintain,
}

impl fmt::Display for LayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LayerStatus::AllClose => "close all",
            LayerStatus::Half => "halve",
            LayerStatus::AddSignal => "add signal",
            LayerStatus::AddCandidate => "add candidate",
            LayerStatus::Maintain => "maintain",
        };
        f.write_str(s)
    }
}

pub fn layer_status(layer: LayerId, decision: &Decision) -> LayerStatus {
    let flags = &decision.flags;
    if flags.all_close {
        LayerStatus::AllClose
    } else if flags.half {
        LayerStatus::Half
    } else if layer == LayerId::C && flags.signal_c {
        LayerStatus::AddSignal
    } else if layer != LayerId::C && flags.add_ab {
        LayerStatus::AddCandidate
    } else {
        LayerStatus::Maintain
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerRow {
    pub layer: LayerId,
    pub label: &'static str,
    pub lots: u32,
    /// Projected daily swap at the latest bar's rate; `None` without bars.
    pub daily_swap_jpy: Option<f64>,
    pub status: LayerStatus,
}

pub fn layer_rows(layers: &Layers, last_bar: Option<&Bar>, decision: &Decision) -> Vec<LayerRow> {
    LayerId::ALL
        .iter()
        .map(|&id| {
            let lots = layers.get(id).lots;
            LayerRow {
                layer: id,
                label: id.label(),
                lots,
                daily_swap_jpy: last_bar.map(|b| daily_swap(u64::from(lots), b.swap_per_10k)),
                status: layer_status(id, decision),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Kpi {
    pub daily_swap_jpy: Option<f64>,
    pub monthly_swap_jpy: Option<f64>,
    /// Monthly projection as a percentage of the monthly goal.
    pub goal_pct: Option<f64>,
    pub status: &'static str,
}

pub fn kpi(params: &Params, layers: &Layers, last_bar: Option<&Bar>, decision: &Decision) -> Kpi {
    let daily = last_bar.map(|b| daily_swap(layers.total_lots(), b.swap_per_10k));
    let monthly = daily.map(|d| d * DAYS_PER_MONTH);
    let goal = if params.goal_monthly_jpy > 0.0 {
        params.goal_monthly_jpy
    } else {
        100_000.0
    };
    let status = match decision.badge {
        Badge::Bad => "stopped (close all)",
        Badge::Warn => "caution (halve)",
        Badge::Ok => "normal",
    };
    Kpi {
        daily_swap_jpy: daily,
        monthly_swap_jpy: monthly,
        goal_pct: monthly.map(|m| m / goal * 100.0),
        status,
    }
}
