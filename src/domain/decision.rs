//! Daily decision engine.
//!
//! Rules are evaluated in strict precedence, first match wins:
//!
//! 1. `DataInsufficient`: snapshot invalid
//! 2. `AllClose`: `atr14 > atr_all` or `|chg20| >= shock`
//! 3. `Half`: `atr14 > atr_half`
//! 4. `AddAb`: pullback deep enough, ATR calm, A and B cooled down, A+B below capacity
//! 5. `SignalC`: attack pool affords `min_lot_c` more C lots
//! 6. `Hold`
//!
//! Every rule flag is computed regardless of which action wins so callers can
//! inspect or highlight them individually.

use std::fmt;

use super::layer::Layers;
use super::metrics::{Insufficiency, LatestMetrics, MetricsSnapshot};
use super::params::Params;
use super::pools::Pools;
use super::money::fmt_jpy;
use super::sizing::{max_lots_ab, max_lots_c};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    DataInsufficient(Insufficiency),
    AllClose { atr_breach: bool, shock_breach: bool },
    Half,
    AddAb { max_lots: u32, current: u64 },
    SignalC { max_lots_c: u32, current: u32, min_lot: u32 },
    Hold,
}

impl Action {
    pub fn code(&self) -> &'static str {
        match self {
            Action::DataInsufficient(_) => "DATA_INSUFFICIENT",
            Action::AllClose { .. } => "ALL_CLOSE",
            Action::Half => "HALF",
            Action::AddAb { .. } => "ADD_AB",
            Action::SignalC { .. } => "SIGNAL_C",
            Action::Hold => "HOLD",
        }
    }

    pub fn badge(&self) -> Badge {
        match self {
            Action::AllClose { .. } => Badge::Bad,
            Action::DataInsufficient(_) | Action::Half => Badge::Warn,
            Action::AddAb { .. } | Action::SignalC { .. } | Action::Hold => Badge::Ok,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Action::DataInsufficient(_) => "Data insufficient: decision on hold",
            Action::AllClose { .. } => "Close all (A/B/C)",
            Action::Half => "Halve (A/B/C)",
            Action::AddAb { .. } => "Add candidate (A/B)",
            Action::SignalC { .. } => "Attack (C) add signal: minimum lot affordable",
            Action::Hold => "Do nothing",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Ok,
    Warn,
    Bad,
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Badge::Ok => "ok",
            Badge::Warn => "warn",
            Badge::Bad => "bad",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleFlags {
    pub all_close: bool,
    /// Excludes `all_close`.
    pub half: bool,
    /// Excludes `all_close` and `half`.
    pub add_ab: bool,
    /// Excludes only `all_close`.
    pub signal_c: bool,
}

/// Intermediate values behind a decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Computed {
    pub metrics: LatestMetrics,
    pub max_lots_ab: u32,
    pub max_lots_c: u32,
    pub lots_ab: u64,
    pub gap_ok_a: bool,
    pub gap_ok_b: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub badge: Badge,
    pub title: String,
    pub reason: String,
    pub flags: RuleFlags,
    pub computed: Option<Computed>,
}

pub fn evaluate(
    params: &Params,
    layers: &Layers,
    pools: &Pools,
    snapshot: &MetricsSnapshot,
) -> Decision {
    let m = match snapshot {
        MetricsSnapshot::Ready(m) => m,
        MetricsSnapshot::Insufficient { reason, .. } => {
            let action = Action::DataInsufficient(*reason);
            return Decision {
                action,
                badge: action.badge(),
                title: action.title().to_string(),
                reason: reason.to_string(),
                flags: RuleFlags::default(),
                computed: None,
            };
        }
    };

    let atr = m.atr14;
    let shock_abs = m.chg20.abs();

    let atr_breach = atr > params.atr_all;
    let shock_breach = shock_abs >= params.shock;
    let all_close = atr_breach || shock_breach;
    let half = !all_close && atr > params.atr_half;

    let gap_ok_a = layers.a.cooldown_elapsed(m.date, params.gap_days);
    let gap_ok_b = layers.b.cooldown_elapsed(m.date, params.gap_days);
    let max_ab = max_lots_ab(params, m.close);
    let lots_ab = layers.ab_lots();

    let add_ab = !all_close
        && !half
        && m.push_rate >= params.push_th
        && atr <= params.atr_add
        && gap_ok_a
        && gap_ok_b
        && u64::from(max_ab) > lots_ab;

    let min_lot = params.min_lot_c.max(1);
    let max_c = max_lots_c(pools.attack_jpy, m.close);
    let signal_c = !all_close && u64::from(max_c) >= u64::from(layers.c.lots) + u64::from(min_lot);

    let action = if all_close {
        Action::AllClose {
            atr_breach,
            shock_breach,
        }
    } else if half {
        Action::Half
    } else if add_ab {
        Action::AddAb {
            max_lots: max_ab,
            current: lots_ab,
        }
    } else if signal_c {
        Action::SignalC {
            max_lots_c: max_c,
            current: layers.c.lots,
            min_lot,
        }
    } else {
        Action::Hold
    };

    Decision {
        action,
        badge: action.badge(),
        title: action.title().to_string(),
        reason: rationale(&action, params, pools, m),
        flags: RuleFlags {
            all_close,
            half,
            add_ab,
            signal_c,
        },
        computed: Some(Computed {
            metrics: m.clone(),
            max_lots_ab: max_ab,
            max_lots_c: max_c,
            lots_ab,
            gap_ok_a,
            gap_ok_b,
        }),
    }
}

fn rationale(action: &Action, params: &Params, pools: &Pools, m: &LatestMetrics) -> String {
    match *action {
        Action::AllClose {
            atr_breach,
            shock_breach,
        } => {
            let trigger = match (atr_breach, shock_breach) {
                (true, true) => "ATR>All + |chg20|>=Shock",
                (true, false) => "ATR>All",
                _ => "|chg20|>=Shock",
            };
            format!(
                "trigger: {trigger} / ATR={:.4}, |chg20|={:.2}%",
                m.atr14,
                m.chg20.abs() * 100.0
            )
        }
        Action::Half => format!(
            "trigger: ATR>Half / ATR={:.4} > {:.4}",
            m.atr14, params.atr_half
        ),
        Action::AddAb { max_lots, current } => format!(
            "pullback>={:.2}% and ATR<={:.4} and gap>={}d and maxLots({max_lots})>current({current})",
            params.push_th * 100.0,
            params.atr_add,
            params.gap_days,
        ),
        Action::SignalC {
            max_lots_c,
            current,
            min_lot,
        } => format!(
            "attack pool={} -> C max lots={max_lots_c} (10k units) / current C={current} / min add={min_lot}",
            fmt_jpy(pools.attack_jpy)
        ),
        Action::Hold | Action::DataInsufficient(_) => format!(
            "ATR={:.4} / 20d change={:.2}% / pullback={:.2}%",
            m.atr14,
            m.chg20 * 100.0,
            m.push_rate * 100.0
        ),
    }
}
