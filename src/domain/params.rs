//! Decision thresholds and sizing inputs.

use serde::{Deserialize, Serialize};

use super::error::CarryError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// ATR above which every layer is closed.
    pub atr_all: f64,
    /// ATR above which every layer is halved.
    pub atr_half: f64,
    /// ATR at or below which A/B adds are allowed.
    pub atr_add: f64,
    /// Minimum pullback below the 20-day high for an A/B add.
    pub push_th: f64,
    /// |20-day change| at or above which every layer is closed.
    pub shock: f64,
    pub gap_days: u32,
    pub equity_jpy: f64,
    pub lev_ab: f64,
    pub use_ab: f64,
    /// Smallest C add, in 10k-unit lots.
    pub min_lot_c: u32,
    pub goal_monthly_jpy: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            atr_all: 0.30,
            atr_half: 0.22,
            atr_add: 0.18,
            push_th: 0.05,
            shock: 0.20,
            gap_days: 7,
            equity_jpy: 500_000.0,
            lev_ab: 7.2,
            use_ab: 0.95,
            min_lot_c: 1,
            goal_monthly_jpy: 100_000.0,
        }
    }
}

pub const PARAM_KEYS: [&str; 11] = [
    "atr_all",
    "atr_half",
    "atr_add",
    "push_th",
    "shock",
    "gap_days",
    "equity_jpy",
    "lev_ab",
    "use_ab",
    "min_lot_c",
    "goal_monthly_jpy",
];

/// Unvalidated parameter input, as typed or read from a file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawParams {
    pub atr_all: f64,
    pub atr_half: f64,
    pub atr_add: f64,
    pub push_th: f64,
    pub shock: f64,
    pub gap_days: f64,
    pub equity_jpy: f64,
    pub lev_ab: f64,
    pub use_ab: f64,
    pub min_lot_c: f64,
    pub goal_monthly_jpy: f64,
}

impl From<&Params> for RawParams {
    fn from(p: &Params) -> Self {
        Self {
            atr_all: p.atr_all,
            atr_half: p.atr_half,
            atr_add: p.atr_add,
            push_th: p.push_th,
            shock: p.shock,
            gap_days: p.gap_days as f64,
            equity_jpy: p.equity_jpy,
            lev_ab: p.lev_ab,
            use_ab: p.use_ab,
            min_lot_c: p.min_lot_c as f64,
            goal_monthly_jpy: p.goal_monthly_jpy,
        }
    }
}

impl RawParams {
    pub fn get(&self, key: &str) -> Option<f64> {
        let value = match key {
            "atr_all" => self.atr_all,
            "atr_half" => self.atr_half,
            "atr_add" => self.atr_add,
            "push_th" => self.push_th,
            "shock" => self.shock,
            "gap_days" => self.gap_days,
            "equity_jpy" => self.equity_jpy,
            "lev_ab" => self.lev_ab,
            "use_ab" => self.use_ab,
            "min_lot_c" => self.min_lot_c,
            "goal_monthly_jpy" => self.goal_monthly_jpy,
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, key: &str, value: f64) -> bool {
        let slot = match key {
            "atr_all" => &mut self.atr_all,
            "atr_half" => &mut self.atr_half,
            "atr_add" => &mut self.atr_add,
            "push_th" => &mut self.push_th,
            "shock" => &mut self.shock,
            "gap_days" => &mut self.gap_days,
            "equity_jpy" => &mut self.equity_jpy,
            "lev_ab" => &mut self.lev_ab,
            "use_ab" => &mut self.use_ab,
            "min_lot_c" => &mut self.min_lot_c,
            "goal_monthly_jpy" => &mut self.goal_monthly_jpy,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Checks every field is finite (first offender named) and coerces the
    /// day gap and minimum C lot to integers of at least 1.
    pub fn validate(&self) -> Result<Params, CarryError> {
        for key in PARAM_KEYS {
            let value = self.get(key).unwrap_or(f64::NAN);
            if !value.is_finite() {
                return Err(CarryError::InvalidParam {
                    key: key.to_string(),
                    reason: "must be a finite number".to_string(),
                });
            }
        }

        Ok(Params {
            atr_all: self.atr_all,
            atr_half: self.atr_half,
            atr_add: self.atr_add,
            push_th: self.push_th,
            shock: self.shock,
            gap_days: positive_int(self.gap_days),
            equity_jpy: self.equity_jpy,
            lev_ab: self.lev_ab,
            use_ab: self.use_ab,
            min_lot_c: positive_int(self.min_lot_c),
            goal_monthly_jpy: self.goal_monthly_jpy,
        })
    }
}

fn positive_int(value: f64) -> u32 {
    value.floor().max(1.0) as u32
}
