//! Swap income pools.

use serde::{Deserialize, Serialize};

/// Lifetime-cumulative JPY balances. Closing positions stops future accrual
/// but never reduces these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pools {
    pub swap_total_jpy: f64,
    pub defense_jpy: f64,
    /// Funds layer C sizing.
    pub attack_jpy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accrual {
    pub total_lots: u64,
    pub swap_per_10k: f64,
    pub daily: f64,
    pub defense: f64,
    pub attack: f64,
}

pub fn daily_swap(lots: u64, swap_per_10k: f64) -> f64 {
    lots as f64 * swap_per_10k
}

impl Pools {
    /// Accrues one day of swap on `total_lots`, split evenly between the
    /// defense and attack pools.
    pub fn accrue(&mut self, total_lots: u64, swap_per_10k: f64) -> Accrual {
        let daily = daily_swap(total_lots, swap_per_10k);
        let defense = daily * 0.5;
        let attack = daily * 0.5;

        self.swap_total_jpy += daily;
        self.defense_jpy += defense;
        self.attack_jpy += attack;

        Accrual {
            total_lots,
            swap_per_10k,
            daily,
            defense,
            attack,
        }
    }
}
