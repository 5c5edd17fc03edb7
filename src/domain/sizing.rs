//! Lot capacity of each layer group.
//!
//! A lot is 10,000 units, so its notional in JPY is `close * 10000`.

use super::params::Params;

pub const LOT_UNITS: f64 = 10_000.0;
/// Notional leverage funded by the attack pool.
pub const ATTACK_LEVERAGE: f64 = 10.0;

/// floor(equity * lev_ab * use_ab / (close * 10000))
pub fn max_lots_ab(params: &Params, close: f64) -> u32 {
    lots_for_notional(params.equity_jpy * params.lev_ab * params.use_ab, close)
}

/// floor(attack_pool * 10 / (close * 10000))
pub fn max_lots_c(attack_jpy: f64, close: f64) -> u32 {
    lots_for_notional(attack_jpy * ATTACK_LEVERAGE, close)
}

fn lots_for_notional(notional: f64, close: f64) -> u32 {
    let denom = close * LOT_UNITS;
    if !denom.is_finite() || denom <= 0.0 {
        return 0;
    }
    let lots = (notional / denom).floor();
    if lots.is_finite() && lots > 0.0 {
        lots as u32
    } else {
        0
    }
}
