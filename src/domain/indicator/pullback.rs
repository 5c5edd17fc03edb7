//! Pullback ("push") rate: how far the close sits below the rolling high.
//!
//! push[i] = (high20[i] - C[i]) / high20[i]
//! NaN when high20[i] is NaN or zero.

pub fn push_rate(rolling_high: &[f64], closes: &[f64]) -> Vec<f64> {
    rolling_high
        .iter()
        .zip(closes)
        .map(|(&high, &close)| {
            if !high.is_finite() || high == 0.0 {
                f64::NAN
            } else {
                (high - close) / high
            }
        })
        .collect()
}
