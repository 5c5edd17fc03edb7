//! Fractional rate of change.
//!
//! chg(n)[i] = C[i] / C[i-n] - 1
//! Warmup: first n values NaN.

pub fn pct_change(closes: &[f64], period: usize) -> Vec<f64> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            if i >= period {
                close / closes[i - period] - 1.0
            } else {
                f64::NAN
            }
        })
        .collect()
}
