//! Average True Range with Wilder smoothing.
//!
//! TR[0] = high[0] - low[0] (no previous close)
//! ATR[n-1] = mean(TR[0..n])
//! ATR[i] = (ATR[i-1] * (n-1) + TR[i]) / n
//! Warmup: first n-1 values NaN; whole series NaN if fewer than n bars.

use crate::domain::bar::Bar;

pub fn true_ranges(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect()
}

pub fn wilder_atr(bars: &[Bar], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; bars.len()];
    if period == 0 || bars.len() < period {
        return out;
    }

    let tr = true_ranges(bars);
    let n = period as f64;

    out[period - 1] = tr[..period].iter().sum::<f64>() / n;
    for i in period..tr.len() {
        out[i] = (out[i - 1] * (n - 1.0) + tr[i]) / n;
    }
    out
}
