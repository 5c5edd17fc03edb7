//! Rolling maximum over a fixed window, NaN until the window is full.

pub fn rolling_max(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 {
        return out;
    }
    for (i, window) in values.windows(period).enumerate() {
        out[i + period - 1] = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    }
    out
}
