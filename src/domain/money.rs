//! Yen amount formatting shared by decision rationales and reports.

use num_format::{Locale, ToFormattedString};

/// Rounds to whole yen with thousands separators; `-` for non-finite input.
pub fn fmt_jpy(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let yen = value.round() as i64;
    format!("{} JPY", yen.to_formatted_string(&Locale::en))
}

pub fn fmt_opt_jpy(value: Option<f64>) -> String {
    value.map(fmt_jpy).unwrap_or_else(|| "-".to_string())
}
