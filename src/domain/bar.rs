//! Daily bar representation and the date-keyed bar series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::CarryError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Swap income (negative: cost) per 10k-unit lot for holding overnight.
    pub swap_per_10k: f64,
}

impl Bar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    /// Rejects non-finite fields, non-positive prices and an inverted range.
    pub fn validate(&self) -> Result<(), CarryError> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("swap_per_10k", self.swap_per_10k),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(self.invalid(field, "must be a finite number"));
            }
        }
        for (field, value) in &fields[..4] {
            if *value <= 0.0 {
                return Err(self.invalid(field, "must be positive"));
            }
        }
        if self.high < self.low {
            return Err(self.invalid("high", "must not be below low"));
        }
        Ok(())
    }

    fn invalid(&self, field: &str, reason: &str) -> CarryError {
        CarryError::InvalidBar {
            date: self.date,
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Parses `YYYY-MM-DD`, `YYYY/MM/DD` or `YYYYMMDD` into a real calendar date.
pub fn parse_bar_date(input: &str) -> Result<NaiveDate, CarryError> {
    let s = input.trim();
    let invalid = || CarryError::InvalidDate {
        input: input.to_string(),
    };
    let b = s.as_bytes();
    let (y, m, d) = match b.len() {
        8 if b.iter().all(u8::is_ascii_digit) => (&s[0..4], &s[4..6], &s[6..8]),
        10 if matches!(b[4], b'-' | b'/') && matches!(b[7], b'-' | b'/') => {
            let digits_ok = b[..4]
                .iter()
                .chain(&b[5..7])
                .chain(&b[8..])
                .all(u8::is_ascii_digit);
            if !digits_ok {
                return Err(invalid());
            }
            (&s[0..4], &s[5..7], &s[8..10])
        }
        _ => return Err(invalid()),
    };
    let (Ok(y), Ok(m), Ok(d)) = (y.parse::<i32>(), m.parse::<u32>(), d.parse::<u32>()) else {
        return Err(invalid());
    };
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(invalid)
}

/// Result of an upsert: whether the date was new or an existing bar was overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

impl UpsertOutcome {
    pub fn is_new_date(self) -> bool {
        matches!(self, UpsertOutcome::Inserted)
    }
}

/// Bars sorted ascending by date, at most one per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a series from arbitrary bars; later duplicates win.
    pub fn from_bars(bars: impl IntoIterator<Item = Bar>) -> Self {
        let mut series = Self::new();
        for bar in bars {
            series.upsert(bar);
        }
        series
    }

    pub fn upsert(&mut self, bar: Bar) -> UpsertOutcome {
        match self.bars.binary_search_by_key(&bar.date, |b| b.date) {
            Ok(idx) => {
                self.bars[idx] = bar;
                UpsertOutcome::Replaced
            }
            Err(idx) => {
                self.bars.insert(idx, bar);
                UpsertOutcome::Inserted
            }
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Bar> {
        self.bars
            .binary_search_by_key(&date, |b| b.date)
            .ok()
            .map(|idx| &self.bars[idx])
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn as_slice(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Restores ordering and uniqueness after deserializing a hand-edited blob.
    pub(crate) fn normalize(&mut self) {
        let bars = std::mem::take(&mut self.bars);
        *self = Self::from_bars(bars);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> Bar {
        Bar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close + 0.1,
            low: close - 0.1,
            close,
            swap_per_10k: 120.0,
        }
    }

    #[test]
    fn true_range_hl_dominates() {
        let b = bar("2024-01-15", 7.0);
        assert!((b.true_range(7.0) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn true_range_gap_up() {
        let b = bar("2024-01-15", 7.0);
        // |7.1 - 6.5| = 0.6
        assert!((b.true_range(6.5) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn true_range_gap_down() {
        let b = bar("2024-01-15", 7.0);
        // |6.9 - 7.5| = 0.6
        assert!((b.true_range(7.5) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn upsert_keeps_sorted_order() {
        let mut series = BarSeries::new();
        series.upsert(bar("2024-01-03", 7.2));
        series.upsert(bar("2024-01-01", 7.0));
        series.upsert(bar("2024-01-02", 7.1));

        let dates: Vec<String> = series
            .as_slice()
            .iter()
            .map(|b| b.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
    }

    #[test]
    fn upsert_existing_date_replaces() {
        let mut series = BarSeries::new();
        assert_eq!(series.upsert(bar("2024-01-01", 7.0)), UpsertOutcome::Inserted);
        assert_eq!(series.upsert(bar("2024-01-01", 7.5)), UpsertOutcome::Replaced);
        assert_eq!(series.len(), 1);
        assert_eq!(series.last().unwrap().close, 7.5);
    }

    #[test]
    fn upsert_outcome_reports_new_date() {
        assert!(UpsertOutcome::Inserted.is_new_date());
        assert!(!UpsertOutcome::Replaced.is_new_date());
    }

    #[test]
    fn validate_accepts_sane_bar() {
        assert!(bar("2024-01-01", 7.0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_nan_swap() {
        let mut b = bar("2024-01-01", 7.0);
        b.swap_per_10k = f64::NAN;
        let err = b.validate().unwrap_err();
        assert!(matches!(err, CarryError::InvalidBar { ref field, .. } if field == "swap_per_10k"));
    }

    #[test]
    fn validate_allows_negative_swap() {
        let mut b = bar("2024-01-01", 7.0);
        b.swap_per_10k = -35.0;
        assert!(b.validate().is_ok());
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let mut b = bar("2024-01-01", 7.0);
        b.high = 6.0;
        let err = b.validate().unwrap_err();
        assert!(matches!(err, CarryError::InvalidBar { ref field, .. } if field == "high"));
    }

    #[test]
    fn validate_rejects_zero_close() {
        let mut b = bar("2024-01-01", 7.0);
        b.close = 0.0;
        assert!(b.validate().is_err());
    }

    #[test]
    fn parse_bar_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(parse_bar_date("2024-02-29").unwrap(), expected);
        assert_eq!(parse_bar_date("2024/02/29").unwrap(), expected);
        assert_eq!(parse_bar_date(" 20240229 ").unwrap(), expected);
    }

    #[test]
    fn parse_bar_date_rejects_impossible_dates() {
        assert!(parse_bar_date("2023-02-29").is_err());
        assert!(parse_bar_date("2024-13-01").is_err());
        assert!(parse_bar_date("2024-1-5").is_err());
        assert!(parse_bar_date("date").is_err());
        assert!(parse_bar_date("").is_err());
    }

    #[test]
    fn from_bars_deduplicates() {
        let series = BarSeries::from_bars(vec![
            bar("2024-01-02", 7.1),
            bar("2024-01-01", 7.0),
            bar("2024-01-02", 7.3),
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.last().unwrap().close, 7.3);
    }
}
