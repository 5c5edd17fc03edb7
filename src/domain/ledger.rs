//! Position ledger operations on the layer counters.
//!
//! These are the raw mutations. Gating on the day's decision and audit
//! logging happen in [`crate::domain::session`].

use chrono::NaiveDate;

use super::error::AddRejection;
use super::layer::{Layers, LotCounts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotChange {
    pub before: LotCounts,
    pub after: LotCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbAdd {
    pub add_a: u32,
    pub add_b: u32,
    pub max_lots: u32,
    pub before: u64,
}

impl AbAdd {
    /// A+B lots after the add.
    pub fn after(&self) -> u64 {
        self.before + u64::from(self.add_a) + u64::from(self.add_b)
    }
}

impl Layers {
    /// Zeroes every layer and clears all cooldown anchors.
    pub fn close_all(&mut self) -> LotChange {
        let before = self.counts();
        for layer in [&mut self.a, &mut self.b, &mut self.c] {
            layer.lots = 0;
            layer.last_add_date = None;
        }
        LotChange {
            before,
            after: self.counts(),
        }
    }

    /// Floors each layer to half its lots. Cooldowns are untouched.
    pub fn halve(&mut self) -> LotChange {
        let before = self.counts();
        for layer in [&mut self.a, &mut self.b, &mut self.c] {
            layer.lots /= 2;
        }
        LotChange {
            before,
            after: self.counts(),
        }
    }

    /// Adds one lot to A and one to B within `max_lots`, falling back to A
    /// alone when only one lot fits. Both cooldowns restart on success, even
    /// when B received nothing.
    pub fn add_ab(&mut self, max_lots: u32, date: NaiveDate) -> Result<AbAdd, AddRejection> {
        let current = self.ab_lots();
        let cap = u64::from(max_lots);
        let exhausted = move || AddRejection::CapacityExhausted { max_lots, current };
        if current >= cap {
            return Err(exhausted());
        }

        let add_a = 1;
        let add_b = if current + 2 <= cap { 1 } else { 0 };

        // a <= current < cap <= u32::MAX and b + add_b <= cap
        let a_lots = self.a.lots.checked_add(add_a).ok_or_else(exhausted)?;
        let b_lots = self.b.lots.checked_add(add_b).ok_or_else(exhausted)?;
        self.a.lots = a_lots;
        self.b.lots = b_lots;
        self.a.last_add_date = Some(date);
        self.b.last_add_date = Some(date);

        Ok(AbAdd {
            add_a,
            add_b,
            max_lots,
            before: current,
        })
    }

    /// Records that a C signal was acted on outside the app. Lots are unchanged.
    pub fn acknowledge_c(&mut self, date: NaiveDate) {
        self.c.last_add_date = Some(date);
    }
}
