//! The three capital tiers and their lot counters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerId {
    A,
    B,
    C,
}

impl LayerId {
    pub const ALL: [LayerId; 3] = [LayerId::A, LayerId::B, LayerId::C];

    pub fn label(self) -> &'static str {
        match self {
            LayerId::A => "A principal",
            LayerId::B => "B defense compounding",
            LayerId::C => "C attack",
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerId::A => "A",
            LayerId::B => "B",
            LayerId::C => "C",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Held size in 10k-unit lots.
    pub lots: u32,
    /// Cooldown anchor for the next add.
    pub last_add_date: Option<NaiveDate>,
    /// Stored for layer C only and never set by a rule. A and B ignore it;
    /// [`Layers::normalize`] clears it there.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub halted: bool,
}

impl Layer {
    pub fn with_lots(lots: u32) -> Self {
        Self {
            lots,
            ..Self::default()
        }
    }

    /// True when no add has been recorded or at least `gap_days` have passed.
    pub fn cooldown_elapsed(&self, today: NaiveDate, gap_days: u32) -> bool {
        match self.last_add_date {
            None => true,
            Some(last) => (today - last).num_days() >= i64::from(gap_days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layers {
    #[serde(rename = "A")]
    pub a: Layer,
    #[serde(rename = "B")]
    pub b: Layer,
    #[serde(rename = "C")]
    pub c: Layer,
}

impl Default for Layers {
    fn default() -> Self {
        Self {
            a: Layer::with_lots(15),
            b: Layer::default(),
            c: Layer::default(),
        }
    }
}

impl Layers {
    pub fn get(&self, id: LayerId) -> &Layer {
        match id {
            LayerId::A => &self.a,
            LayerId::B => &self.b,
            LayerId::C => &self.c,
        }
    }

    pub fn get_mut(&mut self, id: LayerId) -> &mut Layer {
        match id {
            LayerId::A => &mut self.a,
            LayerId::B => &mut self.b,
            LayerId::C => &mut self.c,
        }
    }

    /// Summed in `u64` so counts near `u32::MAX` cannot overflow.
    pub fn ab_lots(&self) -> u64 {
        u64::from(self.a.lots) + u64::from(self.b.lots)
    }

    pub fn total_lots(&self) -> u64 {
        self.ab_lots() + u64::from(self.c.lots)
    }

    /// Drops a `halted` mark loaded onto A or B.
    pub fn normalize(&mut self) {
        self.a.halted = false;
        self.b.halted = false;
    }

    pub fn counts(&self) -> LotCounts {
        LotCounts {
            a: self.a.lots,
            b: self.b.lots,
            c: self.c.lots,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotCounts {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl fmt::Display for LotCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A={} B={} C={}", self.a, self.b, self.c)
    }
}
