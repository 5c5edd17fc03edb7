//! Raw bar input port trait.

use crate::domain::bar::Bar;
use crate::domain::error::CarryError;

/// Bars read from an external source, plus how many rows were unusable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarBatch {
    pub bars: Vec<Bar>,
    pub skipped: usize,
}

pub trait BarSource {
    /// Reads every well-formed row. Malformed rows are counted, not fatal.
    fn read_bars(&self) -> Result<BarBatch, CarryError>;
}
