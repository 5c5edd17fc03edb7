//! State persistence port trait.

use crate::domain::error::CarryError;
use crate::domain::session::State;

/// Explicit load/save boundary for the session state.
pub trait StatePort {
    /// Loads the persisted state, falling back to defaults when nothing
    /// usable is stored.
    fn load(&self) -> Result<State, CarryError>;

    fn save(&self, state: &State) -> Result<(), CarryError>;
}
