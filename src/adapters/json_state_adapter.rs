//! JSON file state store.
//!
//! The blob is `{params, layers, pools, bars, logs}`. A blob missing any of
//! `params`, `layers` or `pools` is treated as empty and yields the default
//! state; `bars` and `logs` default to empty.

use crate::domain::error::CarryError;
use crate::domain::session::State;
use crate::ports::state_port::StatePort;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const REQUIRED_KEYS: [&str; 3] = ["params", "layers", "pools"];

pub struct JsonStateAdapter {
    path: PathBuf,
}

impl JsonStateAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// Strict parse: malformed JSON is an error, a blob without the required
/// keys is the default state.
pub fn state_from_json(text: &str) -> Result<State, CarryError> {
    let value: Value = serde_json::from_str(text).map_err(|e| CarryError::StateParse {
        reason: e.to_string(),
    })?;

    let complete = value
        .as_object()
        .is_some_and(|obj| REQUIRED_KEYS.iter().all(|k| obj.contains_key(*k)));
    if !complete {
        log::warn!("state blob lacks params/layers/pools, using defaults");
        return Ok(State::default());
    }

    let mut state: State = serde_json::from_value(value).map_err(|e| CarryError::StateParse {
        reason: e.to_string(),
    })?;
    state.normalize();
    Ok(state)
}

pub fn state_to_json(state: &State) -> Result<String, CarryError> {
    serde_json::to_string_pretty(state).map_err(|e| CarryError::StateParse {
        reason: e.to_string(),
    })
}

/// Writes a pretty-printed copy of the state, creating parent directories.
pub fn export_state(path: &Path, state: &State) -> Result<(), CarryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, state_to_json(state)?)?;
    Ok(())
}

/// Reads a previously exported state. Unlike session load, corrupt JSON is an error.
pub fn import_state(path: &Path) -> Result<State, CarryError> {
    let text = fs::read_to_string(path)?;
    state_from_json(&text)
}

impl StatePort for JsonStateAdapter {
    fn load(&self) -> Result<State, CarryError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no state at {}, starting fresh", self.path.display());
                return Ok(State::default());
            }
            Err(e) => return Err(e.into()),
        };
        match state_from_json(&text) {
            Ok(state) => Ok(state),
            Err(e) => {
                log::warn!("{}: {e}; starting from defaults", self.path.display());
                Ok(State::default())
            }
        }
    }

    fn save(&self, state: &State) -> Result<(), CarryError> {
        export_state(&self.path, state)?;
        log::debug!("state saved to {}", self.path.display());
        Ok(())
    }
}
