//! Parameter loading and validation from a config source.

use crate::domain::error::CarryError;
use crate::domain::params::{PARAM_KEYS, Params, RawParams};
use crate::ports::config_port::ConfigPort;

pub const PARAMS_SECTION: &str = "params";

/// Overlays the `[params]` section on `base`. Missing keys keep the base
/// value; present keys must parse as finite numbers.
pub fn params_from_config(config: &dyn ConfigPort, base: &Params) -> Result<RawParams, CarryError> {
    let mut raw = RawParams::from(base);
    for key in config.keys(PARAMS_SECTION) {
        if !PARAM_KEYS.contains(&key.as_str()) {
            log::warn!("ignoring unknown key [{PARAMS_SECTION}] {key}");
        }
    }
    for key in PARAM_KEYS {
        let Some(text) = config.get_string(PARAMS_SECTION, key) else {
            continue;
        };
        let value = parse_number(&text).ok_or_else(|| CarryError::InvalidParam {
            key: key.to_string(),
            reason: format!("{text:?} is not a number"),
        })?;
        raw.set(key, value);
    }
    Ok(raw)
}

/// Parses a number, tolerating surrounding whitespace and thousands separators.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
