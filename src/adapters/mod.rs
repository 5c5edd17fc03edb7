//! Concrete adapter implementations for ports.

pub mod bar_text_adapter;
pub mod file_config_adapter;
pub mod json_state_adapter;
