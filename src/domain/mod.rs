//! Core domain types and logic.

pub mod bar;
pub mod indicator;
pub mod metrics;
pub mod params;
pub mod config_validation;
pub mod decision;
pub mod layer;
pub mod ledger;
pub mod sizing;
pub mod pools;
pub mod report;
pub mod money;
pub mod audit;
pub mod session;
pub mod error;
