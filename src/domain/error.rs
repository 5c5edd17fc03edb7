//! Domain error types.

use chrono::NaiveDate;

/// Why an A/B add could not be applied. The ledger is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddRejection {
    #[error("cannot size an add without valid metrics: {reason}")]
    DataInsufficient { reason: String },

    #[error("no capacity left: A+B already hold {current} lots, max is {max_lots}")]
    CapacityExhausted { max_lots: u32, current: u64 },
}

/// Top-level error type for carrytrader.
#[derive(Debug, thiserror::Error)]
pub enum CarryError {
    #[error("invalid bar for {date}: {field} {reason}")]
    InvalidBar {
        date: NaiveDate,
        field: String,
        reason: String,
    },

    #[error("invalid date {input:?} (expected YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("invalid parameter {key}: {reason}")]
    InvalidParam { key: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("state parse error: {reason}")]
    StateParse { reason: String },

    #[error("{action} is not signalled by today's decision")]
    NotSignalled { action: String },

    #[error(transparent)]
    AddRejected(#[from] AddRejection),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CarryError> for std::process::ExitCode {
    fn from(err: &CarryError) -> Self {
        let code: u8 = match err {
            CarryError::Io(_) => 1,
            CarryError::ConfigParse { .. } | CarryError::InvalidParam { .. } => 2,
            CarryError::StateParse { .. } => 3,
            CarryError::InvalidBar { .. } | CarryError::InvalidDate { .. } => 4,
            CarryError::NotSignalled { .. } | CarryError::AddRejected(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}
