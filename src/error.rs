//! Error kinds returned by ledger operations

use crate::types::{Principal, Tick};

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Every public operation fails with exactly one of these, and only
/// before any state has been touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("{caller} is not authorized to {action} '{key}'")]
    NotAuthorized {
        caller: Principal,
        action: &'static str,
        key: String,
    },

    #[error("invalid key '{key}': must be 1-{max} characters")]
    InvalidKey { key: String, max: usize },

    #[error("value {value} exceeds maximum {max}")]
    ValueTooLarge { value: u64, max: u64 },

    #[error("ledger is paused")]
    Paused,

    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: Tick, end: Tick },

    #[error("batch of {size} items is outside 1-{max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error("no snapshot found for '{key}'")]
    SnapshotNotFound { key: String },

    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("tick {tick} is beyond current tick {current}")]
    FutureTick { tick: Tick, current: Tick },

    #[error("tick {tick} is before current tick {current}")]
    TickRegression { tick: Tick, current: Tick },

    #[error("{principal} has balance {balance}, needs {required}")]
    InsufficientBalance {
        principal: Principal,
        balance: u64,
        required: u64,
    },
}

impl LedgerError {
    pub(crate) fn not_authorized(caller: &str, action: &'static str, key: &str) -> Self {
        LedgerError::NotAuthorized {
            caller: caller.to_string(),
            action,
            key: key.to_string(),
        }
    }

    pub(crate) fn not_found(key: &str) -> Self {
        LedgerError::SnapshotNotFound {
            key: key.to_string(),
        }
    }

    /// Stable machine-readable code, used by the HTTP API
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::NotAuthorized { .. } => "NOT_AUTHORIZED",
            LedgerError::InvalidKey { .. } => "INVALID_KEY",
            LedgerError::ValueTooLarge { .. } => "VALUE_TOO_LARGE",
            LedgerError::Paused => "PAUSED",
            LedgerError::InvalidRange { .. } => "INVALID_RANGE",
            LedgerError::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
            LedgerError::SnapshotNotFound { .. } => "SNAPSHOT_NOT_FOUND",
            LedgerError::InvalidMetadata(_) => "INVALID_METADATA",
            LedgerError::FutureTick { .. } => "FUTURE_TICK",
            LedgerError::TickRegression { .. } => "TICK_REGRESSION",
            LedgerError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
        }
    }
}
