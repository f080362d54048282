//! Explicit caller/tick context for ledger operations

use serde::{Deserialize, Serialize};

use super::{Principal, Tick};

/// Identity and clock of a single call, supplied by the hosting environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: Principal,
    pub tick: Tick,
    /// Wall-clock seconds recorded on metadata and audit entries.
    /// Defaults to the tick when the host has no clock of its own.
    pub timestamp: i64,
}

impl CallContext {
    pub fn new(caller: impl Into<Principal>, tick: Tick) -> Self {
        Self {
            caller: caller.into(),
            tick,
            timestamp: i64::try_from(tick).unwrap_or(i64::MAX),
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Same caller at a later (or equal) tick
    pub fn at(&self, tick: Tick) -> Self {
        Self {
            caller: self.caller.clone(),
            tick,
            timestamp: self.timestamp,
        }
    }
}
