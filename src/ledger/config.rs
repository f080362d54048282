//! Ledger configuration

use crate::types::Principal;

/// Configuration for the SnapshotLedger
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Contract owner: bypasses key permissions and runs admin operations
    pub owner: Principal,
    /// Unregistered keys are readable and writable by anyone
    pub open_unregistered_keys: bool,
    /// Reject re-registration of a key by anyone but its creator
    pub immutable_creator: bool,
    /// Reject queries naming a tick beyond the current tick
    pub reject_future_ticks: bool,
    /// Upper bound on memoized statistics entries
    pub max_cache_entries: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            owner: "owner".to_string(),
            open_unregistered_keys: true,
            immutable_creator: false,
            reject_future_ticks: false,
            max_cache_entries: 1024,
        }
    }
}

impl LedgerConfig {
    /// Create config with a custom owner
    pub fn new(owner: impl Into<Principal>) -> Self {
        Self {
            owner: owner.into(),
            ..Default::default()
        }
    }

    pub fn with_open_unregistered_keys(mut self, open: bool) -> Self {
        self.open_unregistered_keys = open;
        self
    }

    pub fn with_immutable_creator(mut self, immutable: bool) -> Self {
        self.immutable_creator = immutable;
        self
    }

    pub fn with_reject_future_ticks(mut self, reject: bool) -> Self {
        self.reject_future_ticks = reject;
        self
    }

    pub fn with_max_cache_entries(mut self, max: usize) -> Self {
        self.max_cache_entries = max.max(1);
        self
    }

    pub fn is_owner(&self, principal: &str) -> bool {
        self.owner == principal
    }
}
