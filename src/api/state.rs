//! Shared state for the HTTP handlers

use std::sync::Arc;

use crate::ledger::SnapshotLedger;
use crate::tools::args::ANONYMOUS;
use crate::types::CallContext;
use crate::utils::unix_timestamp;

pub struct AppState {
    pub ledger: Arc<SnapshotLedger>,
}

impl AppState {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }

    /// Read context at the ledger's current tick
    pub fn read_context(&self, caller: Option<&str>) -> CallContext {
        CallContext::new(caller.unwrap_or(ANONYMOUS), self.ledger.get_current_tick())
            .with_timestamp(unix_timestamp())
    }

    /// Audit counter, exposed so clients can tell whether anything changed
    pub fn current_sequence_id(&self) -> u64 {
        self.ledger.status().event_counter
    }
}
