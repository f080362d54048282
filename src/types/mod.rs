//! Data types for the historical snapshots ledger
//!
//! This module contains the records stored per key, the request context
//! threaded through every operation, and the result types returned to callers.

mod context;
mod event;
mod settings;
mod snapshot;
mod statistics;

pub use context::CallContext;
pub use event::{EventLogEntry, EventType};
pub use settings::{KeySettings, WriterGrant};
pub use snapshot::{BatchItem, Snapshot, SnapshotMetadata, StoredSnapshot};
pub use statistics::{AggregationCacheEntry, LedgerStatus, Statistics};

/// Block height supplied by the hosting environment
pub type Tick = u64;

/// Opaque caller identity
pub type Principal = String;

/// Result type for protocol-level operations
pub type McpResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Check if value is zero (for skip_serializing_if)
pub fn is_zero(val: &u64) -> bool {
    *val == 0
}
