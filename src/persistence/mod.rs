//! Durable storage for the ledger
//!
//! - `CheckpointManager`: atomic JSON checkpoints of the persisted tables,
//!   keeping the previous checkpoint as a backup
//! - `EventExporter`: append-only JSONL export of the audit log
//! - `LedgerStore`: a ledger opened from, and flushed to, a data directory
//!
//! # Layout
//!
//! ```text
//! data/
//! ├── state.json        latest checkpoint
//! ├── state.prev.json   previous checkpoint (recovery)
//! └── events.jsonl      one audit entry per line
//! ```

mod atomic;
mod checkpoint;
mod event_export;
mod store;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::{EventLogEntry, KeySettings, Principal, Snapshot, SnapshotMetadata, Tick, WriterGrant};

pub use atomic::{atomic_write_with, cleanup_temp_files};
pub use checkpoint::CheckpointManager;
pub use event_export::EventExporter;
pub use store::LedgerStore;

/// Version of the checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors that can occur while reading or writing durable state
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Checkpoint corrupted: {0}")]
    CheckpointCorrupted(String),
}

/// Paths used by persistence
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    pub data_dir: PathBuf,
}

impl PersistenceConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn checkpoint_path(&self) -> PathBuf {
        self.data_dir.join("state.json")
    }

    pub fn previous_checkpoint_path(&self) -> PathBuf {
        self.data_dir.join("state.prev.json")
    }

    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join("events.jsonl")
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self::new("data")
    }
}

/// KeySettings row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRow {
    pub key: String,
    #[serde(flatten)]
    pub settings: KeySettings,
}

/// SnapshotMetadata row keyed by (key, tick)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRow {
    pub key: String,
    pub tick: Tick,
    #[serde(flatten)]
    pub metadata: SnapshotMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRow {
    pub principal: Principal,
    pub balance: u64,
}

/// The durable schema: one table per entity, plus global counters.
///
/// The aggregation cache is memoization and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub version: u32,
    pub owner: Principal,
    pub current_tick: Tick,
    pub total_snapshots: u64,
    pub paused: bool,
    pub snapshot_fee: u64,
    #[serde(default)]
    pub settings: Vec<SettingsRow>,
    #[serde(default)]
    pub snapshots: Vec<Snapshot>,
    #[serde(default)]
    pub metadata: Vec<MetadataRow>,
    #[serde(default)]
    pub grants: Vec<WriterGrant>,
    #[serde(default)]
    pub events: Vec<EventLogEntry>,
    #[serde(default)]
    pub balances: Vec<BalanceRow>,
}
