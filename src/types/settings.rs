//! Per-key access settings

use serde::{Deserialize, Serialize};

use super::{is_zero, Principal, Tick};

/// Settings created by `register_key`.
///
/// A key without settings is unregistered and open to everyone
/// unless the ledger is configured otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySettings {
    pub created_at: Tick,
    pub creator: Principal,
    pub public_read: bool,
    pub public_write: bool,
    /// Snapshots older than this many ticks may be purged; 0 keeps everything
    #[serde(default, skip_serializing_if = "is_zero")]
    pub retention_ticks: u64,
}

/// Explicit write permission granted by a key's creator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WriterGrant {
    pub key: String,
    pub writer: Principal,
}
