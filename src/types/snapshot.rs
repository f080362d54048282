//! Snapshot records

use serde::{Deserialize, Serialize};

use super::{Principal, Tick};

/// One recorded value for a key at a specific tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub key: String,
    pub tick: Tick,
    pub value: u64,
}

impl Snapshot {
    pub fn new(key: impl Into<String>, tick: Tick, value: u64) -> Self {
        Self {
            key: key.into(),
            tick,
            value,
        }
    }
}

/// Optional descriptive data attached to a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub timestamp: i64,
    pub author: Principal,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Result of `store_with_metadata`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSnapshot {
    pub snapshot: Snapshot,
    pub metadata_attached: bool,
}

/// One entry of a batch write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    pub key: String,
    pub value: u64,
}

impl BatchItem {
    pub fn new(key: impl Into<String>, value: u64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}
