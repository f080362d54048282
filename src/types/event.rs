//! Audit log records
//!
//! Every successful write and key registration leaves one entry.
//! Entries are never mutated or removed.

use serde::{Deserialize, Serialize};

use super::{Principal, Tick};

/// Kinds of audited changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A snapshot was written (value = stored value)
    SnapshotStored,
    /// A key was registered or re-registered (value = retention window)
    KeyRegistered,
    /// A writer was added to a key's allow-list
    WriterGranted,
    /// A writer was removed from a key's allow-list
    WriterRevoked,
    /// Retention cleanup removed snapshots (value = removed count)
    SnapshotsCleaned,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::SnapshotStored => write!(f, "snapshot_stored"),
            EventType::KeyRegistered => write!(f, "key_registered"),
            EventType::WriterGranted => write!(f, "writer_granted"),
            EventType::WriterRevoked => write!(f, "writer_revoked"),
            EventType::SnapshotsCleaned => write!(f, "snapshots_cleaned"),
        }
    }
}

/// An immutable entry in the audit log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLogEntry {
    #[serde(rename = "eventId")]
    pub event_id: u64,

    #[serde(rename = "eventType")]
    pub event_type: EventType,

    pub key: String,

    pub tick: Tick,

    #[serde(default)]
    pub value: u64,

    pub author: Principal,

    #[serde(rename = "ts")]
    pub timestamp: i64,
}

impl EventLogEntry {
    /// Serialize entry to JSON string (for JSONL export)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize entry from JSON string
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
