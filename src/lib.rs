//! Historical Snapshots Ledger
//!
//! A versioned key-value store: every write records a value for a key at a
//! tick (block height), and any past value can be read back later.
//!
//! # Features
//!
//! - **Point-in-time lookups**: exact, latest, and "in effect at" (predecessor)
//! - **Permissioned writers**: owner, per-key creator, granted writers, public flags
//! - **Range statistics**: sum/avg/min/max/count with a write-invalidated cache
//! - **Audit log**: every mutation appends a numbered event
//! - **Retention**: per-key windows with owner-triggered cleanup
//! - **MCP server**: 23 tools over JSON-RPC stdio, plus an optional HTTP read API
//!
//! # Modules
//!
//! - `ledger`: Core data engine (`SnapshotLedger`)
//! - `types`: Records, context and result types
//! - `error`: `LedgerError` kinds
//! - `validation`: Key, value, batch and metadata limits
//! - `persistence`: Checkpoints and JSONL event export
//! - `protocol`: MCP and JSON-RPC protocol types
//! - `server`: MCP server implementation
//! - `tools`: MCP tool implementations
//! - `api`: HTTP read API (axum)
//! - `utils`: Timestamps and identity helpers
//!
//! # Example
//!
//! ```
//! use historical_snapshots::{CallContext, LedgerConfig, SnapshotLedger};
//!
//! let ledger = SnapshotLedger::new(LedgerConfig::new("admin"));
//! let alice = CallContext::new("alice", 10);
//! ledger.store(&alice, "price", 100).unwrap();
//! ledger.store(&alice.at(20), "price", 200).unwrap();
//!
//! let in_effect = ledger.get_at_or_before(&alice.at(20), "price", 15).unwrap();
//! assert_eq!(in_effect.value, 100);
//! ```

pub mod api;
pub mod error;
pub mod ledger;
pub mod persistence;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used items at crate root
pub use error::{LedgerError, LedgerResult};
pub use ledger::{LedgerConfig, SnapshotLedger};
pub use persistence::{LedgerStore, PersistenceConfig};
pub use protocol::{McpTool, ServerInfo, Tool};
pub use server::McpServer;
pub use types::{
    AggregationCacheEntry, BatchItem, CallContext, EventLogEntry, EventType, KeySettings,
    LedgerStatus, McpResult, Snapshot, SnapshotMetadata, Statistics, StoredSnapshot, Tick,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
