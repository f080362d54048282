//! MCP Tools implementation
//!
//! One tool per ledger operation, organized by category:
//! - Write tools (3): store, store_with_metadata, batch_store
//! - Access tools (3): register_key, grant_writer, revoke_writer
//! - Query tools (4): point-in-time and range lookups
//! - Statistics tools (4): range aggregation and the statistics cache
//! - Admin tools (9): pause, fee, cleanup, status, events, balances

pub mod access;
pub mod admin;
pub(crate) mod args;
pub mod query;
pub mod statistics;
pub mod write;

use std::io::{BufRead, Write};
use std::sync::Arc;

use crate::ledger::SnapshotLedger;
use crate::server::McpServer;

pub use access::{GrantWriterTool, RegisterKeyTool, RevokeWriterTool};
pub use admin::{
    CleanupTool, DepositTool, GetBalanceTool, GetEventTool, GetKeySettingsTool,
    GetLatestEventsTool, GetStatusTool, SetFeeTool, SetPausedTool,
};
pub use query::{GetAtOrBeforeTool, GetAtTool, GetLatestTool, GetRangeTool};
pub use statistics::{
    CalculateAndCacheTool, GetCachedStatisticsTool, GetMovingAverageTool, GetStatisticsTool,
};
pub use write::{BatchStoreTool, StoreTool, StoreWithMetadataTool};

/// Register all tools with the MCP server
pub fn register_all_tools<R: BufRead, W: Write>(
    server: &mut McpServer<R, W>,
    ledger: Arc<SnapshotLedger>,
) {
    // Write tools (3)
    server.register_tool(Box::new(StoreTool::new(ledger.clone())));
    server.register_tool(Box::new(StoreWithMetadataTool::new(ledger.clone())));
    server.register_tool(Box::new(BatchStoreTool::new(ledger.clone())));

    // Access tools (3)
    server.register_tool(Box::new(RegisterKeyTool::new(ledger.clone())));
    server.register_tool(Box::new(GrantWriterTool::new(ledger.clone())));
    server.register_tool(Box::new(RevokeWriterTool::new(ledger.clone())));

    // Query tools (4)
    server.register_tool(Box::new(GetAtTool::new(ledger.clone())));
    server.register_tool(Box::new(GetLatestTool::new(ledger.clone())));
    server.register_tool(Box::new(GetAtOrBeforeTool::new(ledger.clone())));
    server.register_tool(Box::new(GetRangeTool::new(ledger.clone())));

    // Statistics tools (4)
    server.register_tool(Box::new(GetStatisticsTool::new(ledger.clone())));
    server.register_tool(Box::new(GetCachedStatisticsTool::new(ledger.clone())));
    server.register_tool(Box::new(CalculateAndCacheTool::new(ledger.clone())));
    server.register_tool(Box::new(GetMovingAverageTool::new(ledger.clone())));

    // Admin tools (9)
    server.register_tool(Box::new(SetPausedTool::new(ledger.clone())));
    server.register_tool(Box::new(SetFeeTool::new(ledger.clone())));
    server.register_tool(Box::new(CleanupTool::new(ledger.clone())));
    server.register_tool(Box::new(GetStatusTool::new(ledger.clone())));
    server.register_tool(Box::new(GetKeySettingsTool::new(ledger.clone())));
    server.register_tool(Box::new(GetEventTool::new(ledger.clone())));
    server.register_tool(Box::new(GetLatestEventsTool::new(ledger.clone())));
    server.register_tool(Box::new(DepositTool::new(ledger.clone())));
    server.register_tool(Box::new(GetBalanceTool::new(ledger)));
}
