//! Retention cleanup tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::ledger::SnapshotLedger;
use crate::protocol::{McpTool, Tool};
use crate::server::json_response;
use crate::tools::args::{required_str, schema, write_context};
use crate::types::McpResult;

pub struct CleanupTool {
    ledger: Arc<SnapshotLedger>,
}

impl CleanupTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for CleanupTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "cleanup",
            "Delete a key's snapshots older than its retention window (owner only)",
            schema(json!({ "key": { "type": "string" } }), &["key"], true),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = write_context(&self.ledger, &params)?;
        let key = required_str(&params, "key")?;

        let removed = self.ledger.cleanup(&ctx, key)?;
        json_response(&json!({ "key": key, "removed": removed }))
    }

    fn mutates(&self) -> bool {
        true
    }
}
