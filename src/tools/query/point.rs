//! Point-in-time lookup tools

use std::sync::Arc;

use serde_json::{json, Value};

use crate::ledger::SnapshotLedger;
use crate::protocol::{McpTool, Tool};
use crate::server::json_response;
use crate::tools::args::{read_context, required_str, required_u64, schema};
use crate::types::McpResult;

fn target_schema(target_description: &str) -> Value {
    schema(
        json!({
            "key": { "type": "string" },
            "targetTick": { "type": "integer", "minimum": 0, "description": target_description }
        }),
        &["key", "targetTick"],
        false,
    )
}

/// Exact lookup at a tick
pub struct GetAtTool {
    ledger: Arc<SnapshotLedger>,
}

impl GetAtTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for GetAtTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "get_at",
            "Get the value a key was given at exactly this tick",
            target_schema("Tick the snapshot was stored at"),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = read_context(&self.ledger, &params)?;
        let key = required_str(&params, "key")?;
        let target = required_u64(&params, "targetTick")?;

        json_response(&self.ledger.get_at(&ctx, key, target)?)
    }
}

/// Most recent snapshot of a key
pub struct GetLatestTool {
    ledger: Arc<SnapshotLedger>,
}

impl GetLatestTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for GetLatestTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "get_latest",
            "Get the most recent snapshot of a key",
            schema(json!({ "key": { "type": "string" } }), &["key"], false),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = read_context(&self.ledger, &params)?;
        let key = required_str(&params, "key")?;

        json_response(&self.ledger.get_latest(&ctx, key)?)
    }
}

/// Predecessor lookup: the greatest stored tick not after the target
pub struct GetAtOrBeforeTool {
    ledger: Arc<SnapshotLedger>,
}

impl GetAtOrBeforeTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for GetAtOrBeforeTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "get_at_or_before",
            "Get the snapshot in effect at a tick: the latest one stored at or before it",
            target_schema("Tick to look up"),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = read_context(&self.ledger, &params)?;
        let key = required_str(&params, "key")?;
        let target = required_u64(&params, "targetTick")?;

        json_response(&self.ledger.get_at_or_before(&ctx, key, target)?)
    }
}
