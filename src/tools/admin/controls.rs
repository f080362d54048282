//! Owner-only controls: pause and fee

use std::sync::Arc;

use serde_json::{json, Value};

use crate::ledger::SnapshotLedger;
use crate::protocol::{McpTool, Tool};
use crate::server::json_response;
use crate::tools::args::{required_u64, schema, write_context};
use crate::types::McpResult;

pub struct SetPausedTool {
    ledger: Arc<SnapshotLedger>,
}

impl SetPausedTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for SetPausedTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "set_paused",
            "Pause or resume snapshot writes (owner only)",
            schema(json!({ "paused": { "type": "boolean" } }), &["paused"], true),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = write_context(&self.ledger, &params)?;
        let paused = params
            .get("paused")
            .and_then(|v| v.as_bool())
            .ok_or("Missing 'paused' parameter")?;

        let paused = self.ledger.set_paused(&ctx, paused)?;
        json_response(&json!({ "paused": paused }))
    }

    fn mutates(&self) -> bool {
        true
    }
}

pub struct SetFeeTool {
    ledger: Arc<SnapshotLedger>,
}

impl SetFeeTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for SetFeeTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "set_fee",
            "Set the per-snapshot fee paid by writers to the owner (owner only)",
            schema(
                json!({ "fee": { "type": "integer", "minimum": 0 } }),
                &["fee"],
                true,
            ),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = write_context(&self.ledger, &params)?;
        let fee = required_u64(&params, "fee")?;

        let fee = self.ledger.set_fee(&ctx, fee)?;
        json_response(&json!({ "snapshotFee": fee }))
    }

    fn mutates(&self) -> bool {
        true
    }
}
