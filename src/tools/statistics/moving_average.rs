//! Moving average tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::ledger::SnapshotLedger;
use crate::protocol::{McpTool, Tool};
use crate::server::json_response;
use crate::tools::args::{read_context, required_str, required_u64, schema};
use crate::types::McpResult;

pub struct GetMovingAverageTool {
    ledger: Arc<SnapshotLedger>,
}

impl GetMovingAverageTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for GetMovingAverageTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "get_moving_average",
            "Average of a key's values in a window of ticks centered on a tick",
            schema(
                json!({
                    "key": { "type": "string" },
                    "center": { "type": "integer", "minimum": 0 },
                    "window": { "type": "integer", "minimum": 0, "description": "Window width in ticks" }
                }),
                &["key", "center", "window"],
                false,
            ),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = read_context(&self.ledger, &params)?;
        let key = required_str(&params, "key")?;
        let center = required_u64(&params, "center")?;
        let window = required_u64(&params, "window")?;

        let average = self.ledger.get_moving_average(&ctx, key, center, window)?;
        json_response(&json!({
            "key": key,
            "center": center,
            "window": window,
            "average": average
        }))
    }
}
