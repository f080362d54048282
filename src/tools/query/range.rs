//! Range listing tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::ledger::SnapshotLedger;
use crate::protocol::{McpTool, Tool};
use crate::server::json_response;
use crate::tools::args::{read_context, required_str, required_u64, schema};
use crate::types::McpResult;

pub struct GetRangeTool {
    ledger: Arc<SnapshotLedger>,
}

impl GetRangeTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for GetRangeTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "get_range",
            "List a key's snapshots with start <= tick <= end, in tick order",
            schema(
                json!({
                    "key": { "type": "string" },
                    "start": { "type": "integer", "minimum": 0 },
                    "end": { "type": "integer", "minimum": 0 }
                }),
                &["key", "start", "end"],
                false,
            ),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = read_context(&self.ledger, &params)?;
        let key = required_str(&params, "key")?;
        let start = required_u64(&params, "start")?;
        let end = required_u64(&params, "end")?;

        let snapshots = self.ledger.get_range(&ctx, key, start, end)?;
        json_response(&json!({ "count": snapshots.len(), "snapshots": snapshots }))
    }
}
