//! Store snapshot tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::ledger::SnapshotLedger;
use crate::protocol::{McpTool, Tool};
use crate::server::json_response;
use crate::types::McpResult;

use crate::tools::args::{required_str, required_u64, schema, write_context};

/// Record a value for a key at the caller's tick
pub struct StoreTool {
    ledger: Arc<SnapshotLedger>,
}

impl StoreTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for StoreTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "store",
            "Store a value for a key at the current tick. Storing twice at the same tick overwrites the value.",
            schema(
                json!({
                    "key": { "type": "string", "description": "Key name (1-64 characters)" },
                    "value": { "type": "integer", "minimum": 0, "description": "Value to record" }
                }),
                &["key", "value"],
                true,
            ),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = write_context(&self.ledger, &params)?;
        let key = required_str(&params, "key")?;
        let value = required_u64(&params, "value")?;

        let snapshot = self.ledger.store(&ctx, key, value)?;
        json_response(&snapshot)
    }

    fn mutates(&self) -> bool {
        true
    }
}
