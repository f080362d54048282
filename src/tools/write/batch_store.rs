//! Batch store tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::ledger::SnapshotLedger;
use crate::protocol::{McpTool, Tool};
use crate::server::json_response;
use crate::types::{BatchItem, McpResult};

use crate::tools::args::{schema, write_context};

/// Store several values at one tick; either all are written or none
pub struct BatchStoreTool {
    ledger: Arc<SnapshotLedger>,
}

impl BatchStoreTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for BatchStoreTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "batch_store",
            "Store up to 50 key/value pairs at the current tick. If any item fails, nothing is stored.",
            schema(
                json!({
                    "items": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "key": { "type": "string" },
                                "value": { "type": "integer", "minimum": 0 }
                            },
                            "required": ["key", "value"]
                        }
                    }
                }),
                &["items"],
                true,
            ),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = write_context(&self.ledger, &params)?;
        let items: Vec<BatchItem> =
            serde_json::from_value(params.get("items").cloned().unwrap_or(json!([])))?;

        let stored = self.ledger.batch_store(&ctx, &items)?;
        json_response(&json!({ "stored": stored.len(), "snapshots": stored }))
    }

    fn mutates(&self) -> bool {
        true
    }
}
