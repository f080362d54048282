//! Store snapshot with metadata tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::ledger::SnapshotLedger;
use crate::protocol::{McpTool, Tool};
use crate::server::json_response;
use crate::types::McpResult;

use crate::tools::args::{required_str, required_u64, schema, write_context};

pub struct StoreWithMetadataTool {
    ledger: Arc<SnapshotLedger>,
}

impl StoreWithMetadataTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for StoreWithMetadataTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "store_with_metadata",
            "Store a value and attach a description and tags to the snapshot",
            schema(
                json!({
                    "key": { "type": "string", "description": "Key name (1-64 characters)" },
                    "value": { "type": "integer", "minimum": 0 },
                    "description": { "type": "string", "description": "Up to 256 characters" },
                    "tags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Up to 10 tags of at most 32 characters"
                    }
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
        let description = params
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let tags: Vec<String> = match params.get("tags") {
            None | Some(Value::Null) => Vec::new(),
            Some(tags) => serde_json::from_value(tags.clone())?,
        };

        let stored = self
            .ledger
            .store_with_metadata(&ctx, key, value, description, tags)?;
        json_response(&stored)
    }

    fn mutates(&self) -> bool {
        true
    }
}
