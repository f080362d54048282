//! Register key tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::ledger::SnapshotLedger;
use crate::protocol::{McpTool, Tool};
use crate::server::json_response;
use crate::tools::args::{optional_bool, optional_u64, required_str, schema, write_context};
use crate::types::McpResult;

/// Create a key's access settings with the caller as creator
pub struct RegisterKeyTool {
    ledger: Arc<SnapshotLedger>,
}

impl RegisterKeyTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for RegisterKeyTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "register_key",
            "Register a key: the caller becomes its creator and chooses read/write visibility and retention",
            schema(
                json!({
                    "key": { "type": "string", "description": "Key name (1-64 characters)" },
                    "publicRead": { "type": "boolean", "description": "Anyone may read (default false)" },
                    "publicWrite": { "type": "boolean", "description": "Anyone may write (default false)" },
                    "retentionTicks": { "type": "integer", "minimum": 0, "description": "Snapshots older than this many ticks may be cleaned up; 0 keeps everything" }
                }),
                &["key"],
                true,
            ),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = write_context(&self.ledger, &params)?;
        let key = required_str(&params, "key")?;
        let public_read = optional_bool(&params, "publicRead");
        let public_write = optional_bool(&params, "publicWrite");
        let retention = optional_u64(&params, "retentionTicks")?.unwrap_or(0);

        let key = self
            .ledger
            .register(&ctx, key, public_read, public_write, retention)?;
        json_response(&json!({ "registered": key, "settings": self.ledger.get_key_settings(&key) }))
    }

    fn mutates(&self) -> bool {
        true
    }
}
