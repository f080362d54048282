//! Grant and revoke writer tools

use std::sync::Arc;

use serde_json::{json, Value};

use crate::ledger::SnapshotLedger;
use crate::protocol::{McpTool, Tool};
use crate::server::json_response;
use crate::tools::args::{required_str, schema, write_context};
use crate::types::McpResult;

fn writer_schema() -> Value {
    schema(
        json!({
            "key": { "type": "string" },
            "writer": { "type": "string", "description": "Principal to grant or revoke" }
        }),
        &["key", "writer"],
        true,
    )
}

/// Add a principal to a key's writer list (creator only)
pub struct GrantWriterTool {
    ledger: Arc<SnapshotLedger>,
}

impl GrantWriterTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for GrantWriterTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "grant_writer",
            "Allow a principal to write to a key. Only the key's creator may grant.",
            writer_schema(),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = write_context(&self.ledger, &params)?;
        let key = required_str(&params, "key")?;
        let writer = required_str(&params, "writer")?;

        self.ledger.grant_writer(&ctx, key, writer)?;
        json_response(&json!({ "key": key, "writer": writer, "granted": true }))
    }

    fn mutates(&self) -> bool {
        true
    }
}

/// Remove a principal from a key's writer list (creator only, idempotent)
pub struct RevokeWriterTool {
    ledger: Arc<SnapshotLedger>,
}

impl RevokeWriterTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for RevokeWriterTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "revoke_writer",
            "Revoke a principal's write permission on a key. Revoking a non-writer succeeds.",
            writer_schema(),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = write_context(&self.ledger, &params)?;
        let key = required_str(&params, "key")?;
        let writer = required_str(&params, "writer")?;

        self.ledger.revoke_writer(&ctx, key, writer)?;
        json_response(&json!({ "key": key, "writer": writer, "granted": false }))
    }

    fn mutates(&self) -> bool {
        true
    }
}
