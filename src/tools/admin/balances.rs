//! Fee balance tools

use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::LedgerError;
use crate::ledger::SnapshotLedger;
use crate::protocol::{McpTool, Tool};
use crate::server::json_response;
use crate::tools::args::{required_str, required_u64, schema, write_context};
use crate::types::McpResult;

/// Credit a principal's fee balance (owner only)
pub struct DepositTool {
    ledger: Arc<SnapshotLedger>,
}

impl DepositTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for DepositTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "deposit",
            "Credit a principal's balance used to pay snapshot fees (owner only)",
            schema(
                json!({
                    "principal": { "type": "string" },
                    "amount": { "type": "integer", "minimum": 0 }
                }),
                &["principal", "amount"],
                true,
            ),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = write_context(&self.ledger, &params)?;
        let principal = required_str(&params, "principal")?;
        let amount = required_u64(&params, "amount")?;

        if !self.ledger.config().is_owner(&ctx.caller) {
            return Err(LedgerError::not_authorized(&ctx.caller, "deposit to", principal).into());
        }
        let balance = self.ledger.deposit(principal, amount);
        json_response(&json!({ "principal": principal, "balance": balance }))
    }

    fn mutates(&self) -> bool {
        true
    }
}

pub struct GetBalanceTool {
    ledger: Arc<SnapshotLedger>,
}

impl GetBalanceTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for GetBalanceTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "get_balance",
            "Current fee balance of a principal",
            json!({
                "type": "object",
                "properties": { "principal": { "type": "string" } },
                "required": ["principal"]
            }),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let principal = required_str(&params, "principal")?;
        json_response(&json!({
            "principal": principal,
            "balance": self.ledger.balance(principal)
        }))
    }
}
